//! Shared marketing taxonomy for source adapters: keyword extraction,
//! title-driven categorization, and the provisional engagement score stamped
//! on freshly-fetched topics before the curation pipeline re-scores them.

use chrono::Utc;

use trendscout_common::{ContentCategory, Topic};

/// Keywords that indicate marketing-relevant content. Substring containment
/// over lowercased text, same list across adapters.
pub const MARKETING_KEYWORDS: &[&str] = &[
    "seo", "ppc", "roi", "ctr", "conversion", "funnel", "leads",
    "traffic", "organic", "paid", "social media", "content",
    "email", "automation", "analytics", "strategy", "campaign",
    "brand", "influencer", "viral", "engagement", "audience",
    "targeting", "retargeting", "acquisition", "retention", "churn",
    "saas", "b2b", "b2c", "ecommerce", "shopify", "marketing",
    "growth", "startup", "newsletter", "ai", "chatgpt",
    "personalization", "launch", "revenue", "pricing",
];

/// Extract up to `cap` marketing keywords found in the given text.
pub fn extract_keywords(text: &str, cap: usize) -> Vec<String> {
    let lower = text.to_lowercase();
    MARKETING_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(*kw))
        .take(cap)
        .map(|kw| kw.to_string())
        .collect()
}

/// True if the text mentions any marketing keyword at all.
pub fn is_marketing_relevant(text: &str) -> bool {
    let lower = text.to_lowercase();
    MARKETING_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Categorize content by its title/tagline text. First match wins, ordered
/// from most to least specific.
pub fn categorize(text: &str) -> ContentCategory {
    let lower = text.to_lowercase();
    let contains_any = |terms: &[&str]| terms.iter().any(|t| lower.contains(t));

    if contains_any(&["seo", "search engine", "google ranking", "backlink"]) {
        ContentCategory::Seo
    } else if contains_any(&["social media", "twitter", "linkedin", "tiktok", "instagram"]) {
        ContentCategory::SocialMedia
    } else if contains_any(&["email", "newsletter", "outreach"]) {
        ContentCategory::EmailMarketing
    } else if contains_any(&["content marketing", "blog", "writing", "copywriting"]) {
        ContentCategory::ContentMarketing
    } else if contains_any(&["ads", "advertising", "ppc", "paid campaign"]) {
        ContentCategory::PaidAds
    } else if contains_any(&["analytics", "metrics", "dashboard"]) {
        ContentCategory::Analytics
    } else if contains_any(&["growth", "viral", "acquisition"]) {
        ContentCategory::GrowthHacking
    } else if contains_any(&["influencer", "creator", "ugc"]) {
        ContentCategory::Influencer
    } else if contains_any(&["video", "youtube", "reels"]) {
        ContentCategory::VideoMarketing
    } else if contains_any(&["ai", "chatgpt", "llm", "automation", "gpt"]) {
        ContentCategory::AiMarketing
    } else if contains_any(&["ecommerce", "shopify", "amazon"]) {
        ContentCategory::Ecommerce
    } else if contains_any(&["saas", "b2b", "enterprise"]) {
        ContentCategory::B2b
    } else if contains_any(&["startup", "founder"]) {
        ContentCategory::Startup
    } else {
        ContentCategory::General
    }
}

/// Provisional virality score stamped by adapters at ingestion.
///
/// A coarse engagement + recency heuristic, capped at 100. The curation
/// pipeline overwrites it with the authoritative five-factor score; until
/// then it gives the deduplicator's "keep the higher scorer" tie-break
/// something to compare.
pub fn provisional_score(topic: &Topic) -> f64 {
    let base = (f64::from(topic.score) / 100.0).min(30.0);
    let comment = (f64::from(topic.comments) / 50.0).min(25.0);
    let share = (f64::from(topic.shares) / 20.0).min(25.0);

    let recency = match topic.hours_old(Utc::now()) {
        Some(h) if h < 6.0 => 20.0,
        Some(h) if h < 24.0 => 15.0,
        Some(h) if h < 48.0 => 10.0,
        Some(h) if h < 72.0 => 5.0,
        _ => 0.0,
    };

    (base + comment + share + recency).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use trendscout_common::TrendSource;

    #[test]
    fn extract_keywords_caps_results() {
        let text = "seo ppc roi ctr conversion funnel leads traffic organic paid social media content";
        let found = extract_keywords(text, 10);
        assert_eq!(found.len(), 10);
    }

    #[test]
    fn extract_keywords_empty_for_irrelevant_text() {
        assert!(extract_keywords("quantum physics lecture notes", 10).is_empty());
    }

    #[test]
    fn categorize_prefers_seo_over_general() {
        assert_eq!(categorize("10 SEO mistakes to avoid"), ContentCategory::Seo);
    }

    #[test]
    fn categorize_ai_titles() {
        assert_eq!(
            categorize("ChatGPT workflow for busy people"),
            ContentCategory::AiMarketing
        );
    }

    #[test]
    fn categorize_falls_back_to_general() {
        assert_eq!(categorize("Weekend hiking trip"), ContentCategory::General);
    }

    #[test]
    fn provisional_score_is_capped() {
        let mut t = Topic::new("1", "Big", TrendSource::HackerNews);
        t.score = 1_000_000;
        t.comments = 1_000_000;
        t.shares = 1_000_000;
        t.published_at = Some(Utc::now() - Duration::hours(1));
        assert!(provisional_score(&t) <= 100.0);
    }

    #[test]
    fn provisional_score_zero_engagement_no_date() {
        let t = Topic::new("1", "Quiet", TrendSource::RssFeed);
        assert_eq!(provisional_score(&t), 0.0);
    }

    #[test]
    fn provisional_score_rewards_recency() {
        let now = Utc::now();
        let mut fresh = Topic::new("1", "Fresh", TrendSource::Reddit);
        fresh.score = 100;
        fresh.published_at = Some(now - Duration::hours(1));

        let mut stale = fresh.clone();
        stale.published_at = Some(now - Duration::hours(100));

        assert!(provisional_score(&fresh) > provisional_score(&stale));
    }
}
