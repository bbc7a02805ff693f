//! Five-factor virality scoring.
//!
//! Each factor is independently bounded to [0, 100] and the weights sum to
//! 1.0, so the weighted sum never needs a final clamp — that is an invariant
//! of this module, not a coincidence.

use chrono::{DateTime, Utc};

use trendscout_common::{ContentCategory, Topic};

use crate::dedup::{jaccard, title_token_set};

// Factor weights; must sum to 1.0.
const W_ENGAGEMENT: f64 = 0.25;
const W_RECENCY: f64 = 0.20;
const W_RELEVANCE: f64 = 0.25;
const W_VELOCITY: f64 = 0.15;
const W_UNIQUENESS: f64 = 0.15;

/// High-value marketing keywords; each hit boosts relevance.
const HIGH_VALUE_KEYWORDS: &[&str] = &[
    "ai", "chatgpt", "automation", "no-code", "growth",
    "viral", "10x", "secret", "strategy", "hack",
    "free", "tool", "template", "guide", "case study",
    "revenue", "million", "scaling", "framework", "playbook",
];

/// Phrases that mark a topic as actively trending.
const TRENDING_INDICATORS: &[&str] = &[
    "just launched", "new", "breaking", "update", "2024", "2025",
    "announcement", "release", "introducing", "first",
];

/// Categories whose topics get a flat relevance boost by default.
pub const DEFAULT_BOOST_CATEGORIES: &[ContentCategory] = &[
    ContentCategory::AiMarketing,
    ContentCategory::GrowthHacking,
    ContentCategory::Seo,
];

pub struct ScoringEngine {
    boost_categories: Vec<ContentCategory>,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self {
            boost_categories: DEFAULT_BOOST_CATEGORIES.to_vec(),
        }
    }
}

impl ScoringEngine {
    pub fn new(boost_categories: Vec<ContentCategory>) -> Self {
        Self { boost_categories }
    }

    /// Weighted virality score, rounded to 2 decimals. `batch` is the
    /// uniqueness comparison set and normally contains `topic` itself.
    pub fn score(&self, topic: &Topic, batch: &[Topic]) -> f64 {
        self.score_at(topic, batch, Utc::now())
    }

    /// Same as [`score`], but against a fixed clock. Pure: identical inputs
    /// always produce the identical score.
    pub fn score_at(&self, topic: &Topic, batch: &[Topic], now: DateTime<Utc>) -> f64 {
        let weighted = engagement_score(topic) * W_ENGAGEMENT
            + recency_score(topic, now) * W_RECENCY
            + self.relevance_score(topic) * W_RELEVANCE
            + velocity_score(topic, now) * W_VELOCITY
            + uniqueness_score(topic, batch) * W_UNIQUENESS;

        (weighted * 100.0).round() / 100.0
    }

    /// Marketing relevance (0-100): base 50, boosted by keyword hits,
    /// trending phrasing, preferred category, and extracted keywords.
    pub fn relevance_score(&self, topic: &Topic) -> f64 {
        let text = format!(
            "{} {}",
            topic.title.to_lowercase(),
            topic.description.as_deref().unwrap_or("").to_lowercase()
        );

        let mut score = 50.0;

        let keyword_hits = HIGH_VALUE_KEYWORDS.iter().filter(|kw| text.contains(*kw)).count();
        score += (keyword_hits as f64 * 5.0).min(30.0);

        let trending_hits = TRENDING_INDICATORS.iter().filter(|ind| text.contains(*ind)).count();
        score += (trending_hits as f64 * 5.0).min(15.0);

        if self.boost_categories.contains(&topic.category) {
            score += 10.0;
        }

        if !topic.keywords.is_empty() {
            score += (topic.keywords.len() as f64 * 2.0).min(10.0);
        }

        score.min(100.0)
    }
}

/// Interaction volume (0-100) with diminishing per-channel returns.
pub fn engagement_score(topic: &Topic) -> f64 {
    let upvotes = (f64::from(topic.score) / 50.0).min(40.0);
    let comments = (f64::from(topic.comments) / 25.0).min(30.0);
    let shares = (f64::from(topic.shares) / 10.0).min(30.0);
    (upvotes + comments + shares).min(100.0)
}

/// Step function of hours since publish (0-100). Unknown publish time is
/// neutral-low, not zero — absence of a signal is not a penalty.
pub fn recency_score(topic: &Topic, now: DateTime<Utc>) -> f64 {
    match topic.hours_old(now) {
        None => 30.0,
        Some(h) if h < 2.0 => 100.0,
        Some(h) if h < 6.0 => 90.0,
        Some(h) if h < 12.0 => 80.0,
        Some(h) if h < 24.0 => 70.0,
        Some(h) if h < 48.0 => 50.0,
        Some(h) if h < 72.0 => 30.0,
        Some(_) => 10.0,
    }
}

/// Growth rate (0-100): explicit source-supplied velocity when present,
/// otherwise bucketed engagement-per-hour.
pub fn velocity_score(topic: &Topic, now: DateTime<Utc>) -> f64 {
    if topic.trending_velocity > 0.0 {
        return topic.trending_velocity.min(100.0);
    }

    let hours_old = match topic.hours_old(now) {
        Some(h) => h.max(1.0),
        None => return 40.0,
    };

    let rate = (f64::from(topic.score) + f64::from(topic.comments) * 2.0) / hours_old;
    if rate > 50.0 {
        100.0
    } else if rate > 25.0 {
        80.0
    } else if rate > 10.0 {
        60.0
    } else if rate > 5.0 {
        40.0
    } else {
        20.0
    }
}

/// How distinct this title is from every other title in the batch (0-100).
/// Maximum pairwise Jaccard overlap drives the penalty; floor of 10.
pub fn uniqueness_score(topic: &Topic, batch: &[Topic]) -> f64 {
    let others: Vec<&Topic> = batch.iter().filter(|t| t.id != topic.id).collect();
    if others.is_empty() {
        return 70.0;
    }

    let tokens = title_token_set(&topic.title);
    let max_overlap = others
        .iter()
        .map(|other| jaccard(&tokens, &title_token_set(&other.title)))
        .fold(0.0_f64, f64::max);

    (100.0 - max_overlap * 100.0).max(10.0)
}
