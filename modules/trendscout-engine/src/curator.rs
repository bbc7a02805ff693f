//! Curation pipeline: filter, score, rank, truncate.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use trendscout_common::{ContentCategory, Topic};

use crate::scoring::ScoringEngine;

pub const DEFAULT_MIN_SCORE: f64 = 30.0;
pub const DEFAULT_MAX_AGE_HOURS: f64 = 72.0;

pub struct Curator {
    engine: ScoringEngine,
    max_age_hours: f64,
}

impl Default for Curator {
    fn default() -> Self {
        Self {
            engine: ScoringEngine::default(),
            max_age_hours: DEFAULT_MAX_AGE_HOURS,
        }
    }
}

impl Curator {
    pub fn new(engine: ScoringEngine, max_age_hours: f64) -> Self {
        Self { engine, max_age_hours }
    }

    /// Filter → score → rank → truncate one deduplicated batch.
    ///
    /// The uniqueness comparison set is the batch that survived filtering,
    /// so uniqueness is relative to the topics actually competing for slots.
    pub fn curate(
        &self,
        topics: Vec<Topic>,
        limit: usize,
        categories: Option<&[ContentCategory]>,
        min_score: f64,
    ) -> Vec<Topic> {
        self.curate_at(topics, limit, categories, min_score, Utc::now())
    }

    pub fn curate_at(
        &self,
        topics: Vec<Topic>,
        limit: usize,
        categories: Option<&[ContentCategory]>,
        min_score: f64,
        now: DateTime<Utc>,
    ) -> Vec<Topic> {
        let mut batch: Vec<Topic> = topics
            .into_iter()
            .filter(|t| categories.is_none_or(|cats| cats.contains(&t.category)))
            // Topics without a publish timestamp are kept; unknown age is
            // not the same as stale.
            .filter(|t| t.hours_old(now).is_none_or(|h| h <= self.max_age_hours))
            .collect();

        // Score against the filtered batch, then assign. Two passes so a
        // topic's uniqueness never sees a half-updated neighbor.
        let scores: Vec<f64> = batch
            .iter()
            .map(|t| self.engine.score_at(t, &batch, now))
            .collect();
        for (topic, score) in batch.iter_mut().zip(scores) {
            topic.virality_score = score;
        }

        batch.retain(|t| t.virality_score >= min_score);
        // Stable sort: ties keep their merge order.
        batch.sort_by(|a, b| {
            b.virality_score
                .partial_cmp(&a.virality_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        batch.truncate(limit);
        batch
    }
}

/// Bucket curated topics by category, preserving rank order inside each
/// bucket.
pub fn group_by_category(topics: &[Topic]) -> HashMap<ContentCategory, Vec<Topic>> {
    let mut groups: HashMap<ContentCategory, Vec<Topic>> = HashMap::new();
    for topic in topics {
        groups.entry(topic.category).or_default().push(topic.clone());
    }
    groups
}

/// Keywords ranked by how many curated topics carry them, most common first.
/// Ties break alphabetically so the ordering is deterministic.
pub fn trending_keywords(topics: &[Topic], limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for topic in topics {
        for kw in &topic.keywords {
            *counts.entry(kw.as_str()).or_insert(0) += 1;
        }
    }
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(kw, n)| (kw.to_string(), n))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use trendscout_common::TrendSource;

    fn topic(id: &str, title: &str, hours_ago: i64, now: DateTime<Utc>) -> Topic {
        let mut t = Topic::new(id, title, TrendSource::Reddit);
        t.published_at = Some(now - Duration::hours(hours_ago));
        t
    }

    fn hot(id: &str, title: &str, now: DateTime<Utc>) -> Topic {
        let mut t = topic(id, title, 1, now);
        t.category = ContentCategory::AiMarketing;
        t.score = 2000;
        t.comments = 1000;
        t.shares = 500;
        t.keywords = vec!["ai".into(), "growth".into(), "automation".into()];
        t
    }

    #[test]
    fn curate_filters_categories_when_given() {
        let now = Utc::now();
        let mut seo = hot("1", "seo teardown of a viral launch", now);
        seo.category = ContentCategory::Seo;
        let email = {
            let mut t = hot("2", "email automation playbook revenue", now);
            t.category = ContentCategory::EmailMarketing;
            t
        };
        let curator = Curator::default();
        let out = curator.curate_at(
            vec![seo, email],
            10,
            Some(&[ContentCategory::Seo]),
            0.0,
            now,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "1");
    }

    #[test]
    fn curate_drops_stale_topics_but_keeps_undated() {
        let now = Utc::now();
        let fresh = hot("fresh", "ai growth strategy guide", now);
        let stale = hot("stale", "forgotten automation tool launch", now);
        let stale = {
            let mut t = stale;
            t.published_at = Some(now - Duration::hours(100));
            t
        };
        let undated = {
            let mut t = hot("undated", "viral framework case study", now);
            t.published_at = None;
            t
        };
        let curator = Curator::default();
        let out = curator.curate_at(vec![fresh, stale, undated], 10, None, 0.0, now);
        let ids: Vec<&str> = out.iter().map(|t| t.id.as_str()).collect();
        assert!(ids.contains(&"fresh"));
        assert!(ids.contains(&"undated"));
        assert!(!ids.contains(&"stale"));
    }

    #[test]
    fn curate_enforces_min_score() {
        let now = Utc::now();
        let strong = hot("strong", "ai marketing growth hack", now);
        let weak = {
            let mut t = topic("weak", "miscellaneous office chatter", 60, now);
            t.category = ContentCategory::General;
            t
        };
        let curator = Curator::default();
        // An engagement-free 60h-old topic composites well under 50; the hot
        // one lands far above it.
        let out = curator.curate_at(vec![strong, weak], 10, None, 50.0, now);
        assert!(out.iter().all(|t| t.virality_score >= 50.0));
        assert!(out.iter().any(|t| t.id == "strong"));
        assert!(out.iter().all(|t| t.id != "weak"));
    }

    #[test]
    fn curate_sorts_descending_and_truncates() {
        let now = Utc::now();
        let batch = vec![
            topic("low", "quiet garden notes", 60, now),
            hot("high", "ai growth automation secret", now),
            topic("mid", "new free marketing tool launched", 4, now),
        ];
        let curator = Curator::default();
        let out = curator.curate_at(batch, 2, None, 0.0, now);
        assert_eq!(out.len(), 2);
        assert!(out[0].virality_score >= out[1].virality_score);
        assert_eq!(out[0].id, "high");
    }

    #[test]
    fn curate_scores_are_bounded() {
        let now = Utc::now();
        let batch = vec![
            hot("1", "ai marketing tools 2025", now),
            topic("2", "plain update", 30, now),
        ];
        let out = Curator::default().curate_at(batch, 10, None, 0.0, now);
        for t in &out {
            assert!((0.0..=100.0).contains(&t.virality_score));
        }
    }

    #[test]
    fn curate_empty_batch() {
        let out = Curator::default().curate(Vec::new(), 10, None, 0.0);
        assert!(out.is_empty());
    }

    #[test]
    fn group_by_category_preserves_order() {
        let now = Utc::now();
        let mut a = hot("a", "first seo entry ranked higher", now);
        a.category = ContentCategory::Seo;
        a.virality_score = 90.0;
        let mut b = hot("b", "second seo entry ranked lower", now);
        b.category = ContentCategory::Seo;
        b.virality_score = 70.0;
        let groups = group_by_category(&[a, b]);
        let seo = &groups[&ContentCategory::Seo];
        assert_eq!(seo.len(), 2);
        assert_eq!(seo[0].id, "a");
    }

    #[test]
    fn trending_keywords_ranks_by_frequency() {
        let now = Utc::now();
        let mut a = topic("a", "one", 1, now);
        a.keywords = vec!["ai".into(), "growth".into()];
        let mut b = topic("b", "two", 1, now);
        b.keywords = vec!["ai".into(), "seo".into()];
        let mut c = topic("c", "three", 1, now);
        c.keywords = vec!["ai".into()];
        let ranked = trending_keywords(&[a, b, c], 2);
        assert_eq!(ranked[0], ("ai".to_string(), 3));
        assert_eq!(ranked.len(), 2);
    }
}
