//! Near-duplicate suppression for merged topic batches.
//!
//! Titles are compared as lowercase word sets under Jaccard similarity.
//! Quadratic in batch size by design — batches are tens to low hundreds of
//! topics, so no index structure is warranted.

use std::collections::HashSet;

use trendscout_common::Topic;

/// Title pairs at or above this similarity are considered the same topic.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;

/// Lowercase whitespace-split word set of a title.
pub fn title_token_set(title: &str) -> HashSet<String> {
    title
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Jaccard similarity |A∩B| / |A∪B|. Two empty sets are not similar.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

pub struct Deduplicator {
    threshold: f64,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl Deduplicator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Collapse near-duplicates within one batch, processing in input order.
    ///
    /// When a topic matches an already-accepted one, the pair resolves to
    /// whichever carries the higher `virality_score`; a tie keeps the
    /// incumbent (first seen wins). Survivor order is not guaranteed to
    /// match input order.
    ///
    /// A winning replacement is not re-checked against the other survivors,
    /// so a chain of pairwise-similar titles (A~B, B~C, A not similar to C)
    /// can leave two similar survivors when the bridging title arrives last.
    pub fn deduplicate(&self, topics: Vec<Topic>) -> Vec<Topic> {
        let mut accepted: Vec<(Topic, HashSet<String>)> = Vec::new();

        'next_topic: for topic in topics {
            let tokens = title_token_set(&topic.title);

            for i in 0..accepted.len() {
                if jaccard(&tokens, &accepted[i].1) >= self.threshold {
                    if topic.virality_score > accepted[i].0.virality_score {
                        accepted.remove(i);
                        accepted.push((topic, tokens));
                    }
                    continue 'next_topic;
                }
            }

            accepted.push((topic, tokens));
        }

        accepted.into_iter().map(|(topic, _)| topic).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendscout_common::TrendSource;

    fn topic(id: &str, title: &str, score: f64) -> Topic {
        let mut t = Topic::new(id, title, TrendSource::HackerNews);
        t.virality_score = score;
        t
    }

    #[test]
    fn token_set_lowercases_and_splits() {
        let set = title_token_set("AI Marketing  Tools");
        assert_eq!(set.len(), 3);
        assert!(set.contains("ai"));
        assert!(set.contains("marketing"));
        assert!(set.contains("tools"));
    }

    #[test]
    fn jaccard_identical_sets_is_one() {
        let a = title_token_set("growth hacking guide");
        assert_eq!(jaccard(&a, &a), 1.0);
    }

    #[test]
    fn jaccard_disjoint_sets_is_zero() {
        let a = title_token_set("seo audit checklist");
        let b = title_token_set("video editing tips");
        assert_eq!(jaccard(&a, &b), 0.0);
    }

    #[test]
    fn jaccard_empty_sets_is_zero() {
        let empty = HashSet::new();
        assert_eq!(jaccard(&empty, &empty), 0.0);
    }

    #[test]
    fn distinct_titles_all_survive() {
        let batch = vec![
            topic("1", "SEO audit checklist for agencies", 0.0),
            topic("2", "Video marketing trends", 0.0),
            topic("3", "Email deliverability deep dive", 0.0),
        ];
        let out = Deduplicator::default().deduplicate(batch);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn near_duplicate_titles_collapse_to_one() {
        // "ai marketing tools for 2025" vs "best ai marketing tools 2025":
        // intersection {ai, marketing, tools, 2025} = 4, union = 6 → 0.667
        let batch = vec![
            topic("1", "AI Marketing Tools for 2025", 0.0),
            topic("2", "Best AI Marketing Tools 2025", 0.0),
        ];
        let out = Deduplicator::default().deduplicate(batch);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn duplicate_resolution_keeps_higher_scorer() {
        let batch = vec![
            topic("1", "AI Marketing Tools for 2025", 12.0),
            topic("2", "Best AI Marketing Tools 2025", 55.0),
        ];
        let out = Deduplicator::default().deduplicate(batch);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "2");
    }

    #[test]
    fn duplicate_resolution_keeps_incumbent_on_equal_scores() {
        // Unscored batches tie at 0.0 — first seen wins. This is the normal
        // situation when dedup runs before the curation pipeline scores.
        let batch = vec![
            topic("1", "AI Marketing Tools for 2025", 0.0),
            topic("2", "Best AI Marketing Tools 2025", 0.0),
        ];
        let out = Deduplicator::default().deduplicate(batch);
        assert_eq!(out[0].id, "1");
    }

    #[test]
    fn incumbent_survives_lower_scored_newcomer() {
        let batch = vec![
            topic("1", "AI Marketing Tools for 2025", 80.0),
            topic("2", "Best AI Marketing Tools 2025", 20.0),
        ];
        let out = Deduplicator::default().deduplicate(batch);
        assert_eq!(out[0].id, "1");
    }

    #[test]
    fn below_threshold_pairs_are_kept_apart() {
        // intersection {marketing} = 1, union = 5 → 0.2 < 0.6
        let batch = vec![
            topic("1", "marketing automation guide", 0.0),
            topic("2", "influencer marketing report", 0.0),
        ];
        let out = Deduplicator::default().deduplicate(batch);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn dedup_is_idempotent() {
        let batch = vec![
            topic("1", "AI Marketing Tools for 2025", 40.0),
            topic("2", "Best AI Marketing Tools 2025", 10.0),
            topic("3", "Email deliverability deep dive", 25.0),
            topic("4", "deep dive on email deliverability", 30.0),
            topic("5", "Video marketing trends", 5.0),
        ];
        let dedup = Deduplicator::default();
        let once = dedup.deduplicate(batch);
        let twice = dedup.deduplicate(once.clone());
        let ids = |v: &[Topic]| v.iter().map(|t| t.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn similarity_chain_can_leave_two_survivors() {
        // "growth loops" ~ "growth retention loops" (2/3 ≈ 0.667) and
        // "retention loops" ~ "growth retention loops" (0.667), but the two
        // outer titles only share "loops" (1/3 ≈ 0.333). When the bridging
        // title arrives last with the top score it replaces the first match
        // and is not re-checked against the other survivor, so two similar
        // titles remain. A second pass collapses them.
        let batch = vec![
            topic("1", "growth loops", 10.0),
            topic("2", "retention loops", 10.0),
            topic("3", "growth retention loops", 90.0),
        ];
        let dedup = Deduplicator::default();

        let once = dedup.deduplicate(batch);
        assert_eq!(once.len(), 2);
        assert!(once.iter().any(|t| t.id == "3"));
        assert!(once.iter().any(|t| t.id == "2"));

        let twice = dedup.deduplicate(once);
        assert_eq!(twice.len(), 1);
        assert_eq!(twice[0].id, "3");
    }

    #[test]
    fn custom_threshold_is_respected() {
        // 0.2 similarity collapses under a loose 0.15 threshold.
        let batch = vec![
            topic("1", "marketing automation guide", 0.0),
            topic("2", "influencer marketing report", 0.0),
        ];
        let out = Deduplicator::new(0.15).deduplicate(batch);
        assert_eq!(out.len(), 1);
    }
}
