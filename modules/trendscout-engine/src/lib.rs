//! Trend research engine: dedup, scoring, curation, and the orchestrator
//! that drives them across the configured sources.

pub mod curator;
pub mod dedup;
pub mod researcher;
pub mod scoring;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use curator::{group_by_category, trending_keywords, Curator};
pub use dedup::Deduplicator;
pub use researcher::{MarketingInsights, Researcher, INSIGHTS_MIN_SCORE, SEARCH_MIN_SCORE};
pub use scoring::ScoringEngine;
pub use traits::TopicGateway;
