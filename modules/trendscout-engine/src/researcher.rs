//! Orchestrator: concurrent fan-out across sources, merge, dedup, curate.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use trendscout_common::{Config, ContentCategory, ResearchSession, Topic, TrendSource};
use trendscout_sources::{
    HackerNewsSource, HttpClient, ProductHuntSource, RedditSource, RssSource,
};

use crate::curator::{self, Curator};
use crate::dedup::Deduplicator;
use crate::scoring::ScoringEngine;
use crate::traits::TopicGateway;

/// Search accepts weaker signals than trending discovery; a query is
/// already a relevance filter.
pub const SEARCH_MIN_SCORE: f64 = 20.0;

/// Insight digests trade precision for breadth.
pub const INSIGHTS_MIN_SCORE: f64 = 25.0;

// Category research and insights run a wide discovery pass first, then
// narrow down.
const WIDE_PASS_LIMIT: usize = 100;
const TOP_KEYWORD_COUNT: usize = 15;

// Each source is asked for more than the final limit so filtering and
// dedup have headroom.
const OVERFETCH_FACTOR: usize = 2;

pub struct Researcher {
    gateways: Vec<(TrendSource, Arc<dyn TopicGateway>)>,
    deduplicator: Deduplicator,
    curator: Curator,
    min_score: f64,
}

impl Researcher {
    /// Wire up the default gateway set from config.
    pub fn from_config(config: &Config) -> Self {
        let http = HttpClient::new(&config.user_agent, config.http_timeout_secs);
        let gateways: Vec<(TrendSource, Arc<dyn TopicGateway>)> = vec![
            (
                TrendSource::Reddit,
                Arc::new(RedditSource::new(http.clone())),
            ),
            (
                TrendSource::HackerNews,
                Arc::new(HackerNewsSource::new(http.clone())),
            ),
            (
                TrendSource::ProductHunt,
                Arc::new(ProductHuntSource::new(http.clone())),
            ),
            (TrendSource::RssFeed, Arc::new(RssSource::new(http))),
        ];
        Self {
            gateways,
            deduplicator: Deduplicator::default(),
            curator: Curator::new(ScoringEngine::default(), config.max_age_hours as f64),
            min_score: config.min_score,
        }
    }

    pub fn new(gateways: Vec<(TrendSource, Arc<dyn TopicGateway>)>, min_score: f64) -> Self {
        Self {
            gateways,
            deduplicator: Deduplicator::default(),
            curator: Curator::default(),
            min_score,
        }
    }

    /// One full research pass: fan out, merge, dedup, curate. A source
    /// failure contributes zero topics and is logged; it never aborts the
    /// run or its sibling fetches.
    ///
    /// `sources` narrows the fan-out to a subset of the configured gateways
    /// for this call only; `min_score` overrides the configured floor.
    pub async fn research_trending(
        &self,
        limit: usize,
        categories: Option<&[ContentCategory]>,
        sources: Option<&[TrendSource]>,
        min_score: Option<f64>,
    ) -> (Vec<Topic>, ResearchSession) {
        let min_score = min_score.unwrap_or(self.min_score);
        let gateways = self.select_gateways(sources);
        let queried: Vec<TrendSource> = gateways.iter().map(|(s, _)| *s).collect();

        let filters = filter_map(limit, categories, min_score);
        let mut session = ResearchSession::begin(queried, filters);

        let merged = fan_out(&gateways, limit * OVERFETCH_FACTOR).await;
        session.topics_discovered = merged.len() as u32;

        let deduped = self.deduplicator.deduplicate(merged);
        let curated = self.curator.curate(deduped, limit, categories, min_score);
        session.topics_curated = curated.len() as u32;
        session.finish();

        info!(
            discovered = session.topics_discovered,
            curated = session.topics_curated,
            "research pass complete"
        );
        (curated, session)
    }

    /// Query-scoped research. Sources are queried one at a time; a search
    /// has lower fan-out value than trending discovery.
    pub async fn search(&self, query: &str, limit: usize) -> (Vec<Topic>, ResearchSession) {
        let mut filters = filter_map(limit, None, SEARCH_MIN_SCORE);
        filters.insert("query".to_string(), json!(query));
        let mut session = ResearchSession::begin(self.source_set(), filters);

        let mut merged = Vec::new();
        for (source, gateway) in &self.gateways {
            match gateway.search(query, limit * OVERFETCH_FACTOR).await {
                Ok(topics) => merged.extend(topics),
                Err(e) => warn!(source = %source, error = %e, "search failed"),
            }
        }
        session.topics_discovered = merged.len() as u32;

        let deduped = self.deduplicator.deduplicate(merged);
        let curated = self.curator.curate(deduped, limit, None, SEARCH_MIN_SCORE);
        session.topics_curated = curated.len() as u32;
        session.finish();

        (curated, session)
    }

    /// Trending discovery narrowed to one category: a wide low-floor pass
    /// first, then filter and truncate, so category topics scoring below the
    /// trending floor still surface.
    pub async fn research_category(
        &self,
        category: ContentCategory,
        limit: usize,
    ) -> (Vec<Topic>, ResearchSession) {
        let (all, session) = self
            .research_trending(WIDE_PASS_LIMIT, None, None, Some(SEARCH_MIN_SCORE))
            .await;
        let mut topics: Vec<Topic> = all
            .into_iter()
            .filter(|t| t.category == category)
            .collect();
        topics.truncate(limit);
        (topics, session)
    }

    /// A cross-source digest over a wide discovery pass: top topics, the
    /// batch grouped by category, and the most common keywords.
    pub async fn marketing_insights(&self, limit: usize) -> MarketingInsights {
        let (all, session) = self
            .research_trending(WIDE_PASS_LIMIT, None, None, Some(INSIGHTS_MIN_SCORE))
            .await;
        let by_category = curator::group_by_category(&all);
        let top_keywords = curator::trending_keywords(&all, TOP_KEYWORD_COUNT);
        let mut topics = all;
        topics.truncate(limit);
        MarketingInsights {
            topics,
            by_category,
            top_keywords,
            session,
        }
    }

    fn select_gateways(
        &self,
        sources: Option<&[TrendSource]>,
    ) -> Vec<(TrendSource, Arc<dyn TopicGateway>)> {
        self.gateways
            .iter()
            .filter(|(s, _)| sources.is_none_or(|wanted| wanted.contains(s)))
            .map(|(s, g)| (*s, Arc::clone(g)))
            .collect()
    }

    fn source_set(&self) -> Vec<TrendSource> {
        self.gateways.iter().map(|(s, _)| *s).collect()
    }
}

async fn fan_out(
    gateways: &[(TrendSource, Arc<dyn TopicGateway>)],
    per_source_limit: usize,
) -> Vec<Topic> {
    let fetches = gateways.iter().map(|(source, gateway)| {
        let source = *source;
        let gateway = Arc::clone(gateway);
        async move {
            match gateway.fetch_trending(per_source_limit).await {
                Ok(topics) => {
                    info!(source = %source, count = topics.len(), "fetched");
                    topics
                }
                Err(e) => {
                    warn!(source = %source, error = %e, "fetch failed");
                    Vec::new()
                }
            }
        }
    });

    // Results come back in gateway order regardless of completion order.
    join_all(fetches).await.into_iter().flatten().collect()
}

impl Default for Researcher {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

pub struct MarketingInsights {
    pub topics: Vec<Topic>,
    pub by_category: std::collections::HashMap<ContentCategory, Vec<Topic>>,
    pub top_keywords: Vec<(String, usize)>,
    pub session: ResearchSession,
}

fn filter_map(
    limit: usize,
    categories: Option<&[ContentCategory]>,
    min_score: f64,
) -> Map<String, Value> {
    let mut filters = Map::new();
    filters.insert("limit".to_string(), json!(limit));
    filters.insert("min_score".to_string(), json!(min_score));
    if let Some(cats) = categories {
        let names: Vec<String> = cats.iter().map(|c| c.to_string()).collect();
        filters.insert("categories".to_string(), json!(names));
    }
    filters
}
