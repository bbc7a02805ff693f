//! Gateway contract the orchestrator consumes from every source adapter.

use async_trait::async_trait;

use trendscout_common::Topic;
use trendscout_sources::{
    HackerNewsSource, ProductHuntSource, RedditSource, RssSource, SourceError,
};

/// Uniform fetch contract over one content source. Adapters own their retry
/// and backoff policy; the orchestrator only sees success or `SourceError`.
#[async_trait]
pub trait TopicGateway: Send + Sync {
    /// Up to `limit` currently-trending topics. May return fewer.
    async fn fetch_trending(&self, limit: usize) -> Result<Vec<Topic>, SourceError>;

    /// Up to `limit` topics matching `query`.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Topic>, SourceError>;
}

#[async_trait]
impl TopicGateway for RedditSource {
    async fn fetch_trending(&self, limit: usize) -> Result<Vec<Topic>, SourceError> {
        RedditSource::fetch_trending(self, limit).await
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Topic>, SourceError> {
        RedditSource::search(self, query, limit).await
    }
}

#[async_trait]
impl TopicGateway for HackerNewsSource {
    async fn fetch_trending(&self, limit: usize) -> Result<Vec<Topic>, SourceError> {
        HackerNewsSource::fetch_trending(self, limit).await
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Topic>, SourceError> {
        HackerNewsSource::search(self, query, limit).await
    }
}

#[async_trait]
impl TopicGateway for RssSource {
    async fn fetch_trending(&self, limit: usize) -> Result<Vec<Topic>, SourceError> {
        RssSource::fetch_trending(self, limit).await
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Topic>, SourceError> {
        RssSource::search(self, query, limit).await
    }
}

#[async_trait]
impl TopicGateway for ProductHuntSource {
    async fn fetch_trending(&self, limit: usize) -> Result<Vec<Topic>, SourceError> {
        ProductHuntSource::fetch_trending(self, limit).await
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Topic>, SourceError> {
        ProductHuntSource::search(self, query, limit).await
    }
}
