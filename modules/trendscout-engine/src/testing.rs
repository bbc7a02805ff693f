//! In-memory gateway doubles for orchestrator tests.

use std::sync::Mutex;

use async_trait::async_trait;

use trendscout_common::Topic;
use trendscout_sources::SourceError;

use crate::traits::TopicGateway;

/// Gateway that serves a canned batch or a canned failure, recording the
/// limits it was asked for.
pub struct MockGateway {
    topics: Vec<Topic>,
    failure: Option<String>,
    pub requested_limits: Mutex<Vec<usize>>,
}

impl MockGateway {
    pub fn returning(topics: Vec<Topic>) -> Self {
        Self {
            topics,
            failure: None,
            requested_limits: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            topics: Vec::new(),
            failure: Some(message.to_string()),
            requested_limits: Mutex::new(Vec::new()),
        }
    }

    fn respond(&self, limit: usize) -> Result<Vec<Topic>, SourceError> {
        self.requested_limits
            .lock()
            .expect("limit log poisoned")
            .push(limit);
        match &self.failure {
            Some(msg) => Err(SourceError::Network(msg.clone())),
            None => Ok(self.topics.clone()),
        }
    }
}

#[async_trait]
impl TopicGateway for MockGateway {
    async fn fetch_trending(&self, limit: usize) -> Result<Vec<Topic>, SourceError> {
        self.respond(limit)
    }

    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<Topic>, SourceError> {
        self.respond(limit)
    }
}
