//! Shared HTTP plumbing for source adapters: one reqwest client per adapter
//! with a fixed User-Agent, a request timeout, and bounded retry with
//! exponential backoff. Retry policy lives here so adapters stay declarative.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Result, SourceError};

const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE_SECS: u64 = 2;
const BACKOFF_CAP_SECS: u64 = 10;

#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to build source HTTP client");
        Self { client }
    }

    /// GET a JSON document, retrying transient failures.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.get_json_with(url, &[]).await
    }

    /// GET a JSON document with query parameters, retrying transient failures.
    pub async fn get_json_with<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let body = self.get_with_retry(url, query).await?;
        serde_json::from_slice(&body).map_err(|e| SourceError::Parse(e.to_string()))
    }

    /// GET a raw body (RSS/Atom XML), retrying transient failures.
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.get_with_retry(url, &[]).await
    }

    async fn get_with_retry(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<u8>> {
        let mut last_err = SourceError::Network("no attempts made".to_string());

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let backoff = (BACKOFF_BASE_SECS << (attempt - 1)).min(BACKOFF_CAP_SECS);
                debug!(url, attempt, backoff_secs = backoff, "retrying request");
                tokio::time::sleep(Duration::from_secs(backoff)).await;
            }

            match self.client.get(url).query(query).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        return Ok(resp.bytes().await?.to_vec());
                    }
                    let message = resp.text().await.unwrap_or_default();
                    let err = SourceError::Api {
                        status: status.as_u16(),
                        message,
                    };
                    // Server errors are worth retrying, client errors are not.
                    if status.is_server_error() {
                        last_err = err;
                        continue;
                    }
                    return Err(err);
                }
                Err(e) => {
                    last_err = SourceError::Network(e.to_string());
                }
            }
        }

        Err(last_err)
    }
}
