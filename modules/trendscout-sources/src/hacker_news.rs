//! Hacker News adapter. Trending comes from the Firebase API (top-story ids
//! plus per-item fetches, done concurrently); search goes through the
//! Algolia index.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Deserialize;
use tracing::debug;

use trendscout_common::{Topic, TrendSource};

use crate::client::HttpClient;
use crate::error::Result;
use crate::taxonomy;

const FIREBASE_BASE: &str = "https://hacker-news.firebaseio.com/v0";
const ALGOLIA_SEARCH: &str = "https://hn.algolia.com/api/v1/search";

/// Marketing-relevant stories get this multiplier on the provisional score.
const RELEVANCE_BOOST: f64 = 1.3;

pub struct HackerNewsSource {
    http: HttpClient,
}

#[derive(Debug, Deserialize)]
struct HnItem {
    id: u64,
    #[serde(rename = "type")]
    kind: Option<String>,
    title: Option<String>,
    url: Option<String>,
    score: Option<u32>,
    descendants: Option<u32>,
    by: Option<String>,
    time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct AlgoliaResponse {
    hits: Vec<AlgoliaHit>,
}

#[derive(Debug, Deserialize)]
struct AlgoliaHit {
    #[serde(rename = "objectID")]
    object_id: String,
    title: Option<String>,
    url: Option<String>,
    points: Option<u32>,
    num_comments: Option<u32>,
    author: Option<String>,
    created_at: Option<String>,
}

impl HackerNewsSource {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn fetch_trending(&self, limit: usize) -> Result<Vec<Topic>> {
        let ids: Vec<u64> = self
            .http
            .get_json(&format!("{FIREBASE_BASE}/topstories.json"))
            .await?;

        // Over-fetch so relevance filtering and dead items still leave enough.
        let fetches = ids.iter().take(limit * 2).map(|id| self.get_item(*id));
        let items = join_all(fetches).await;

        let mut topics: Vec<Topic> = items
            .into_iter()
            .flatten()
            .filter(|item| item.kind.as_deref() == Some("story"))
            .filter_map(|item| self.item_to_topic(item))
            .collect();

        topics.sort_by(|a, b| {
            b.virality_score
                .partial_cmp(&a.virality_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        topics.truncate(limit);
        Ok(topics)
    }

    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Topic>> {
        let limit_str = limit.to_string();
        let resp: AlgoliaResponse = self
            .http
            .get_json_with(
                ALGOLIA_SEARCH,
                &[
                    ("query", query),
                    ("tags", "story"),
                    ("hitsPerPage", &limit_str),
                ],
            )
            .await?;

        let topics = resp
            .hits
            .into_iter()
            .filter_map(|hit| self.hit_to_topic(hit, query))
            .collect();
        Ok(topics)
    }

    async fn get_item(&self, id: u64) -> Option<HnItem> {
        match self
            .http
            .get_json::<Option<HnItem>>(&format!("{FIREBASE_BASE}/item/{id}.json"))
            .await
        {
            Ok(item) => item,
            Err(e) => {
                debug!(id, error = %e, "hn item fetch failed, skipping");
                None
            }
        }
    }

    fn item_to_topic(&self, item: HnItem) -> Option<Topic> {
        let title = item.title.filter(|t| !t.is_empty())?;
        let comments = item.descendants.unwrap_or(0);
        let url = item
            .url
            .clone()
            .unwrap_or_else(|| format!("https://news.ycombinator.com/item?id={}", item.id));

        let mut topic = Topic::new(item.id.to_string(), title.clone(), TrendSource::HackerNews);
        topic.description = Some(format!("HN discussion with {comments} comments"));
        topic.url = Some(url.clone());
        topic.category = taxonomy::categorize(&title);
        topic.score = item.score.unwrap_or(0);
        topic.comments = comments;
        topic.author = item.by;
        topic.published_at = item.time.and_then(|t| DateTime::from_timestamp(t, 0));
        topic.keywords = taxonomy::extract_keywords(&title, 10);

        topic.virality_score = taxonomy::provisional_score(&topic);
        if taxonomy::is_marketing_relevant(&format!("{title} {url}")) {
            topic.virality_score = (topic.virality_score * RELEVANCE_BOOST).min(100.0);
        }
        Some(topic)
    }

    fn hit_to_topic(&self, hit: AlgoliaHit, query: &str) -> Option<Topic> {
        let title = hit.title.filter(|t| !t.is_empty())?;
        let url = hit
            .url
            .unwrap_or_else(|| format!("https://news.ycombinator.com/item?id={}", hit.object_id));

        let mut topic = Topic::new(hit.object_id, title.clone(), TrendSource::HackerNews);
        topic.description = Some(format!("Search result for '{query}'"));
        topic.url = Some(url);
        topic.category = taxonomy::categorize(&title);
        topic.score = hit.points.unwrap_or(0);
        topic.comments = hit.num_comments.unwrap_or(0);
        topic.author = hit.author;
        topic.published_at = hit
            .created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc));
        topic.keywords = taxonomy::extract_keywords(&title, 10);
        topic.virality_score = taxonomy::provisional_score(&topic);
        Some(topic)
    }
}
