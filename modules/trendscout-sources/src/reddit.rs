//! Reddit adapter over the public JSON listings. Trending pulls the hot
//! listing of each monitored marketing subreddit concurrently; search uses
//! the sitewide search endpoint scoped to the core marketing subreddits.

use chrono::DateTime;
use futures::future::join_all;
use serde::Deserialize;
use tracing::warn;

use trendscout_common::{ContentCategory, Topic, TrendSource};

use crate::client::HttpClient;
use crate::error::Result;
use crate::taxonomy;

const BASE_URL: &str = "https://www.reddit.com";

/// Hot posts below this score are noise, not signal.
const MIN_POST_SCORE: u32 = 10;

/// Marketing-related subreddits monitored for trending content.
pub const MARKETING_SUBREDDITS: &[&str] = &[
    "marketing",
    "digital_marketing",
    "socialmedia",
    "SEO",
    "content_marketing",
    "PPC",
    "advertising",
    "Entrepreneur",
    "startups",
    "growthacking",
    "ecommerce",
    "shopify",
    "copywriting",
    "emailmarketing",
    "analytics",
    "bigseo",
    "affiliatemarketing",
    "SaaS",
];

pub struct RedditSource {
    http: HttpClient,
    subreddits: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: RedditPost,
}

#[derive(Debug, Deserialize)]
struct RedditPost {
    id: String,
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    permalink: String,
    #[serde(default)]
    subreddit: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: u32,
    author: Option<String>,
    created_utc: Option<f64>,
    #[serde(default)]
    stickied: bool,
}

impl RedditSource {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            subreddits: MARKETING_SUBREDDITS.to_vec(),
        }
    }

    pub fn with_subreddits(http: HttpClient, subreddits: Vec<&'static str>) -> Self {
        Self { http, subreddits }
    }

    pub async fn fetch_trending(&self, limit: usize) -> Result<Vec<Topic>> {
        let fetches = self.subreddits.iter().map(|sub| async move {
            let url = format!("{BASE_URL}/r/{sub}/hot.json");
            match self.http.get_json_with::<Listing>(&url, &[("limit", "25")]).await {
                Ok(listing) => self.listing_to_topics(listing, sub),
                Err(e) => {
                    warn!(subreddit = *sub, error = %e, "subreddit fetch failed, skipping");
                    Vec::new()
                }
            }
        });

        let mut topics: Vec<Topic> = join_all(fetches).await.into_iter().flatten().collect();
        topics.sort_by(|a, b| {
            b.virality_score
                .partial_cmp(&a.virality_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        topics.truncate(limit);
        Ok(topics)
    }

    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Topic>> {
        let q = format!(
            "{query} subreddit:marketing OR subreddit:digital_marketing OR subreddit:SEO OR subreddit:socialmedia"
        );
        let limit_str = limit.to_string();
        let listing: Listing = self
            .http
            .get_json_with(
                &format!("{BASE_URL}/search.json"),
                &[
                    ("q", q.as_str()),
                    ("sort", "relevance"),
                    ("t", "week"),
                    ("limit", &limit_str),
                ],
            )
            .await?;

        let topics = listing
            .data
            .children
            .into_iter()
            .map(|child| {
                let subreddit = child.data.subreddit.clone();
                self.post_to_topic(child.data, &subreddit)
            })
            .collect();
        Ok(topics)
    }

    fn listing_to_topics(&self, listing: Listing, subreddit: &str) -> Vec<Topic> {
        listing
            .data
            .children
            .into_iter()
            .map(|child| child.data)
            .filter(|post| !post.stickied && post.score >= i64::from(MIN_POST_SCORE))
            .map(|post| self.post_to_topic(post, subreddit))
            .collect()
    }

    fn post_to_topic(&self, post: RedditPost, subreddit: &str) -> Topic {
        let mut topic = Topic::new(post.id, post.title.clone(), TrendSource::Reddit);
        if !post.selftext.is_empty() {
            topic.description = Some(post.selftext.chars().take(500).collect());
        }
        topic.url = Some(format!("https://reddit.com{}", post.permalink));
        topic.category = categorize_subreddit(subreddit);
        topic.score = post.score.max(0) as u32;
        topic.comments = post.num_comments;
        topic.author = post.author;
        topic.published_at = post
            .created_utc
            .and_then(|t| DateTime::from_timestamp(t as i64, 0));
        topic.keywords =
            taxonomy::extract_keywords(&format!("{} {}", post.title, post.selftext), 10);
        topic.virality_score = taxonomy::provisional_score(&topic);
        topic
    }
}

/// Map a subreddit to the category its posts are filed under.
fn categorize_subreddit(subreddit: &str) -> ContentCategory {
    match subreddit.to_lowercase().as_str() {
        "seo" | "bigseo" => ContentCategory::Seo,
        "socialmedia" => ContentCategory::SocialMedia,
        "emailmarketing" => ContentCategory::EmailMarketing,
        "content_marketing" | "copywriting" => ContentCategory::ContentMarketing,
        "ppc" | "advertising" => ContentCategory::PaidAds,
        "analytics" => ContentCategory::Analytics,
        "growthacking" => ContentCategory::GrowthHacking,
        "entrepreneur" | "startups" => ContentCategory::Startup,
        "saas" => ContentCategory::B2b,
        "ecommerce" | "shopify" => ContentCategory::Ecommerce,
        _ => ContentCategory::General,
    }
}
