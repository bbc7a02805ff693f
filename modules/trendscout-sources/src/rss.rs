//! RSS/Atom adapter over a curated list of marketing publications.
//! Plain XML over reqwest + feed-rs, no browser involved.

use futures::future::join_all;
use tracing::{debug, warn};

use trendscout_common::{ContentCategory, Topic, TrendSource};

use crate::client::HttpClient;
use crate::error::Result;
use crate::taxonomy;

/// Items taken from each feed per fetch.
const ITEMS_PER_FEED: usize = 10;

/// A monitored feed: url, human name, and the category its items default to.
#[derive(Debug, Clone)]
pub struct FeedSpec {
    pub url: &'static str,
    pub name: &'static str,
    pub category: ContentCategory,
}

/// Default marketing publications to monitor.
pub const DEFAULT_FEEDS: &[FeedSpec] = &[
    FeedSpec {
        url: "https://blog.hubspot.com/marketing/rss.xml",
        name: "HubSpot Marketing Blog",
        category: ContentCategory::ContentMarketing,
    },
    FeedSpec {
        url: "https://www.searchenginejournal.com/feed/",
        name: "Search Engine Journal",
        category: ContentCategory::Seo,
    },
    FeedSpec {
        url: "https://contentmarketinginstitute.com/feed/",
        name: "Content Marketing Institute",
        category: ContentCategory::ContentMarketing,
    },
    FeedSpec {
        url: "https://www.socialmediaexaminer.com/feed/",
        name: "Social Media Examiner",
        category: ContentCategory::SocialMedia,
    },
    FeedSpec {
        url: "https://buffer.com/resources/feed/",
        name: "Buffer Blog",
        category: ContentCategory::SocialMedia,
    },
    FeedSpec {
        url: "https://techcrunch.com/feed/",
        name: "TechCrunch",
        category: ContentCategory::Startup,
    },
    FeedSpec {
        url: "https://www.shopify.com/blog/feed",
        name: "Shopify Blog",
        category: ContentCategory::Ecommerce,
    },
];

pub struct RssSource {
    http: HttpClient,
    feeds: Vec<FeedSpec>,
}

impl RssSource {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            feeds: DEFAULT_FEEDS.to_vec(),
        }
    }

    pub fn with_feeds(http: HttpClient, feeds: Vec<FeedSpec>) -> Self {
        Self { http, feeds }
    }

    pub async fn fetch_trending(&self, limit: usize) -> Result<Vec<Topic>> {
        let fetches = self.feeds.iter().map(|spec| async move {
            match self.fetch_feed(spec).await {
                Ok(topics) => topics,
                Err(e) => {
                    warn!(feed = spec.name, error = %e, "feed fetch failed, skipping");
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

    /// Feed search is containment over freshly fetched entries; there is no
    /// query endpoint to call.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Topic>> {
        let all = self.fetch_trending(self.feeds.len() * ITEMS_PER_FEED).await?;
        let needle = query.to_lowercase();
        let mut matched: Vec<Topic> = all
            .into_iter()
            .filter(|t| {
                t.title.to_lowercase().contains(&needle)
                    || t.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .collect();
        matched.truncate(limit);
        Ok(matched)
    }

    async fn fetch_feed(&self, spec: &FeedSpec) -> Result<Vec<Topic>> {
        let bytes = self.http.get_bytes(spec.url).await?;
        let feed = feed_rs::parser::parse(&bytes[..])?;

        let topics: Vec<Topic> = feed
            .entries
            .into_iter()
            .take(ITEMS_PER_FEED)
            .filter_map(|entry| entry_to_topic(entry, spec))
            .collect();

        debug!(feed = spec.name, items = topics.len(), "parsed feed");
        Ok(topics)
    }
}

fn entry_to_topic(entry: feed_rs::model::Entry, spec: &FeedSpec) -> Option<Topic> {
    let title = entry.title.map(|t| t.content).filter(|t| !t.is_empty())?;
    let link = entry.links.first().map(|l| l.href.clone());
    let summary = entry
        .summary
        .map(|s| strip_tags(&s.content))
        .filter(|s| !s.is_empty());

    let id = if entry.id.is_empty() {
        link.clone().unwrap_or_else(|| title.clone())
    } else {
        entry.id
    };

    let mut topic = Topic::new(id, title.clone(), TrendSource::RssFeed);
    topic.url = link;
    topic.category = spec.category;
    topic.author = Some(spec.name.to_string());
    topic.published_at = entry
        .published
        .or(entry.updated)
        .map(|d| d.with_timezone(&chrono::Utc));
    topic.keywords = taxonomy::extract_keywords(
        &format!("{title} {}", summary.as_deref().unwrap_or("")),
        10,
    );
    topic.description = summary.map(|s| s.chars().take(500).collect());
    topic.virality_score = taxonomy::provisional_score(&topic);
    Some(topic)
}

/// Strip markup from feed summaries. A character scan is enough here;
/// feed summaries are short and we only need plain text for keyword matching.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATOM_FIXTURE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Test Marketing Blog</title>
  <id>urn:test-feed</id>
  <updated>2025-08-20T09:00:00Z</updated>
  <entry>
    <title>New AI email automation playbook</title>
    <id>urn:entry-1</id>
    <link href="https://example.com/posts/1"/>
    <summary>&lt;p&gt;A &lt;b&gt;guide&lt;/b&gt; to email automation with AI.&lt;/p&gt;</summary>
    <updated>2025-08-20T08:00:00Z</updated>
  </entry>
  <entry>
    <title>Quarterly garden notes</title>
    <id>urn:entry-2</id>
    <link href="https://example.com/posts/2"/>
    <updated>2025-08-19T08:00:00Z</updated>
  </entry>
</feed>"#;

    fn spec() -> FeedSpec {
        FeedSpec {
            url: "https://example.com/feed",
            name: "Test Marketing Blog",
            category: ContentCategory::EmailMarketing,
        }
    }

    #[test]
    fn strip_tags_removes_markup() {
        assert_eq!(
            strip_tags("<p>A <b>guide</b> to email automation.</p>"),
            "A guide to email automation."
        );
    }

    #[test]
    fn strip_tags_plain_text_unchanged() {
        assert_eq!(strip_tags("no markup here"), "no markup here");
    }

    #[test]
    fn atom_fixture_parses_into_topics() {
        let feed = feed_rs::parser::parse(ATOM_FIXTURE.as_bytes()).unwrap();
        let topics: Vec<Topic> = feed
            .entries
            .into_iter()
            .filter_map(|e| entry_to_topic(e, &spec()))
            .collect();
        assert_eq!(topics.len(), 2);

        let first = &topics[0];
        assert_eq!(first.title, "New AI email automation playbook");
        assert_eq!(first.source, TrendSource::RssFeed);
        assert_eq!(first.category, ContentCategory::EmailMarketing);
        assert_eq!(first.url.as_deref(), Some("https://example.com/posts/1"));
        assert!(first.published_at.is_some());
        assert!(
            first.keywords.iter().any(|k| k == "email"),
            "keywords extracted from title+summary: {:?}",
            first.keywords
        );
        assert_eq!(
            first.description.as_deref(),
            Some("A guide to email automation with AI.")
        );
    }

    #[test]
    fn feed_author_is_publication_name() {
        let feed = feed_rs::parser::parse(ATOM_FIXTURE.as_bytes()).unwrap();
        let topic = entry_to_topic(feed.entries.into_iter().next().unwrap(), &spec()).unwrap();
        assert_eq!(topic.author.as_deref(), Some("Test Marketing Blog"));
    }
}
