//! Product Hunt adapter over the public Atom feed. Launch entries default to
//! the startup category unless their name/tagline matches a more specific
//! marketing category.

use trendscout_common::{ContentCategory, Topic, TrendSource};

use crate::client::HttpClient;
use crate::error::Result;
use crate::taxonomy;

const FEED_URL: &str = "https://www.producthunt.com/feed";

pub struct ProductHuntSource {
    http: HttpClient,
}

impl ProductHuntSource {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn fetch_trending(&self, limit: usize) -> Result<Vec<Topic>> {
        let bytes = self.http.get_bytes(FEED_URL).await?;
        let feed = feed_rs::parser::parse(&bytes[..])?;

        let topics = feed
            .entries
            .into_iter()
            .take(limit)
            .filter_map(entry_to_topic)
            .collect();
        Ok(topics)
    }

    /// The feed has no query endpoint; search filters today's launches.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Topic>> {
        let all = self.fetch_trending(50).await?;
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
}

fn entry_to_topic(entry: feed_rs::model::Entry) -> Option<Topic> {
    let title = entry.title.map(|t| t.content).filter(|t| !t.is_empty())?;
    let link = entry.links.first().map(|l| l.href.clone());
    let tagline = entry
        .summary
        .map(|s| strip_to_text(&s.content))
        .or_else(|| entry.content.and_then(|c| c.body).map(|b| strip_to_text(&b)))
        .filter(|s| !s.is_empty());

    let id = if entry.id.is_empty() {
        link.clone().unwrap_or_else(|| title.clone())
    } else {
        entry.id
    };

    let text = format!("{title} {}", tagline.as_deref().unwrap_or(""));

    let mut topic = Topic::new(id, title, TrendSource::ProductHunt);
    topic.url = link;
    topic.category = categorize_product(&text);
    topic.published_at = entry
        .published
        .or(entry.updated)
        .map(|d| d.with_timezone(&chrono::Utc));
    topic.keywords = taxonomy::extract_keywords(&text, 10);
    topic.description = tagline.map(|s| s.chars().take(500).collect());
    topic.virality_score = taxonomy::provisional_score(&topic);
    Some(topic)
}

/// Product launches that match nothing specific are still startups.
fn categorize_product(text: &str) -> ContentCategory {
    match taxonomy::categorize(text) {
        ContentCategory::General => ContentCategory::Startup,
        category => category,
    }
}

fn strip_to_text(html: &str) -> String {
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

    const PH_FIXTURE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Product Hunt</title>
  <id>urn:ph-feed</id>
  <updated>2025-08-20T09:00:00Z</updated>
  <entry>
    <title>MailPilot</title>
    <id>urn:ph-1</id>
    <link href="https://www.producthunt.com/posts/mailpilot"/>
    <summary>AI email outreach on autopilot</summary>
    <published>2025-08-20T07:00:00Z</published>
    <updated>2025-08-20T07:00:00Z</updated>
  </entry>
  <entry>
    <title>DeskLamp</title>
    <id>urn:ph-2</id>
    <link href="https://www.producthunt.com/posts/desklamp"/>
    <summary>A nicer lamp for your desk</summary>
    <updated>2025-08-20T06:00:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn launch_entries_parse_into_topics() {
        let feed = feed_rs::parser::parse(PH_FIXTURE.as_bytes()).unwrap();
        let topics: Vec<Topic> = feed.entries.into_iter().filter_map(entry_to_topic).collect();
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].title, "MailPilot");
        assert_eq!(topics[0].source, TrendSource::ProductHunt);
        assert!(topics[0].published_at.is_some());
    }

    #[test]
    fn marketing_tools_get_specific_category() {
        let feed = feed_rs::parser::parse(PH_FIXTURE.as_bytes()).unwrap();
        let topics: Vec<Topic> = feed.entries.into_iter().filter_map(entry_to_topic).collect();
        assert_eq!(topics[0].category, ContentCategory::EmailMarketing);
    }

    #[test]
    fn unmatched_products_default_to_startup() {
        assert_eq!(categorize_product("a nicer lamp"), ContentCategory::Startup);
    }
}
