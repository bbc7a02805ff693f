use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Enums ---

/// External systems a topic can be discovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSource {
    Reddit,
    GoogleTrends,
    HackerNews,
    ProductHunt,
    RssFeed,
    Twitter,
    LinkedIn,
    NewsApi,
}

impl std::fmt::Display for TrendSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendSource::Reddit => write!(f, "reddit"),
            TrendSource::GoogleTrends => write!(f, "google_trends"),
            TrendSource::HackerNews => write!(f, "hacker_news"),
            TrendSource::ProductHunt => write!(f, "product_hunt"),
            TrendSource::RssFeed => write!(f, "rss_feed"),
            TrendSource::Twitter => write!(f, "twitter"),
            TrendSource::LinkedIn => write!(f, "linkedin"),
            TrendSource::NewsApi => write!(f, "news_api"),
        }
    }
}

impl TrendSource {
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reddit" => Some(Self::Reddit),
            "google_trends" | "google-trends" => Some(Self::GoogleTrends),
            "hacker_news" | "hacker-news" | "hn" => Some(Self::HackerNews),
            "product_hunt" | "product-hunt" => Some(Self::ProductHunt),
            "rss_feed" | "rss" => Some(Self::RssFeed),
            "twitter" => Some(Self::Twitter),
            "linkedin" => Some(Self::LinkedIn),
            "news_api" => Some(Self::NewsApi),
            _ => None,
        }
    }
}

/// Marketing content categories a topic is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    Seo,
    SocialMedia,
    EmailMarketing,
    ContentMarketing,
    PaidAds,
    Analytics,
    Branding,
    GrowthHacking,
    Influencer,
    VideoMarketing,
    AiMarketing,
    Ecommerce,
    B2b,
    Startup,
    #[default]
    General,
}

impl std::fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentCategory::Seo => write!(f, "seo"),
            ContentCategory::SocialMedia => write!(f, "social_media"),
            ContentCategory::EmailMarketing => write!(f, "email_marketing"),
            ContentCategory::ContentMarketing => write!(f, "content_marketing"),
            ContentCategory::PaidAds => write!(f, "paid_ads"),
            ContentCategory::Analytics => write!(f, "analytics"),
            ContentCategory::Branding => write!(f, "branding"),
            ContentCategory::GrowthHacking => write!(f, "growth_hacking"),
            ContentCategory::Influencer => write!(f, "influencer"),
            ContentCategory::VideoMarketing => write!(f, "video_marketing"),
            ContentCategory::AiMarketing => write!(f, "ai_marketing"),
            ContentCategory::Ecommerce => write!(f, "ecommerce"),
            ContentCategory::B2b => write!(f, "b2b"),
            ContentCategory::Startup => write!(f, "startup"),
            ContentCategory::General => write!(f, "general"),
        }
    }
}

impl ContentCategory {
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "seo" => Some(Self::Seo),
            "social_media" | "social-media" => Some(Self::SocialMedia),
            "email_marketing" | "email" => Some(Self::EmailMarketing),
            "content_marketing" | "content" => Some(Self::ContentMarketing),
            "paid_ads" | "ads" => Some(Self::PaidAds),
            "analytics" => Some(Self::Analytics),
            "branding" => Some(Self::Branding),
            "growth_hacking" | "growth" => Some(Self::GrowthHacking),
            "influencer" => Some(Self::Influencer),
            "video_marketing" | "video" => Some(Self::VideoMarketing),
            "ai_marketing" | "ai" => Some(Self::AiMarketing),
            "ecommerce" => Some(Self::Ecommerce),
            "b2b" => Some(Self::B2b),
            "startup" => Some(Self::Startup),
            "general" => Some(Self::General),
            _ => None,
        }
    }
}

// --- Topic ---

/// A candidate content opportunity discovered from one source.
///
/// `virality_score` is the only field the curation pipeline writes; every
/// other field is fixed at ingestion by the source adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub source: TrendSource,
    pub category: ContentCategory,

    // Engagement metrics
    pub score: u32,
    pub comments: u32,
    pub shares: u32,
    pub views: u32,

    // Virality scoring
    pub virality_score: f64,
    /// Rate-of-growth signal. 0.0 means "unknown, estimate from engagement".
    pub trending_velocity: f64,

    // Metadata
    pub keywords: Vec<String>,
    pub author: Option<String>,

    // Timestamps
    pub published_at: Option<DateTime<Utc>>,
    pub discovered_at: DateTime<Utc>,
}

impl Topic {
    /// A bare topic with defaults for everything the source didn't report.
    /// `discovered_at` is stamped here, once.
    pub fn new(id: impl Into<String>, title: impl Into<String>, source: TrendSource) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            url: None,
            source,
            category: ContentCategory::General,
            score: 0,
            comments: 0,
            shares: 0,
            views: 0,
            virality_score: 0.0,
            trending_velocity: 0.0,
            keywords: Vec::new(),
            author: None,
            published_at: None,
            discovered_at: Utc::now(),
        }
    }

    /// Hours since publication, or None when the source reported no timestamp.
    pub fn hours_old(&self, now: DateTime<Utc>) -> Option<f64> {
        self.published_at
            .map(|p| (now - p).num_seconds() as f64 / 3600.0)
    }
}

// --- ResearchSession ---

/// Bookkeeping for one orchestration run. Created at the start of a run,
/// written at fixed checkpoints, immutable once `completed_at` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchSession {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,

    pub topics_discovered: u32,
    pub topics_curated: u32,

    pub sources_queried: Vec<TrendSource>,
    pub filters_applied: serde_json::Map<String, serde_json::Value>,
}

impl ResearchSession {
    pub fn begin(
        sources: Vec<TrendSource>,
        filters: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            completed_at: None,
            topics_discovered: 0,
            topics_curated: 0,
            sources_queried: sources,
            filters_applied: filters,
        }
    }

    pub fn finish(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }
}
