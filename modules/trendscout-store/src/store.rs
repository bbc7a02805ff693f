// SQLite persistence for topics and research sessions.

use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::info;
use uuid::Uuid;

use trendscout_common::{ContentCategory, ResearchSession, Topic, TrendSource};

use crate::error::Result;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS topics (
    id               TEXT PRIMARY KEY,
    title            TEXT NOT NULL,
    description      TEXT,
    url              TEXT,
    source           TEXT NOT NULL,
    category         TEXT NOT NULL,
    score            INTEGER NOT NULL DEFAULT 0,
    comments         INTEGER NOT NULL DEFAULT 0,
    shares           INTEGER NOT NULL DEFAULT 0,
    views            INTEGER NOT NULL DEFAULT 0,
    virality_score   REAL NOT NULL DEFAULT 0,
    trending_velocity REAL NOT NULL DEFAULT 0,
    keywords         TEXT NOT NULL DEFAULT '[]',
    author           TEXT,
    published_at     TEXT,
    discovered_at    TEXT NOT NULL,
    saved            INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_topics_source ON topics(source);
CREATE INDEX IF NOT EXISTS idx_topics_category ON topics(category);
CREATE INDEX IF NOT EXISTS idx_topics_virality ON topics(virality_score);
CREATE INDEX IF NOT EXISTS idx_topics_discovered ON topics(discovered_at);

CREATE TABLE IF NOT EXISTS sessions (
    id               TEXT PRIMARY KEY,
    started_at       TEXT NOT NULL,
    completed_at     TEXT,
    topics_discovered INTEGER NOT NULL DEFAULT 0,
    topics_curated   INTEGER NOT NULL DEFAULT 0,
    sources_queried  TEXT NOT NULL DEFAULT '[]',
    filters_applied  TEXT NOT NULL DEFAULT '{}'
);
"#;

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

/// Row filters for [`Storage::get_topics`]. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct TopicFilter {
    pub source: Option<TrendSource>,
    pub category: Option<ContentCategory>,
    pub min_score: Option<f64>,
    pub saved_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct StorageStats {
    pub total_topics: i64,
    pub saved_topics: i64,
    pub sessions: i64,
    pub avg_virality: f64,
    pub by_source: Vec<(String, i64)>,
}

#[derive(Debug, sqlx::FromRow)]
struct TopicRow {
    id: String,
    title: String,
    description: Option<String>,
    url: Option<String>,
    source: String,
    category: String,
    score: i64,
    comments: i64,
    shares: i64,
    views: i64,
    virality_score: f64,
    trending_velocity: f64,
    keywords: String,
    author: Option<String>,
    published_at: Option<DateTime<Utc>>,
    discovered_at: DateTime<Utc>,
}

impl TopicRow {
    fn into_topic(self) -> Topic {
        Topic {
            id: self.id,
            title: self.title,
            description: self.description,
            url: self.url,
            source: TrendSource::from_str_loose(&self.source).unwrap_or(TrendSource::RssFeed),
            category: ContentCategory::from_str_loose(&self.category).unwrap_or_default(),
            score: self.score.max(0) as u32,
            comments: self.comments.max(0) as u32,
            shares: self.shares.max(0) as u32,
            views: self.views.max(0) as u32,
            virality_score: self.virality_score,
            trending_velocity: self.trending_velocity,
            keywords: serde_json::from_str(&self.keywords).unwrap_or_default(),
            author: self.author,
            published_at: self.published_at,
            discovered_at: self.discovered_at,
        }
    }
}

impl Storage {
    /// Open (creating if missing) the database at `path` and apply the
    /// schema.
    pub async fn connect(path: &str) -> Result<Self> {
        let url = format!("sqlite://{path}?mode=rwc");
        let pool = SqlitePoolOptions::new().connect(&url).await?;
        let store = Self { pool };
        store.init_schema().await?;
        info!(path, "storage ready");
        Ok(store)
    }

    /// In-memory database, used by tests.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Upsert one topic. Re-discovering a topic refreshes its engagement
    /// numbers and score but never clears the saved flag.
    pub async fn save_topic(&self, topic: &Topic) -> Result<()> {
        let keywords = serde_json::to_string(&topic.keywords)?;
        sqlx::query(
            r#"
            INSERT INTO topics
                (id, title, description, url, source, category,
                 score, comments, shares, views,
                 virality_score, trending_velocity,
                 keywords, author, published_at, discovered_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                score = excluded.score,
                comments = excluded.comments,
                shares = excluded.shares,
                views = excluded.views,
                virality_score = excluded.virality_score,
                trending_velocity = excluded.trending_velocity,
                keywords = excluded.keywords
            "#,
        )
        .bind(&topic.id)
        .bind(&topic.title)
        .bind(&topic.description)
        .bind(&topic.url)
        .bind(topic.source.to_string())
        .bind(topic.category.to_string())
        .bind(i64::from(topic.score))
        .bind(i64::from(topic.comments))
        .bind(i64::from(topic.shares))
        .bind(i64::from(topic.views))
        .bind(topic.virality_score)
        .bind(topic.trending_velocity)
        .bind(keywords)
        .bind(&topic.author)
        .bind(topic.published_at)
        .bind(topic.discovered_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn save_topics(&self, topics: &[Topic]) -> Result<usize> {
        for topic in topics {
            self.save_topic(topic).await?;
        }
        Ok(topics.len())
    }

    pub async fn get_topic(&self, id: &str) -> Result<Option<Topic>> {
        let row = sqlx::query_as::<_, TopicRow>("SELECT * FROM topics WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(TopicRow::into_topic))
    }

    /// Topics matching `filter`, best virality first.
    pub async fn get_topics(&self, filter: &TopicFilter) -> Result<Vec<Topic>> {
        let mut sql = String::from("SELECT * FROM topics WHERE 1=1");
        if filter.source.is_some() {
            sql.push_str(" AND source = ?");
        }
        if filter.category.is_some() {
            sql.push_str(" AND category = ?");
        }
        if filter.min_score.is_some() {
            sql.push_str(" AND virality_score >= ?");
        }
        if filter.saved_only {
            sql.push_str(" AND saved = 1");
        }
        sql.push_str(" ORDER BY virality_score DESC LIMIT ? OFFSET ?");

        let mut query = sqlx::query_as::<_, TopicRow>(&sql);
        if let Some(source) = filter.source {
            query = query.bind(source.to_string());
        }
        if let Some(category) = filter.category {
            query = query.bind(category.to_string());
        }
        if let Some(min_score) = filter.min_score {
            query = query.bind(min_score);
        }
        query = query
            .bind(filter.limit.unwrap_or(50))
            .bind(filter.offset.unwrap_or(0));

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(TopicRow::into_topic).collect())
    }

    /// Substring match on title, description, or keywords.
    pub async fn search_topics(&self, query: &str, limit: i64) -> Result<Vec<Topic>> {
        let pattern = format!("%{query}%");
        let rows = sqlx::query_as::<_, TopicRow>(
            r#"
            SELECT * FROM topics
            WHERE title LIKE ? OR description LIKE ? OR keywords LIKE ?
            ORDER BY virality_score DESC
            LIMIT ?
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(TopicRow::into_topic).collect())
    }

    /// Set or clear the saved flag; saved topics survive cleanup. Returns
    /// false when the id is unknown.
    pub async fn mark_saved(&self, id: &str, saved: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE topics SET saved = ? WHERE id = ?")
            .bind(i64::from(saved))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn save_session(&self, session: &ResearchSession) -> Result<()> {
        let sources = serde_json::to_string(&session.sources_queried)?;
        let filters = serde_json::to_string(&session.filters_applied)?;
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO sessions
                (id, started_at, completed_at,
                 topics_discovered, topics_curated,
                 sources_queried, filters_applied)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(session.id.to_string())
        .bind(session.started_at)
        .bind(session.completed_at)
        .bind(i64::from(session.topics_discovered))
        .bind(i64::from(session.topics_curated))
        .bind(sources)
        .bind(filters)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_session(&self, id: Uuid) -> Result<Option<ResearchSession>> {
        #[derive(sqlx::FromRow)]
        struct SessionRow {
            id: String,
            started_at: DateTime<Utc>,
            completed_at: Option<DateTime<Utc>>,
            topics_discovered: i64,
            topics_curated: i64,
            sources_queried: String,
            filters_applied: String,
        }

        let row = sqlx::query_as::<_, SessionRow>("SELECT * FROM sessions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| ResearchSession {
            id: Uuid::parse_str(&r.id).unwrap_or_else(|_| Uuid::nil()),
            started_at: r.started_at,
            completed_at: r.completed_at,
            topics_discovered: r.topics_discovered.max(0) as u32,
            topics_curated: r.topics_curated.max(0) as u32,
            sources_queried: serde_json::from_str(&r.sources_queried).unwrap_or_default(),
            filters_applied: serde_json::from_str(&r.filters_applied).unwrap_or_default(),
        }))
    }

    pub async fn stats(&self) -> Result<StorageStats> {
        let total_topics: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM topics")
            .fetch_one(&self.pool)
            .await?;
        let saved_topics: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM topics WHERE saved = 1")
            .fetch_one(&self.pool)
            .await?;
        let sessions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(&self.pool)
            .await?;
        let avg_virality: Option<f64> =
            sqlx::query_scalar("SELECT AVG(virality_score) FROM topics")
                .fetch_one(&self.pool)
                .await?;
        let by_source: Vec<(String, i64)> = sqlx::query_as(
            "SELECT source, COUNT(*) FROM topics GROUP BY source ORDER BY COUNT(*) DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(StorageStats {
            total_topics,
            saved_topics,
            sessions,
            avg_virality: avg_virality.unwrap_or(0.0),
            by_source,
        })
    }

    /// Delete unsaved topics discovered more than `days` days ago. Returns
    /// the number of rows removed.
    pub async fn cleanup_old_topics(&self, days: i64) -> Result<u64> {
        let cutoff = Utc::now() - Duration::days(days);
        let result = sqlx::query("DELETE FROM topics WHERE saved = 0 AND discovered_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
