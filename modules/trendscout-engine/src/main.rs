use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use trendscout_common::{Config, ContentCategory, Topic, TrendSource};
use trendscout_engine::Researcher;
use trendscout_store::{Storage, TopicFilter};

#[derive(Parser)]
#[command(name = "trendscout")]
#[command(about = "Viral marketing topic research")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover trending topics across all configured sources
    Trending {
        /// Maximum topics to return
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Restrict to one category (e.g. seo, ai_marketing)
        #[arg(short, long)]
        category: Option<String>,

        /// Restrict to specific sources (e.g. reddit, hacker_news)
        #[arg(short, long)]
        source: Vec<String>,

        /// Override the minimum virality score
        #[arg(long)]
        min_score: Option<f64>,

        /// Persist results to the local database
        #[arg(long)]
        save: bool,
    },

    /// Search all sources for a query
    Search {
        query: String,

        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        #[arg(long)]
        save: bool,
    },

    /// Cross-source digest: top topics by category plus trending keywords
    Insights {
        #[arg(short, long, default_value_t = 30)]
        limit: usize,
    },

    /// Show what the local database holds
    Stats,

    /// Delete unsaved topics older than N days
    Cleanup {
        #[arg(long, default_value_t = 14)]
        days: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("trendscout=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Trending { limit, category, source, min_score, save } => {
            let categories = parse_category(category.as_deref())?;
            let sources = parse_sources(&source)?;
            let researcher = Researcher::from_config(&config);
            let (topics, session) = researcher
                .research_trending(limit, categories.as_deref(), sources.as_deref(), min_score)
                .await;
            print_topics(&topics);
            if save {
                persist(&config, &topics, &session).await?;
            }
        }
        Commands::Search { query, limit, save } => {
            let researcher = Researcher::from_config(&config);
            let (topics, session) = researcher.search(&query, limit).await;
            print_topics(&topics);
            if save {
                persist(&config, &topics, &session).await?;
            }
        }
        Commands::Insights { limit } => {
            let researcher = Researcher::from_config(&config);
            let insights = researcher.marketing_insights(limit).await;

            println!(
                "{} topics from {} sources\n",
                insights.topics.len(),
                insights.session.sources_queried.len()
            );
            for (category, topics) in &insights.by_category {
                println!("## {category} ({})", topics.len());
                for t in topics.iter().take(3) {
                    println!("  {:>6.2}  {}", t.virality_score, t.title);
                }
            }
            println!("\nTrending keywords:");
            for (kw, count) in &insights.top_keywords {
                println!("  {count:>3}  {kw}");
            }
        }
        Commands::Stats => {
            let store = Storage::connect(&config.db_path).await?;
            let stats = store.stats().await?;
            println!("topics:   {}", stats.total_topics);
            println!("saved:    {}", stats.saved_topics);
            println!("sessions: {}", stats.sessions);
            println!("avg score: {:.2}", stats.avg_virality);
            for (source, count) in &stats.by_source {
                println!("  {source}: {count}");
            }
            println!("\ntop stored topics:");
            let filter = TopicFilter {
                limit: Some(5),
                ..Default::default()
            };
            print_topics(&store.get_topics(&filter).await?);
        }
        Commands::Cleanup { days } => {
            let store = Storage::connect(&config.db_path).await?;
            let removed = store.cleanup_old_topics(days).await?;
            println!("removed {removed} topics older than {days} days");
        }
    }

    Ok(())
}

fn parse_sources(raw: &[String]) -> Result<Option<Vec<TrendSource>>> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.iter()
        .map(|s| {
            TrendSource::from_str_loose(s).ok_or_else(|| anyhow::anyhow!("unknown source: {s}"))
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn parse_category(raw: Option<&str>) -> Result<Option<Vec<ContentCategory>>> {
    match raw {
        None => Ok(None),
        Some(s) => match ContentCategory::from_str_loose(s) {
            Some(c) => Ok(Some(vec![c])),
            None => anyhow::bail!("unknown category: {s}"),
        },
    }
}

async fn persist(
    config: &Config,
    topics: &[Topic],
    session: &trendscout_common::ResearchSession,
) -> Result<()> {
    let store = Storage::connect(&config.db_path).await?;
    let saved = store.save_topics(topics).await?;
    store.save_session(session).await?;
    info!(saved, "persisted research results");
    Ok(())
}

fn print_topics(topics: &[Topic]) {
    for (i, t) in topics.iter().enumerate() {
        println!(
            "{:>3}. [{:>6.2}] {} ({} / {})",
            i + 1,
            t.virality_score,
            t.title,
            t.source,
            t.category
        );
        if let Some(url) = &t.url {
            println!("     {url}");
        }
    }
}
