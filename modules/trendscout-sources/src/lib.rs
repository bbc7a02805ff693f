pub mod client;
pub mod error;
pub mod hacker_news;
pub mod product_hunt;
pub mod reddit;
pub mod rss;
pub mod taxonomy;

pub use client::HttpClient;
pub use error::{Result, SourceError};
pub use hacker_news::HackerNewsSource;
pub use product_hunt::ProductHuntSource;
pub use reddit::RedditSource;
pub use rss::RssSource;
