//! SQLite-backed persistence for discovered topics and research sessions.

pub mod error;
mod store;

pub use error::{Result, StoreError};
pub use store::{Storage, StorageStats, TopicFilter};
