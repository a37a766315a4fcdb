//! Persistence port for short links and their clicks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewShortUrl, ShortUrl};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Unique constraints on `short_urls`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueConstraint {
    LongUrl,
    Slug,
}

impl UniqueConstraint {
    pub fn name(self) -> &'static str {
        match self {
            UniqueConstraint::LongUrl => "uq_short_urls_long_url",
            UniqueConstraint::Slug => "uq_short_urls_slug",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "uq_short_urls_long_url" => Some(UniqueConstraint::LongUrl),
            "uq_short_urls_slug" => Some(UniqueConstraint::Slug),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate value violates {}", .0.name())]
    Duplicate(UniqueConstraint),
    #[error("database error")]
    Database(#[from] sqlx::Error),
    #[error("migration error")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

#[async_trait]
pub trait LinkStore: Send + Sync {
    async fn insert(&self, new: NewShortUrl) -> Result<ShortUrl, StoreError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShortUrl>, StoreError>;

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortUrl>, StoreError>;

    /// All links, oldest first.
    async fn list(&self) -> Result<Vec<ShortUrl>, StoreError>;

    /// Returns whether a row was removed.
    async fn delete_by_slug(&self, slug: &str) -> Result<bool, StoreError>;

    async fn record_click(&self, short_url_id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Clicks at or after `since` (all clicks when `None`).
    /// `None` means the slug does not exist.
    async fn count_clicks(
        &self,
        slug: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Option<i64>, StoreError>;

    /// Deletes links with `expires_on <= now`, returning how many were removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    fn backend(&self) -> &'static str;
}
