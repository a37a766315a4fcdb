use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::clock::Clock;
use crate::errors::AppError;
use crate::models::{LinkRequest, NewShortUrl, ShortUrl, TimePeriod};
use crate::slug::generate_slug;
use crate::store::{LinkStore, StoreError, UniqueConstraint};
use crate::validation::{ValidationError, normalize_slug, validate_long_url, validate_slug};

/// Attempts at drawing an unused random slug before giving up.
const GENERATED_SLUG_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Creation {
    Created(ShortUrl),
    /// The long URL was already shortened; holds the existing record.
    AlreadyExists(ShortUrl),
}

type SlugGenerator = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Clone)]
pub struct LinkService {
    store: Arc<dyn LinkStore>,
    clock: Arc<dyn Clock>,
    slugs: SlugGenerator,
}

impl LinkService {
    pub fn new(store: Arc<dyn LinkStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            slugs: Arc::new(generate_slug),
        }
    }

    /// Replaces the random slug source.
    pub fn with_slug_generator(
        mut self,
        slugs: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        self.slugs = Arc::new(slugs);
        self
    }

    pub fn store(&self) -> &dyn LinkStore {
        self.store.as_ref()
    }

    pub async fn create(&self, request: LinkRequest) -> Result<Creation, AppError> {
        let now = self.clock.now();

        validate_long_url(&request.long_url)?;
        let requested_slug = normalize_slug(request.slug.as_deref());
        if let Some(slug) = &requested_slug {
            validate_slug(slug)?;
        }
        if request.expires_on.is_some_and(|at| at <= now) {
            return Err(ValidationError::ExpiryInPast.into());
        }

        let long_url = request.long_url.trim().to_owned();
        self.evict_expired(&long_url, requested_slug.as_deref(), now).await?;

        let attempts = if requested_slug.is_some() {
            1
        } else {
            GENERATED_SLUG_ATTEMPTS
        };

        for _ in 0..attempts {
            let slug = requested_slug.clone().unwrap_or_else(|| (self.slugs)());
            let new = NewShortUrl {
                id: Uuid::new_v4(),
                slug,
                long_url: long_url.clone(),
                created_at: now,
                expires_on: request.expires_on,
            };

            match self.store.insert(new).await {
                Ok(record) => {
                    tracing::info!(
                        slug = %record.slug,
                        long_url = %record.long_url,
                        "short url created"
                    );
                    return Ok(Creation::Created(record));
                }
                Err(StoreError::Duplicate(constraint)) => {
                    let existing = self.store.find_by_long_url(&long_url).await?;
                    if let Some(existing) = existing.filter(|l| !l.is_expired(now)) {
                        return Ok(Creation::AlreadyExists(existing));
                    }
                    if requested_slug.is_some() {
                        return Err(AppError::Conflict);
                    }
                    tracing::debug!(
                        constraint = constraint.name(),
                        "generated slug collided, retrying"
                    );
                    if constraint != UniqueConstraint::Slug {
                        break;
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }

        tracing::warn!("could not allocate an unused slug");
        Err(AppError::Internal)
    }

    /// Deletes expired rows that still hold this long URL or slug, so that
    /// they neither answer as the existing link nor block the slug.
    async fn evict_expired(
        &self,
        long_url: &str,
        slug: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let by_url = self.store.find_by_long_url(long_url).await?;
        let by_slug = match slug {
            Some(slug) => self.store.find_by_slug(slug).await?,
            None => None,
        };
        for stale in by_url.into_iter().chain(by_slug) {
            if stale.is_expired(now) && self.store.delete_by_slug(&stale.slug).await? {
                tracing::debug!(slug = %stale.slug, "evicted expired short url");
            }
        }
        Ok(())
    }

    /// A live (unexpired) link by slug.
    pub async fn get(&self, slug: &str) -> Result<ShortUrl, AppError> {
        let now = self.clock.now();
        match self.store.find_by_slug(slug).await? {
            Some(link) if !link.is_expired(now) => Ok(link),
            _ => Err(AppError::NotFound(slug.to_owned())),
        }
    }

    pub async fn list(&self) -> Result<Vec<ShortUrl>, AppError> {
        let now = self.clock.now();
        let mut links = self.store.list().await?;
        links.retain(|l| !l.is_expired(now));
        Ok(links)
    }

    pub async fn delete(&self, slug: &str) -> Result<(), AppError> {
        if self.store.delete_by_slug(slug).await? {
            tracing::info!(%slug, "short url deleted");
            Ok(())
        } else {
            Err(AppError::NotFound(slug.to_owned()))
        }
    }

    /// Resolves a slug for redirection and records the click.
    pub async fn access(&self, slug: &str) -> Result<ShortUrl, AppError> {
        let link = self.get(slug).await?;
        self.store.record_click(link.id, self.clock.now()).await?;
        Ok(link)
    }

    pub async fn clicks(&self, slug: &str, period: TimePeriod) -> Result<i64, AppError> {
        let since = period.since(self.clock.now());
        self.store
            .count_clicks(slug, since)
            .await?
            .ok_or_else(|| AppError::NotFound(slug.to_owned()))
    }

    pub async fn cleanup_expired(&self) -> Result<u64, StoreError> {
        self.store.delete_expired(self.clock.now()).await
    }
}
