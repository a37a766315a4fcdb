//! In-memory store, used when no database is configured and in tests.
//! Data is lost on restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{LinkStore, StoreError, UniqueConstraint};
use crate::models::{Click, NewShortUrl, ShortUrl};

#[derive(Default)]
struct State {
    links: Vec<ShortUrl>,
    clicks: Vec<Click>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn insert(&self, new: NewShortUrl) -> Result<ShortUrl, StoreError> {
        let mut state = self.state.write().await;

        if state.links.iter().any(|l| l.long_url == new.long_url) {
            return Err(StoreError::Duplicate(UniqueConstraint::LongUrl));
        }
        if state.links.iter().any(|l| l.slug == new.slug) {
            return Err(StoreError::Duplicate(UniqueConstraint::Slug));
        }

        let record = ShortUrl::from(new);
        state.links.push(record.clone());
        Ok(record)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShortUrl>, StoreError> {
        let state = self.state.read().await;
        Ok(state.links.iter().find(|l| l.slug == slug).cloned())
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortUrl>, StoreError> {
        let state = self.state.read().await;
        Ok(state.links.iter().find(|l| l.long_url == long_url).cloned())
    }

    async fn list(&self) -> Result<Vec<ShortUrl>, StoreError> {
        let state = self.state.read().await;
        let mut links = state.links.clone();
        links.sort_by_key(|l| l.created_at);
        Ok(links)
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        let Some(pos) = state.links.iter().position(|l| l.slug == slug) else {
            return Ok(false);
        };
        let removed = state.links.remove(pos);
        state.clicks.retain(|c| c.short_url_id != removed.id);
        Ok(true)
    }

    async fn record_click(&self, short_url_id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.clicks.push(Click {
            id: Uuid::new_v4(),
            short_url_id,
            created_at: at,
        });
        Ok(())
    }

    async fn count_clicks(
        &self,
        slug: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Option<i64>, StoreError> {
        let state = self.state.read().await;
        let Some(link) = state.links.iter().find(|l| l.slug == slug) else {
            return Ok(None);
        };
        let count = state
            .clicks
            .iter()
            .filter(|c| c.short_url_id == link.id)
            .filter(|c| since.is_none_or(|start| c.created_at >= start))
            .count();
        Ok(Some(count as i64))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        let before = state.links.len();
        state.links.retain(|l| !l.is_expired(now));
        let State { links, clicks } = &mut *state;
        clicks.retain(|c| links.iter().any(|l| l.id == c.short_url_id));
        Ok((before - links.len()) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_link(slug: &str, long_url: &str, created_at: DateTime<Utc>) -> NewShortUrl {
        NewShortUrl {
            id: Uuid::new_v4(),
            slug: slug.into(),
            long_url: long_url.into(),
            created_at,
            expires_on: None,
        }
    }

    #[tokio::test]
    async fn insert_reports_the_violated_constraint() {
        let store = MemoryStore::new();
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        store.insert(new_link("cf", "https://www.cloudflare.com", t)).await.unwrap();

        let err = store
            .insert(new_link("other", "https://www.cloudflare.com", t))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(UniqueConstraint::LongUrl)));

        let err = store
            .insert(new_link("cf", "https://example.com", t))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(UniqueConstraint::Slug)));
    }

    #[tokio::test]
    async fn list_is_oldest_first() {
        let store = MemoryStore::new();
        let later = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        store.insert(new_link("b", "https://b.example", later)).await.unwrap();
        store.insert(new_link("a", "https://a.example", earlier)).await.unwrap();

        let slugs: Vec<_> = store.list().await.unwrap().into_iter().map(|l| l.slug).collect();
        assert_eq!(slugs, ["a", "b"]);
    }

    #[tokio::test]
    async fn deleting_a_link_drops_its_clicks() {
        let store = MemoryStore::new();
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let link = store.insert(new_link("a", "https://a.example", t)).await.unwrap();
        store.record_click(link.id, t).await.unwrap();

        assert!(store.delete_by_slug("a").await.unwrap());
        assert!(!store.delete_by_slug("a").await.unwrap());
        assert_eq!(store.count_clicks("a", None).await.unwrap(), None);
        assert!(store.state.read().await.clicks.is_empty());
    }
}
