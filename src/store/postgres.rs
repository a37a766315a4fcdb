use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{LinkStore, StoreError, UniqueConstraint};
use crate::models::{NewShortUrl, ShortUrl};

const SHORT_URL_COLUMNS: &str = "id, slug, long_url, created_at, expires_on";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            if let Some(constraint) = db_err.constraint().and_then(UniqueConstraint::from_name) {
                return StoreError::Duplicate(constraint);
            }
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl LinkStore for PgStore {
    async fn insert(&self, new: NewShortUrl) -> Result<ShortUrl, StoreError> {
        let sql = format!(
            "INSERT INTO short_urls ({SHORT_URL_COLUMNS}) VALUES ($1, $2, $3, $4, $5) \
             RETURNING {SHORT_URL_COLUMNS}"
        );
        sqlx::query_as::<_, ShortUrl>(&sql)
            .bind(new.id)
            .bind(&new.slug)
            .bind(&new.long_url)
            .bind(new.created_at)
            .bind(new.expires_on)
            .fetch_one(&self.pool)
            .await
            .map_err(map_insert_error)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShortUrl>, StoreError> {
        let sql = format!("SELECT {SHORT_URL_COLUMNS} FROM short_urls WHERE slug = $1");
        Ok(sqlx::query_as::<_, ShortUrl>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortUrl>, StoreError> {
        let sql = format!("SELECT {SHORT_URL_COLUMNS} FROM short_urls WHERE long_url = $1");
        Ok(sqlx::query_as::<_, ShortUrl>(&sql)
            .bind(long_url)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list(&self) -> Result<Vec<ShortUrl>, StoreError> {
        let sql = format!("SELECT {SHORT_URL_COLUMNS} FROM short_urls ORDER BY created_at ASC");
        Ok(sqlx::query_as::<_, ShortUrl>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM short_urls WHERE slug = $1")
            .bind(slug)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn record_click(&self, short_url_id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO clicks (id, short_url_id, created_at) VALUES ($1, $2, $3)")
            .bind(Uuid::new_v4())
            .bind(short_url_id)
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count_clicks(
        &self,
        slug: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Option<i64>, StoreError> {
        // GROUP BY yields no row at all when the slug is unknown.
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(clicks.id)
            FROM
                short_urls
                LEFT OUTER JOIN clicks ON
                    clicks.short_url_id = short_urls.id AND
                    ($2::timestamptz IS NULL OR clicks.created_at >= $2)
            WHERE short_urls.slug = $1
            GROUP BY short_urls.id
            "#,
        )
        .bind(slug)
        .bind(since)
        .fetch_optional(&self.pool)
        .await?;
        Ok(count)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM short_urls WHERE expires_on <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
