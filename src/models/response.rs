use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::short_url::{ShortUrl, TimePeriod};
use crate::validation::Field;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortUrlResponse {
    pub short_url: String,
    pub slug: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_on: Option<DateTime<Utc>>,
}

impl ShortUrlResponse {
    pub fn new(record: ShortUrl, base_url: &str) -> Self {
        Self {
            short_url: format!("{}/{}", base_url.trim_end_matches('/'), record.slug),
            slug: record.slug,
            long_url: record.long_url,
            created_at: record.created_at,
            expires_on: record.expires_on,
        }
    }
}

/// What a client needs from a successful create; other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedLink {
    pub slug: String,
    pub short_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClicksResponse {
    pub slug: String,
    pub count: i64,
    pub time_period: TimePeriod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: Field, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        errors: Vec<FieldError>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    #[test]
    fn short_url_joins_base_and_slug() {
        let record = ShortUrl {
            id: Uuid::new_v4(),
            slug: "ex1".into(),
            long_url: "https://example.com".into(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            expires_on: None,
        };
        let body = ShortUrlResponse::new(record, "https://sho.rt/");
        assert_eq!(body.short_url, "https://sho.rt/ex1");

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["shortUrl"], "https://sho.rt/ex1");
        assert_eq!(json["longUrl"], "https://example.com");
        assert!(json["expiresOn"].is_null());
    }
}
