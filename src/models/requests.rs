use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::short_url::TimePeriod;

/// Body of `POST /links`. Built by the link form and parsed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRequest {
    #[serde(default)]
    pub long_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<DateTime<Utc>>,
}

impl LinkRequest {
    pub fn new(long_url: impl Into<String>, slug: Option<String>) -> Self {
        Self {
            long_url: long_url.into(),
            slug,
            expires_on: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClicksQuery {
    #[serde(default)]
    pub time_period: TimePeriod,
}
