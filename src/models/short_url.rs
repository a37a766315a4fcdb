use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ShortUrl {
    pub id: Uuid,
    pub slug: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_on: Option<DateTime<Utc>>,
}

impl ShortUrl {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_on.is_some_and(|at| at <= now)
    }
}

/// A row to insert; ids and timestamps are assigned by the caller.
#[derive(Debug, Clone)]
pub struct NewShortUrl {
    pub id: Uuid,
    pub slug: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_on: Option<DateTime<Utc>>,
}

impl From<NewShortUrl> for ShortUrl {
    fn from(new: NewShortUrl) -> Self {
        Self {
            id: new.id,
            slug: new.slug,
            long_url: new.long_url,
            created_at: new.created_at,
            expires_on: new.expires_on,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Click {
    pub id: Uuid,
    pub short_url_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimePeriod {
    #[serde(rename = "24_HOURS")]
    Last24Hours,
    #[serde(rename = "1_WEEK")]
    PastWeek,
    #[default]
    #[serde(rename = "ALL_TIME")]
    AllTime,
}

impl TimePeriod {
    /// Start of the window ending at `now`, or `None` for all time.
    pub fn since(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TimePeriod::Last24Hours => Some(now - Duration::hours(24)),
            TimePeriod::PastWeek => Some(now - Duration::weeks(1)),
            TimePeriod::AllTime => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimePeriod::Last24Hours => "24_HOURS",
            TimePeriod::PastWeek => "1_WEEK",
            TimePeriod::AllTime => "ALL_TIME",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn window_starts() {
        let now = Utc.with_ymd_and_hms(2022, 5, 10, 12, 0, 0).unwrap();
        assert_eq!(
            TimePeriod::Last24Hours.since(now),
            Some(Utc.with_ymd_and_hms(2022, 5, 9, 12, 0, 0).unwrap())
        );
        assert_eq!(
            TimePeriod::PastWeek.since(now),
            Some(Utc.with_ymd_and_hms(2022, 5, 3, 12, 0, 0).unwrap())
        );
        assert_eq!(TimePeriod::AllTime.since(now), None);
    }

    #[test]
    fn expiry_is_inclusive() {
        let now = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let mut link = ShortUrl {
            id: Uuid::new_v4(),
            slug: "cf".into(),
            long_url: "https://www.cloudflare.com".into(),
            created_at: now,
            expires_on: Some(now),
        };
        assert!(link.is_expired(now));
        link.expires_on = None;
        assert!(!link.is_expired(now));
    }
}
