use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const MAX_SLUG_LEN: usize = 64;

/// Slugs that would shadow a fixed route.
pub const RESERVED_SLUGS: &[&str] = &["links", "health"];

/// An input field of a link request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    LongUrl,
    Slug,
    ExpiresOn,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Field::LongUrl => "longUrl",
            Field::Slug => "slug",
            Field::ExpiresOn => "expiresOn",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("long URL is required")]
    EmptyLongUrl,
    #[error("long URL is not a valid URL")]
    MalformedLongUrl,
    #[error("long URL must use http or https")]
    UnsupportedScheme,
    #[error("slug may only contain letters, digits, '-' and '_'")]
    InvalidSlug,
    #[error("slug must be at most 64 characters")]
    SlugTooLong,
    #[error("slug is reserved")]
    ReservedSlug,
    #[error("expiry must be in the future")]
    ExpiryInPast,
    /// A field-level rejection reported by the server.
    #[error("{reason}")]
    Rejected { field: Field, reason: String },
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            ValidationError::EmptyLongUrl
            | ValidationError::MalformedLongUrl
            | ValidationError::UnsupportedScheme => Field::LongUrl,
            ValidationError::InvalidSlug
            | ValidationError::SlugTooLong
            | ValidationError::ReservedSlug => Field::Slug,
            ValidationError::ExpiryInPast => Field::ExpiresOn,
            ValidationError::Rejected { field, .. } => *field,
        }
    }
}

pub fn validate_long_url(raw: &str) -> Result<Url, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyLongUrl);
    }
    // The URL parser silently drops tabs and newlines; the stored text must
    // match what gets redirected to.
    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(ValidationError::MalformedLongUrl);
    }

    let url = Url::parse(trimmed).map_err(|_| ValidationError::MalformedLongUrl)?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(ValidationError::UnsupportedScheme),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::MalformedLongUrl);
    }

    Ok(url)
}

/// Checks a caller-chosen slug. Empty slugs are handled by the caller.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.len() > MAX_SLUG_LEN {
        return Err(ValidationError::SlugTooLong);
    }

    let well_formed = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !well_formed {
        return Err(ValidationError::InvalidSlug);
    }

    if RESERVED_SLUGS.iter().any(|r| r.eq_ignore_ascii_case(slug)) {
        return Err(ValidationError::ReservedSlug);
    }

    Ok(())
}

/// Trims a slug input and maps blank to `None`.
pub fn normalize_slug(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
