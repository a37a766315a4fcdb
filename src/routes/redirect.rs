use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use url::Url;

use crate::errors::AppError;
use crate::state::AppState;

/// `GET /{slug}`: permanent redirect to the long URL, counted as a click.
pub async fn access_link(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let link = state.links.access(&slug).await?;
    // Serialized URLs are percent-encoded ASCII, which is always a valid header.
    let location = Url::parse(&link.long_url)
        .ok()
        .and_then(|url| HeaderValue::from_str(url.as_str()).ok())
        .ok_or_else(|| {
            tracing::error!(%slug, long_url = %link.long_url, "long url is not a valid location");
            AppError::Internal
        })?;
    tracing::debug!(%slug, target = ?location, "redirecting");

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [
            (header::LOCATION, location),
            (header::CACHE_CONTROL, HeaderValue::from_static("private,max-age=0")),
        ],
    )
        .into_response())
}
