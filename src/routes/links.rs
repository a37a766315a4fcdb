use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode},
};

use crate::errors::AppError;
use crate::models::{ClicksQuery, ClicksResponse, LinkRequest, ShortUrlResponse};
use crate::services::Creation;
use crate::state::AppState;

/// `POST /links`
pub async fn create_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<LinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortUrlResponse>), AppError> {
    let Json(request) =
        payload.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;
    let base_url = state.base_url(&headers);

    let (status, record) = match state.links.create(request).await? {
        Creation::Created(record) => (StatusCode::CREATED, record),
        Creation::AlreadyExists(record) => (StatusCode::OK, record),
    };
    Ok((status, Json(ShortUrlResponse::new(record, &base_url))))
}

/// `GET /links`
pub async fn list_links(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ShortUrlResponse>>, AppError> {
    let base_url = state.base_url(&headers);
    let links = state.links.list().await?;
    Ok(Json(
        links
            .into_iter()
            .map(|record| ShortUrlResponse::new(record, &base_url))
            .collect(),
    ))
}

/// `GET /links/{slug}`
pub async fn get_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Result<Json<ShortUrlResponse>, AppError> {
    let record = state.links.get(&slug).await?;
    Ok(Json(ShortUrlResponse::new(record, &state.base_url(&headers))))
}

/// `DELETE /links/{slug}`
pub async fn delete_link(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    state.links.delete(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /links/{slug}/clicks?timePeriod=...`
pub async fn get_clicks(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    query: Result<Query<ClicksQuery>, QueryRejection>,
) -> Result<Json<ClicksResponse>, AppError> {
    let Query(query) =
        query.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;
    let count = state.links.clicks(&slug, query.time_period).await?;
    Ok(Json(ClicksResponse {
        slug,
        count,
        time_period: query.time_period,
    }))
}
