use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::{ErrorResponse, FieldError};
use crate::store::StoreError;
use crate::validation::{Field, ValidationError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("slug already exists")]
    Conflict,
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("internal error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, errors) = match self {
            AppError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION",
                "invalid input".to_owned(),
                vec![FieldError::new(err.field(), err.to_string())],
            ),
            AppError::InvalidRequest(detail) => {
                (StatusCode::BAD_REQUEST, "VALIDATION", detail, Vec::new())
            }
            AppError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "not found".to_owned(),
                vec![FieldError::new(Field::Slug, "not found")],
            ),
            AppError::Conflict => (
                StatusCode::CONFLICT,
                "CONFLICT",
                "already exists".to_owned(),
                vec![FieldError::new(Field::Slug, "must be unique")],
            ),
            AppError::Store(err) => {
                tracing::error!(error = ?err, "store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "internal error".to_owned(),
                    Vec::new(),
                )
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "internal error".to_owned(),
                Vec::new(),
            ),
        };
        let body = ErrorResponse::new(code, message, errors);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        let cases = [
            (AppError::from(ValidationError::EmptyLongUrl), StatusCode::BAD_REQUEST),
            (AppError::InvalidRequest("bad json".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("ex1".into()), StatusCode::NOT_FOUND),
            (AppError::Conflict, StatusCode::CONFLICT),
            (AppError::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
