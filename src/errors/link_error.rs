use thiserror::Error;

use crate::validation::{Field, ValidationError};

/// Failures a link form or API client can run into.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// Rejected before or by the server; blocks the submission.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The requested slug is taken.
    #[error("{field}: {reason}")]
    Conflict { field: Field, reason: String },
    #[error("{0} not found")]
    NotFound(String),
    /// Connection failure or timeout. Safe to retry.
    #[error("network error: {0}")]
    Network(String),
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
}

impl LinkError {
    /// The input field the error should be shown against, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            LinkError::Validation(err) => Some(err.field()),
            LinkError::Conflict { field, .. } => Some(*field),
            LinkError::NotFound(_) | LinkError::Network(_) | LinkError::Server { .. } => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, LinkError::Network(_))
    }
}
