//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::ErrorKind;
use domain_claims::DisputeError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// Engine error, mapped by its stable kind
    #[error(transparent)]
    Engine(#[from] DisputeError),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<String>,
    },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Stable error code
    pub error: String,
    pub message: String,
    /// Set when the caller should refetch and retry once
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

/// Returns the HTTP status for an engine error kind
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
        ErrorKind::InvalidStateTransition
        | ErrorKind::TerminalStateViolation
        | ErrorKind::ConcurrentModification => StatusCode::CONFLICT,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Store => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Engine(e) => {
                let kind = e.kind();
                if kind == ErrorKind::Store {
                    error!(error = %e, "engine store failure");
                }
                (
                    status_for(kind),
                    ErrorResponse {
                        error: kind.code().to_string(),
                        message: e.to_string(),
                        retryable: kind.is_retryable(),
                        details: None,
                    },
                )
            }
            ApiError::Validation { message, details } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    error: ErrorKind::Validation.code().to_string(),
                    message,
                    retryable: false,
                    details: Some(details),
                },
            ),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse {
                    error: "unauthenticated".to_string(),
                    message: "Unauthorized".to_string(),
                    retryable: false,
                    details: None,
                },
            ),
            ApiError::Internal(message) => {
                error!(%message, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "internal_error".to_string(),
                        message,
                        retryable: false,
                        details: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        details.sort();
        ApiError::Validation {
            message: "request failed validation".to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_statuses() {
        assert_eq!(status_for(ErrorKind::Validation), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(ErrorKind::Unauthorized), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorKind::TerminalStateViolation), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorKind::ConcurrentModification), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::Store), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_forbidden_engine_error_is_403() {
        let response =
            ApiError::from(DisputeError::Forbidden("not a party".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
