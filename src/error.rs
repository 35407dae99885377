//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::DomainError;
use crate::store::StoreError;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Missing or malformed Authorization header")]
    MissingCredentials,

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error("Transfer failed")]
    TransferFailed,

    #[error("Storage error: {0}")]
    Store(StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Rejected(domain) => AppError::Domain(domain),
            other => AppError::Store(other),
        }
    }
}

/// Malformed or incomplete JSON body
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Path segment that does not parse (e.g. a non-UUID id)
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

fn domain_status(err: &DomainError) -> (StatusCode, &'static str, Option<String>) {
    match err {
        // 400 Bad Request
        DomainError::InvalidAmount(msg) => {
            (StatusCode::BAD_REQUEST, "invalid_amount", Some(msg.clone()))
        }
        DomainError::SenderUnavailable => (StatusCode::BAD_REQUEST, "sender_unavailable", None),
        DomainError::RecipientUnavailable => {
            (StatusCode::BAD_REQUEST, "recipient_unavailable", None)
        }
        DomainError::InsufficientFunds { required, available } => (
            StatusCode::BAD_REQUEST,
            "insufficient_funds",
            Some(format!("required {}, available {}", required, available)),
        ),
        DomainError::DuplicateIdentity => (StatusCode::BAD_REQUEST, "duplicate_identity", None),
        DomainError::AlreadyApproved => (StatusCode::BAD_REQUEST, "already_approved", None),
        DomainError::InvalidState(msg) => {
            (StatusCode::BAD_REQUEST, "invalid_state", Some(msg.clone()))
        }
        DomainError::RecipientNotFound => (StatusCode::BAD_REQUEST, "recipient_not_found", None),
        DomainError::ForbiddenRecipient => {
            (StatusCode::BAD_REQUEST, "forbidden_recipient", None)
        }
        DomainError::SelfReference => (StatusCode::BAD_REQUEST, "self_reference", None),

        // 401 Unauthorized
        DomainError::InvalidCredentials => {
            (StatusCode::UNAUTHORIZED, "invalid_credentials", None)
        }
        DomainError::NotApproved => (StatusCode::UNAUTHORIZED, "not_approved", None),
        DomainError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),

        // 403 Forbidden
        DomainError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", Some(msg.clone())),

        // 404 Not Found
        DomainError::UserNotFound(id) => {
            (StatusCode::NOT_FOUND, "user_not_found", Some(id.clone()))
        }
        DomainError::BeneficiaryNotFound => {
            (StatusCode::NOT_FOUND, "beneficiary_not_found", None)
        }

        // 409 Conflict
        DomainError::AlreadyExists => (StatusCode::CONFLICT, "already_exists", None),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }
            AppError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "missing_credentials", None)
            }

            AppError::Domain(domain_err) => domain_status(domain_err),

            // 500 Internal Server Error; details are logged, never echoed
            AppError::TransferFailed => {
                (StatusCode::INTERNAL_SERVER_ERROR, "transfer_failed", None)
            }
            AppError::Store(e) => {
                tracing::error!("Storage error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let error = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
