/// Error handling module
///
/// Business-rule failures plus their unified HTTP presentation
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failures surfaced by the validators and orchestration services. All of
/// them are expected, recoverable-by-caller conditions; the caller decides
/// the user-facing presentation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Aggregate of every card rule violation found, one message each.
    #[error("credit card is not valid: {}", violations.join("; "))]
    CardNotValid { violations: Vec<String> },
    #[error("credit card not found")]
    CreditCardNotFound,
    #[error("transaction amount is invalid")]
    TransactionAmountInvalid,
    #[error("transaction not found")]
    TransactionNotFound,
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

#[derive(Debug)]
pub enum ApiError {
    Internal {
        reason: String,
    },
    BadRequest {
        reason: String,
        violations: Vec<String>,
    },
    NotFound {
        resource: String,
    },
    ServiceUnavailable {
        details: String,
    },
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<String>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Internal { reason } => write!(f, "Internal error: {}", reason),
            ApiError::BadRequest { reason, violations } => {
                write!(f, "Bad request: {}, {:?}", reason, violations)
            }
            ApiError::NotFound { resource } => write!(f, "Not found: {}", resource),
            ApiError::ServiceUnavailable { details } => {
                write!(f, "Service unavailable: {}", details)
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::CardNotValid { violations } => ApiError::BadRequest {
                reason: "credit card is not valid".to_string(),
                violations,
            },
            ServiceError::TransactionAmountInvalid => ApiError::BadRequest {
                reason: "transaction amount is invalid".to_string(),
                violations: vec![],
            },
            ServiceError::CreditCardNotFound => ApiError::NotFound {
                resource: "credit card".to_string(),
            },
            ServiceError::TransactionNotFound => ApiError::NotFound {
                resource: "transaction".to_string(),
            },
            ServiceError::Store(e) => {
                tracing::error!(error = %e, "store operation failed");
                ApiError::Internal {
                    reason: "database query failed".to_string(),
                }
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let response = match self {
            ApiError::Internal { reason } => ErrorResponse {
                error: "Internal server error".to_string(),
                details: Some(reason.clone()),
                violations: None,
            },
            ApiError::BadRequest { reason, violations } => ErrorResponse {
                error: "Bad request".to_string(),
                details: Some(reason.clone()),
                violations: if violations.is_empty() {
                    None
                } else {
                    Some(violations.clone())
                },
            },
            ApiError::NotFound { resource } => ErrorResponse {
                error: format!("{} not found", resource),
                details: None,
                violations: None,
            },
            ApiError::ServiceUnavailable { details } => ErrorResponse {
                error: "Service unavailable".to_string(),
                details: Some(details.clone()),
                violations: None,
            },
        };
        HttpResponse::build(status).json(response)
    }
}
