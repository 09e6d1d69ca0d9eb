use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::database::StoreError;
use crate::services::checkout_service::CheckoutError;

/// Token-level failures. All of them map to 401.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing authorization token")]
    Missing,
    #[error("invalid token")]
    Invalid,
    #[error("token expired")]
    Expired,
}

/// Authenticated caller lacking the right role or identity.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden access")]
    Forbidden,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized access: {0}")]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Authz(#[from] AuthzError),
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("payment provider error: {0}")]
    PaymentProvider(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

impl AppError {
    /// Text sent to the client. Store and internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::Store(StoreError::Timeout) => "request timed out".to_string(),
            AppError::Store(_) => "database error".to_string(),
            AppError::Checkout(CheckoutError::PaymentWriteFailed(_)) => {
                "failed to record payment".to_string()
            }
            AppError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Authz(_) => StatusCode::FORBIDDEN,
            AppError::Checkout(CheckoutError::PaymentWriteFailed(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Checkout(_) => StatusCode::BAD_REQUEST,
            AppError::Store(StoreError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PaymentProvider(_) => StatusCode::BAD_GATEWAY,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("❌ {}", self);
        }

        HttpResponse::build(status).json(ErrorBody {
            success: false,
            message: self.public_message(),
        })
    }
}
