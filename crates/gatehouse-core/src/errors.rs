//! Error taxonomy and the uniform client-facing error envelope.
//!
//! Every per-request failure is classified into one [`AppError`] variant and
//! rendered through a single [`IntoResponse`] implementation, so clients always
//! receive:
//!
//! ```json
//! { "statusCode": 401, "message": "Invalid or missing credentials", "error": "Unauthorized" }
//! ```
//!
//! | Variant | Status |
//! |---------|--------|
//! | [`AppError::Unauthenticated`] | 401 |
//! | [`AppError::Forbidden`] | 403 |
//! | [`AppError::RateLimited`] | 429 |
//! | [`AppError::Configuration`] | 500 |
//! | [`AppError::Unhandled`] | 500 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_governor::GovernorError;

pub const UNAUTHENTICATED_MESSAGE: &str = "Invalid or missing credentials";
pub const FORBIDDEN_MESSAGE: &str = "Forbidden resource";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests, please try again later";
const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum AppError {
    /// Credential missing, malformed, or failed verification.
    ///
    /// Carries no detail on purpose: expired and forged tokens look the same to the caller.
    #[error("unauthenticated")]
    Unauthenticated,

    /// Credential valid but the role requirement is unmet.
    #[error("forbidden")]
    Forbidden,

    /// The quota tracker reported the client over its budget.
    #[error("rate limited")]
    RateLimited,

    /// Required external configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Unhandled(#[from] anyhow::Error),
}

/// Uniform error body shared by auth failures and rate-limit violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status_code: u16,
    pub message: String,
    pub error: String,
}

impl AppError {
    pub fn unhandled<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Unhandled(err.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Configuration(_) | AppError::Unhandled(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing message. Server-side causes are never echoed.
    pub fn message(&self) -> &'static str {
        match self {
            AppError::Unauthenticated => UNAUTHENTICATED_MESSAGE,
            AppError::Forbidden => FORBIDDEN_MESSAGE,
            AppError::RateLimited => RATE_LIMITED_MESSAGE,
            AppError::Configuration(_) | AppError::Unhandled(_) => INTERNAL_MESSAGE,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let status = self.status();
        ErrorEnvelope {
            status_code: status.as_u16(),
            message: self.message().to_string(),
            error: status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Configuration(reason) => {
                tracing::error!(reason = %reason, "configuration error while serving request");
            }
            AppError::Unhandled(err) => {
                tracing::error!(error = ?err, "unhandled error while serving request");
            }
            _ => {}
        }

        (self.status(), Json(self.envelope())).into_response()
    }
}

/// Classifies quota-tracker errors. Only an actual over-quota signal becomes
/// [`AppError::RateLimited`]; anything else is an internal failure.
impl From<GovernorError> for AppError {
    fn from(err: GovernorError) -> Self {
        match err {
            GovernorError::TooManyRequests { .. } => AppError::RateLimited,
            GovernorError::UnableToExtractKey => {
                AppError::unhandled(anyhow::anyhow!("unable to extract rate limit key"))
            }
            other => AppError::unhandled(anyhow::anyhow!("rate limiter failure: {other:?}")),
        }
    }
}
