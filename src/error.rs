//! Error handling for the application

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Pricing(err) => {
                let (status, error_type, details) = match err {
                    PricingError::ContractViolation { violations, .. } => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "contract_violation",
                        serde_json::to_value(violations).ok(),
                    ),
                    PricingError::QuoteNotFound { .. } => {
                        (StatusCode::NOT_FOUND, "quote_not_found", None)
                    }
                    PricingError::PriceMismatch {
                        expected,
                        submitted,
                    } => (
                        StatusCode::CONFLICT,
                        "price_mismatch",
                        Some(serde_json::json!({
                            "expected": expected,
                            "submitted": submitted,
                        })),
                    ),
                };
                tracing::debug!(error_type, "Pricing request rejected: {}", err);
                (
                    status,
                    PricingErrorResponse {
                        error_type: error_type.to_string(),
                        message: err.to_string(),
                        details,
                    },
                )
            }
            AppError::InvalidBody(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                (
                    rejection.status(),
                    PricingErrorResponse {
                        error_type: "invalid_request".to_string(),
                        message: rejection.body_text(),
                        details: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
