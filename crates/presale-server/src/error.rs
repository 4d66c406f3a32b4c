//! HTTP error mapping

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use presale_core::{PresaleError, ValidationError};
use presale_payments::PaymentError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Every handler failure, rendered as `(status, {"error", "code"})`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Presale(#[from] PresaleError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Any webhook failure; always answered with 400
    #[error("webhook rejected: {0}")]
    Webhook(PaymentError),

    #[error("Payments not configured")]
    PaymentsDisabled,

    #[error("No messages provided")]
    EmptyTranscript,

    /// Body was not JSON or did not match the endpoint's shape
    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Presale(err.into())
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Presale(err) => {
                let (status, code) = match err {
                    PresaleError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
                    PresaleError::PaymentRequired => (StatusCode::PAYMENT_REQUIRED, "PAYMENT_REQUIRED"),
                    PresaleError::Provider(_) | PresaleError::ProviderUnavailable(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "AI_ERROR")
                    }
                    PresaleError::InvalidTier(_) => (StatusCode::BAD_REQUEST, "INVALID_TIER"),
                    PresaleError::Validation(_) | PresaleError::IncompleteForm => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
                    }
                    PresaleError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
                    PresaleError::Mail(_) => (StatusCode::INTERNAL_SERVER_ERROR, "MAIL_ERROR"),
                    PresaleError::Config(_) | PresaleError::Json(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                    }
                };
                (status, code, err.user_message())
            }
            ApiError::Payment(err) => {
                let (status, code) = match err {
                    PaymentError::InvalidTier(_) => (StatusCode::BAD_REQUEST, "INVALID_TIER"),
                    PaymentError::Stripe(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CHECKOUT_ERROR"),
                    PaymentError::Config(_) => (StatusCode::SERVICE_UNAVAILABLE, "PAYMENTS_DISABLED"),
                    PaymentError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
                    _ => (StatusCode::BAD_REQUEST, "PAYMENT_ERROR"),
                };
                (status, code, err.user_message())
            }
            ApiError::Webhook(err) => {
                let code = match err {
                    PaymentError::MissingSignature => "MISSING_SIGNATURE",
                    PaymentError::WebhookSecretMissing | PaymentError::WebhookSignature(_) => {
                        "INVALID_SIGNATURE"
                    }
                    PaymentError::MissingMetadata(_) => "MISSING_METADATA",
                    _ => "WEBHOOK_ERROR",
                };
                (StatusCode::BAD_REQUEST, code, err.user_message())
            }
            ApiError::PaymentsDisabled => {
                (StatusCode::SERVICE_UNAVAILABLE, "PAYMENTS_DISABLED", self.to_string())
            }
            ApiError::EmptyTranscript => (StatusCode::BAD_REQUEST, "EMPTY_TRANSCRIPT", self.to_string()),
            ApiError::Body(_) => (
                StatusCode::BAD_REQUEST,
                "INVALID_BODY",
                "Invalid request body".into(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(status = %status, code, error = %self, "Request failed");
        } else {
            tracing::warn!(status = %status, code, error = %self, "Request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: message,
                code: code.into(),
            }),
        )
            .into_response()
    }
}
