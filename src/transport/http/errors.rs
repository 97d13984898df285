use crate::domain::error::PaymentError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Newtype over the domain error so HTTP mapping lives in the transport
/// layer only.
pub enum ApiError {
    Domain(PaymentError),
    Unauthorized,
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "missing or invalid user identity".to_string(),
            ),
            Self::Domain(err) => match err {
                PaymentError::Validation(msg) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "validation_error",
                    msg.clone(),
                ),
                PaymentError::NotFound(what) => {
                    (StatusCode::NOT_FOUND, "not_found", format!("{what} not found"))
                }
                PaymentError::Forbidden => (
                    StatusCode::FORBIDDEN,
                    "forbidden",
                    "you do not own this record".to_string(),
                ),
                PaymentError::AlreadyPaid => (
                    StatusCode::CONFLICT,
                    "already_paid",
                    "bill is already paid".to_string(),
                ),
                PaymentError::InvalidSignature(msg) => {
                    tracing::error!("webhook signature rejected: {msg}");
                    (
                        StatusCode::BAD_REQUEST,
                        "invalid_signature",
                        "invalid webhook signature".to_string(),
                    )
                }
                PaymentError::GatewayUnavailable(msg) => {
                    tracing::error!("gateway unavailable: {msg}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "gateway_unavailable",
                        "payment gateway unavailable, try again".to_string(),
                    )
                }
                PaymentError::GatewayRejected(msg) => (
                    StatusCode::BAD_REQUEST,
                    "gateway_rejected",
                    msg.clone(),
                ),
                PaymentError::Internal(msg) => {
                    tracing::error!("internal error: {msg}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal_error",
                        "internal error".to_string(),
                    )
                }
                PaymentError::Database(err) => {
                    tracing::error!("database error: {err}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal_error",
                        "internal error".to_string(),
                    )
                }
                PaymentError::Serialization(err) => {
                    tracing::error!("serialization error: {err}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal_error",
                        "internal error".to_string(),
                    )
                }
            },
        };

        let body = serde_json::json!({
            "error_code": error_code,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}
