use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("forbidden")]
    Forbidden,

    #[error("bill already paid")]
    AlreadyPaid,

    #[error("webhook signature: {0}")]
    InvalidSignature(String),

    /// Transport-level failure (network, timeout, 5xx). Retryable; the
    /// payment stays in its pre-call state.
    #[error("gateway unavailable: {0}")]
    GatewayUnavailable(String),

    /// The gateway understood the request and declined it (4xx).
    #[error("gateway rejected: {0}")]
    GatewayRejected(String),

    /// A state the service should never reach, e.g. a freshly written row
    /// that cannot be updated moments later.
    #[error("internal: {0}")]
    Internal(&'static str),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}
