use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::PaymentError;

/// Merchant-generated transaction reference (`bp_<uuid-v7-simple>`).
/// One per charge attempt; doubles as the gateway idempotency key.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxnReference(String);

impl TxnReference {
    /// Freshly minted for a new charge attempt. Uuid v7 encodes creation
    /// time, so references sort by creation and never collide.
    pub fn generate() -> Self {
        Self(format!("bp_{}", Uuid::now_v7().simple()))
    }

    pub fn parse(raw: impl Into<String>) -> Result<Self, PaymentError> {
        let raw = raw.into();
        if !raw.starts_with("bp_") || raw.len() <= 3 {
            return Err(PaymentError::Validation(format!(
                "transaction reference must start with bp_, got: {raw}"
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Reference assigned by the gateway once initialization succeeds.
/// Opaque to us; write-once on the payment row.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GatewayReference(String);

impl GatewayReference {
    pub fn new(raw: impl Into<String>) -> Result<Self, PaymentError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(PaymentError::Validation(
                "gateway reference cannot be empty".into(),
            ));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
