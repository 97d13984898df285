use crate::domain::{error::PaymentError, payment::Payment};

/// Out-of-band confirmation delivery (SMS/email mechanics live elsewhere;
/// this is the seam they plug into).
#[async_trait::async_trait]
pub trait ConfirmationChannel: Send + Sync {
    async fn send(&self, email: &str, message: &str) -> Result<(), PaymentError>;
}

/// Default channel: structured log only. Good enough for environments where
/// the real sender is not wired up.
pub struct LogChannel;

#[async_trait::async_trait]
impl ConfirmationChannel for LogChannel {
    async fn send(&self, email: &str, message: &str) -> Result<(), PaymentError> {
        tracing::info!(email, message, "payment confirmation");
        Ok(())
    }
}

/// Best-effort: a delivery failure is logged and never reverses the
/// completed payment.
pub async fn send_confirmation(channel: &dyn ConfirmationChannel, payment: &Payment) {
    let message = format!(
        "Your payment of {} kobo (ref {}) was successful.",
        payment.total_amount, payment.txn_reference
    );
    if let Err(e) = channel.send(&payment.contact.email, &message).await {
        tracing::warn!(
            payment_id = %payment.id,
            error = %e,
            "confirmation delivery failed"
        );
    }
}
