use uuid::Uuid;

/// Fire-and-forget record created alongside a completed payment.
pub struct NewNotification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub payment_id: Uuid,
    pub bill_id: Uuid,
    pub message: String,
}

impl NewNotification {
    pub fn payment_confirmation(
        user_id: Uuid,
        payment_id: Uuid,
        bill_id: Uuid,
        txn_reference: &str,
        bill_number: &str,
        amount_minor: i64,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            payment_id,
            bill_id,
            message: format!(
                "Payment of {amount_minor} kobo for bill {bill_number} completed (ref {txn_reference})."
            ),
        }
    }
}
