use {
    crate::domain::{error::PaymentError, notification::NewNotification},
    sqlx::{Postgres, Transaction},
};

pub async fn insert_notification(
    tx: &mut Transaction<'_, Postgres>,
    notification: &NewNotification,
) -> Result<(), PaymentError> {
    sqlx::query(
        "INSERT INTO notifications (id, user_id, payment_id, bill_id, message) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(notification.id)
    .bind(notification.user_id)
    .bind(notification.payment_id)
    .bind(notification.bill_id)
    .bind(&notification.message)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
