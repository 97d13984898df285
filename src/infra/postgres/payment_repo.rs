use {
    crate::domain::{
        error::PaymentError,
        gateway::EventReference,
        id::{GatewayReference, TxnReference},
        money::MinorAmount,
        payment::{CustomerContact, NewPayment, Payment, PaymentMethod, PaymentStatus},
    },
    chrono::{DateTime, Utc},
    sqlx::{PgPool, Postgres, Transaction},
    uuid::Uuid,
};

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    user_id: Uuid,
    bill_id: Uuid,
    state_code: String,
    txn_reference: String,
    gateway_reference: Option<String>,
    method: String,
    amount: i64,
    fee: i64,
    total_amount: i64,
    status: String,
    customer_email: String,
    customer_phone: Option<String>,
    failure_reason: Option<String>,
    paid_at: Option<DateTime<Utc>>,
    webhook_consumed: bool,
    created_at: DateTime<Utc>,
}

const PAYMENT_COLUMNS: &str = "id, user_id, bill_id, state_code, txn_reference, \
     gateway_reference, method, amount, fee, total_amount, status, \
     customer_email, customer_phone, failure_reason, paid_at, \
     webhook_consumed, created_at";

impl TryFrom<PaymentRow> for Payment {
    type Error = PaymentError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: row.id,
            user_id: row.user_id,
            bill_id: row.bill_id,
            state_code: row.state_code,
            txn_reference: TxnReference::parse(row.txn_reference)?,
            gateway_reference: row
                .gateway_reference
                .map(GatewayReference::new)
                .transpose()?,
            method: PaymentMethod::try_from(row.method.as_str())?,
            amount: MinorAmount::new(row.amount)?,
            fee: MinorAmount::new(row.fee)?,
            total_amount: MinorAmount::new(row.total_amount)?,
            status: PaymentStatus::try_from(row.status.as_str())?,
            contact: CustomerContact {
                email: row.customer_email,
                phone: row.customer_phone,
            },
            failure_reason: row.failure_reason,
            paid_at: row.paid_at,
            webhook_consumed: row.webhook_consumed,
            created_at: row.created_at,
        })
    }
}

pub async fn insert_payment(
    tx: &mut Transaction<'_, Postgres>,
    payment: &NewPayment,
) -> Result<(), PaymentError> {
    let metadata = serde_json::to_value(payment.metadata())?;
    sqlx::query(
        r#"
        INSERT INTO payments
            (id, user_id, bill_id, state_code, txn_reference, method,
             amount, fee, total_amount, status, customer_email,
             customer_phone, metadata)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending', $10, $11, $12)
        "#,
    )
    .bind(payment.id())
    .bind(payment.user_id())
    .bind(payment.bill_id())
    .bind(payment.state_code())
    .bind(payment.txn_reference().as_str())
    .bind(payment.method().as_str())
    .bind(payment.amount().minor())
    .bind(payment.fee().minor())
    .bind(payment.total_amount().minor())
    .bind(&payment.contact().email)
    .bind(payment.contact().phone.as_deref())
    .bind(metadata)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Compensating delete for a payment whose gateway initialization failed.
/// Only ever targets a still-pending row.
pub async fn delete_pending_payment(pool: &PgPool, id: Uuid) -> Result<bool, PaymentError> {
    let result = sqlx::query("DELETE FROM payments WHERE id = $1 AND status = 'pending'")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Store the gateway reference and move to PROCESSING. The reference is
/// write-once: the predicate refuses a row that already has one.
pub async fn mark_processing(
    pool: &PgPool,
    id: Uuid,
    gateway_reference: &GatewayReference,
) -> Result<bool, PaymentError> {
    let result = sqlx::query(
        r#"
        UPDATE payments
        SET gateway_reference = $1, status = 'processing', updated_at = now()
        WHERE id = $2 AND status = 'pending' AND gateway_reference IS NULL
        "#,
    )
    .bind(gateway_reference.as_str())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn get_by_txn_reference(
    pool: &PgPool,
    reference: &TxnReference,
) -> Result<Option<Payment>, PaymentError> {
    let row = sqlx::query_as::<_, PaymentRow>(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments WHERE txn_reference = $1"
    ))
    .bind(reference.as_str())
    .fetch_optional(pool)
    .await?;
    row.map(Payment::try_from).transpose()
}

pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Payment>, PaymentError> {
    let row = sqlx::query_as::<_, PaymentRow>(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(Payment::try_from).transpose()
}

/// Webhooks may name the payment by either reference.
pub async fn get_by_event_reference(
    pool: &PgPool,
    reference: &EventReference,
) -> Result<Option<Payment>, PaymentError> {
    match reference {
        EventReference::Txn(r) => get_by_txn_reference(pool, r).await,
        EventReference::Gateway(r) => {
            let row = sqlx::query_as::<_, PaymentRow>(&format!(
                "SELECT {PAYMENT_COLUMNS} FROM payments WHERE gateway_reference = $1"
            ))
            .bind(r.as_str())
            .fetch_optional(pool)
            .await?;
            row.map(Payment::try_from).transpose()
        }
    }
}

/// Conditional terminal transition to COMPLETED. Zero rows affected means
/// the payment was already terminal — the caller lost the race.
pub async fn mark_completed(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    paid_at: DateTime<Utc>,
    gateway_payload: &serde_json::Value,
) -> Result<bool, PaymentError> {
    let result = sqlx::query(
        r#"
        UPDATE payments
        SET status = 'completed', paid_at = $1, gateway_payload = $2,
            updated_at = now()
        WHERE id = $3 AND status IN ('pending', 'processing')
        "#,
    )
    .bind(paid_at)
    .bind(gateway_payload)
    .bind(id)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Conditional terminal transition to FAILED, recording the gateway's reason.
pub async fn mark_failed(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    reason: &str,
    gateway_payload: Option<&serde_json::Value>,
) -> Result<bool, PaymentError> {
    let result = sqlx::query(
        r#"
        UPDATE payments
        SET status = 'failed', failure_reason = $1,
            gateway_payload = COALESCE($2, gateway_payload), updated_at = now()
        WHERE id = $3 AND status IN ('pending', 'processing')
        "#,
    )
    .bind(reason)
    .bind(gateway_payload)
    .bind(id)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// false→true exactly once; a second call is a no-op.
pub async fn mark_webhook_consumed(pool: &PgPool, id: Uuid) -> Result<bool, PaymentError> {
    let result = sqlx::query(
        "UPDATE payments SET webhook_consumed = true, updated_at = now() \
         WHERE id = $1 AND NOT webhook_consumed",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_for_user(
    pool: &PgPool,
    user_id: Uuid,
    status: Option<PaymentStatus>,
    page: i64,
    limit: i64,
) -> Result<Vec<Payment>, PaymentError> {
    let offset = (page - 1) * limit;
    let rows = sqlx::query_as::<_, PaymentRow>(&format!(
        r#"
        SELECT {PAYMENT_COLUMNS} FROM payments
        WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#
    ))
    .bind(user_id)
    .bind(status.map(|s| s.as_str()))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(Payment::try_from).collect()
}
