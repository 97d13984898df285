use {
    crate::domain::{
        bill::{Bill, BillStatus},
        error::PaymentError,
        money::MinorAmount,
    },
    chrono::{DateTime, Utc},
    sqlx::{PgPool, Postgres, Transaction},
    uuid::Uuid,
};

#[derive(sqlx::FromRow)]
struct BillRow {
    id: Uuid,
    user_id: Uuid,
    bill_number: String,
    bin_id: String,
    state_code: String,
    amount_due: i64,
    status: String,
    amount_paid: Option<i64>,
    paid_at: Option<DateTime<Utc>>,
}

impl TryFrom<BillRow> for Bill {
    type Error = PaymentError;

    fn try_from(row: BillRow) -> Result<Self, Self::Error> {
        Ok(Bill {
            id: row.id,
            user_id: row.user_id,
            bill_number: row.bill_number,
            bin_id: row.bin_id,
            state_code: row.state_code,
            amount_due: MinorAmount::positive(row.amount_due)?,
            status: BillStatus::try_from(row.status.as_str())?,
            amount_paid: row.amount_paid.map(MinorAmount::new).transpose()?,
            paid_at: row.paid_at,
        })
    }
}

const BILL_COLUMNS: &str = "id, user_id, bill_number, bin_id, state_code, \
     amount_due, status, amount_paid, paid_at";

pub async fn get_bill(pool: &PgPool, id: Uuid) -> Result<Option<Bill>, PaymentError> {
    let row = sqlx::query_as::<_, BillRow>(&format!(
        "SELECT {BILL_COLUMNS} FROM bills WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(Bill::try_from).transpose()
}

/// Same read inside the completion transaction.
pub async fn get_bill_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<Bill>, PaymentError> {
    let row = sqlx::query_as::<_, BillRow>(&format!(
        "SELECT {BILL_COLUMNS} FROM bills WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;
    row.map(Bill::try_from).transpose()
}

/// Mark a bill paid inside the caller's completion transaction. Only this
/// call path ever moves a bill to paid.
pub async fn mark_paid(
    tx: &mut Transaction<'_, Postgres>,
    bill_id: Uuid,
    amount: MinorAmount,
    paid_at: DateTime<Utc>,
) -> Result<bool, PaymentError> {
    let result = sqlx::query(
        r#"
        UPDATE bills
        SET status = 'paid', amount_paid = $1, paid_at = $2, updated_at = now()
        WHERE id = $3 AND status <> 'paid'
        "#,
    )
    .bind(amount.minor())
    .bind(paid_at)
    .bind(bill_id)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() > 0)
}
