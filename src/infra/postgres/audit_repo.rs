use {
    crate::domain::{audit::NewAuditEntry, error::PaymentError},
    sqlx::{Postgres, Transaction},
};

pub async fn insert_audit_entry(
    tx: &mut Transaction<'_, Postgres>,
    entry: &NewAuditEntry,
) -> Result<(), PaymentError> {
    sqlx::query(
        "INSERT INTO audit_log (id, entity_type, entity_id, reference, action, actor, detail) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(entry.id)
    .bind(&entry.entity_type)
    .bind(entry.entity_id)
    .bind(entry.reference.as_deref())
    .bind(&entry.action)
    .bind(&entry.actor)
    .bind(&entry.detail)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
