use {
    crate::domain::{
        audit::NewAuditEntry,
        error::PaymentError,
        fees::FeeSchedule,
        gateway::{
            GatewayEvent, InitializeRequest, InitializedCharge, PaymentGateway, VerifiedCharge,
        },
        id::TxnReference,
        notification::NewNotification,
        payment::{
            CustomerContact, NewPayment, NewPaymentParams, Payment, PaymentMetadata,
            PaymentMethod, PaymentStatus,
        },
    },
    crate::infra::postgres::{audit_repo, bill_repo, notification_repo, payment_repo},
    crate::services::notifier::ConfirmationChannel,
    chrono::Utc,
    sqlx::PgPool,
    uuid::Uuid,
};

/// What an initialize call hands back to the transport layer.
pub struct InitializedPayment {
    pub payment_id: Uuid,
    pub txn_reference: TxnReference,
    pub amount: i64,
    pub fee: i64,
    pub total_amount: i64,
    pub charge: InitializedCharge,
}

#[derive(Debug)]
pub enum CompletionOutcome {
    /// This caller performed the terminal mutation.
    Completed,
    /// The other entry point won the race; no writes from this caller.
    AlreadyCompleted,
    /// The record went terminal-failed before this success report landed.
    AlreadyFailed,
}

#[derive(Debug)]
pub enum VerifyOutcome {
    Completed(Payment),
    Failed(Payment),
}

#[derive(Debug)]
pub enum WebhookOutcome {
    Completed,
    Failed,
    /// Duplicate delivery or already-terminal record; nothing written.
    AlreadyProcessed,
    /// Event type outside the acted-on set, acknowledged as a no-op.
    Ignored(String),
}

// ── Initialize ──────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub async fn initialize_payment(
    pool: &PgPool,
    gateway: &dyn PaymentGateway,
    fees: &FeeSchedule,
    callback_url: &str,
    requester: Uuid,
    contact: CustomerContact,
    bill_id: Uuid,
    method: PaymentMethod,
) -> Result<InitializedPayment, PaymentError> {
    let bill = bill_repo::get_bill(pool, bill_id)
        .await?
        .ok_or(PaymentError::NotFound("bill"))?;

    // Not-owned bills look absent to the caller.
    if !bill.is_owned_by(requester) {
        return Err(PaymentError::NotFound("bill"));
    }
    if bill.is_paid() {
        return Err(PaymentError::AlreadyPaid);
    }

    let amount = bill.amount_due;
    let fee = fees.fee(amount)?;
    let total = fees.total(amount)?;

    let metadata = PaymentMetadata {
        bill_number: bill.bill_number.clone(),
        bin_id: bill.bin_id.clone(),
        state_code: bill.state_code.clone(),
    };

    let payment = NewPayment::new(NewPaymentParams {
        user_id: requester,
        bill_id: bill.id,
        state_code: bill.state_code.clone(),
        method,
        amount,
        fee,
        total_amount: total,
        contact: contact.clone(),
        metadata: metadata.clone(),
    })?;

    let mut tx = pool.begin().await?;
    payment_repo::insert_payment(&mut tx, &payment).await?;
    let audit = payment.audit_entry("api:initialize", "created");
    audit_repo::insert_audit_entry(&mut tx, &audit).await?;
    tx.commit().await?;

    let charge = match gateway
        .initialize(InitializeRequest {
            contact,
            total_amount: total,
            reference: payment.txn_reference().clone(),
            callback_url: callback_url.to_string(),
            channel_hint: method.channel_hint(),
            metadata,
        })
        .await
    {
        Ok(charge) => charge,
        Err(e) => {
            // Compensating delete: no orphan PENDING rows.
            let deleted = payment_repo::delete_pending_payment(pool, payment.id()).await?;
            tracing::warn!(
                payment_id = %payment.id(),
                deleted,
                error = %e,
                "gateway initialize failed, payment rolled back"
            );
            return Err(e);
        }
    };

    if !payment_repo::mark_processing(pool, payment.id(), &charge.gateway_reference).await? {
        // The row vanished or already carries a reference. Handing out the
        // authorization URL anyway would strand the user on a payment that
        // can never verify, so fail the call.
        tracing::error!(
            payment_id = %payment.id(),
            "could not move freshly initialized payment to processing"
        );
        return Err(PaymentError::Internal(
            "payment record unavailable after initialization",
        ));
    }

    tracing::info!(
        payment_id = %payment.id(),
        txn_reference = %payment.txn_reference(),
        gateway_reference = %charge.gateway_reference,
        "payment initialized"
    );

    Ok(InitializedPayment {
        payment_id: payment.id(),
        txn_reference: payment.txn_reference().clone(),
        amount: amount.minor(),
        fee: fee.minor(),
        total_amount: total.minor(),
        charge,
    })
}

// ── Verify ──────────────────────────────────────────────────────────────────

pub async fn verify_payment(
    pool: &PgPool,
    gateway: &dyn PaymentGateway,
    confirmations: &dyn ConfirmationChannel,
    reference: &TxnReference,
    requester: Uuid,
) -> Result<VerifyOutcome, PaymentError> {
    let payment = payment_repo::get_by_txn_reference(pool, reference)
        .await?
        .ok_or(PaymentError::NotFound("payment"))?;

    if !payment.is_owned_by(requester) {
        return Err(PaymentError::Forbidden);
    }

    // Idempotent re-verification: no gateway call, no writes.
    if payment.status == PaymentStatus::Completed {
        return Ok(VerifyOutcome::Completed(payment));
    }

    let gateway_reference = payment
        .gateway_reference
        .clone()
        .ok_or_else(|| PaymentError::Validation("payment was never initialized".into()))?;

    let verified = gateway.verify(&gateway_reference).await?;

    if !verified.success {
        record_failure(pool, &payment, &verified, "user:verify").await?;
        // A concurrent webhook may have completed the payment first, in which
        // case the failure write was a no-op and the row is terminal-completed.
        let refreshed = reload(pool, payment.id).await?;
        return Ok(match refreshed.status {
            PaymentStatus::Completed => VerifyOutcome::Completed(refreshed),
            _ => VerifyOutcome::Failed(refreshed),
        });
    }

    let outcome = complete_payment(pool, &payment, &verified.raw_payload, "user:verify").await?;
    if matches!(outcome, CompletionOutcome::Completed) {
        crate::services::notifier::send_confirmation(confirmations, &payment).await;
    }

    let refreshed = reload(pool, payment.id).await?;
    match refreshed.status {
        PaymentStatus::Failed => Ok(VerifyOutcome::Failed(refreshed)),
        _ => Ok(VerifyOutcome::Completed(refreshed)),
    }
}

// ── Webhook ─────────────────────────────────────────────────────────────────

pub async fn apply_webhook_event(
    pool: &PgPool,
    confirmations: &dyn ConfirmationChannel,
    event: GatewayEvent,
) -> Result<WebhookOutcome, PaymentError> {
    match event {
        GatewayEvent::Other(event_type) => {
            tracing::info!(event_type = %event_type, "unhandled gateway event, acknowledged");
            Ok(WebhookOutcome::Ignored(event_type))
        }
        GatewayEvent::ChargeFailed {
            reference,
            reason,
            raw_payload,
        } => {
            let payment = payment_repo::get_by_event_reference(pool, &reference)
                .await?
                .ok_or_else(|| {
                    tracing::warn!(?reference, "webhook names an unknown payment");
                    PaymentError::NotFound("payment")
                })?;

            if payment.webhook_consumed {
                tracing::info!(payment_id = %payment.id, "webhook already consumed, skipping");
                return Ok(WebhookOutcome::AlreadyProcessed);
            }

            let mutated = if payment.status.is_terminal() {
                false
            } else {
                let verified = VerifiedCharge {
                    success: false,
                    status_detail: reason,
                    raw_payload,
                };
                record_failure(pool, &payment, &verified, "webhook:paystack").await?
            };

            payment_repo::mark_webhook_consumed(pool, payment.id).await?;

            if mutated {
                Ok(WebhookOutcome::Failed)
            } else {
                Ok(WebhookOutcome::AlreadyProcessed)
            }
        }
        GatewayEvent::ChargeSuccess {
            reference,
            raw_payload,
        } => {
            let payment = payment_repo::get_by_event_reference(pool, &reference)
                .await?
                .ok_or_else(|| {
                    tracing::warn!(?reference, "webhook names an unknown payment");
                    PaymentError::NotFound("payment")
                })?;

            if payment.webhook_consumed {
                tracing::info!(payment_id = %payment.id, "webhook already consumed, skipping");
                return Ok(WebhookOutcome::AlreadyProcessed);
            }

            let outcome =
                complete_payment(pool, &payment, &raw_payload, "webhook:paystack").await?;
            payment_repo::mark_webhook_consumed(pool, payment.id).await?;

            match outcome {
                CompletionOutcome::Completed => {
                    crate::services::notifier::send_confirmation(confirmations, &payment).await;
                    Ok(WebhookOutcome::Completed)
                }
                CompletionOutcome::AlreadyCompleted | CompletionOutcome::AlreadyFailed => {
                    Ok(WebhookOutcome::AlreadyProcessed)
                }
            }
        }
    }
}

// ── Completion protocol ─────────────────────────────────────────────────────

/// One atomic unit across payment, bill, notification, and audit. The
/// conditional UPDATE on the payment row is the authority on who wins the
/// verify/webhook race; the advisory lock serializes same-reference work so
/// the dependent writes never interleave.
pub async fn complete_payment(
    pool: &PgPool,
    payment: &Payment,
    raw_payload: &serde_json::Value,
    actor: &str,
) -> Result<CompletionOutcome, PaymentError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SET LOCAL lock_timeout = '5s'")
        .execute(&mut *tx)
        .await?;
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(payment.txn_reference.as_str())
        .execute(&mut *tx)
        .await?;

    let paid_at = Utc::now();
    let won = payment_repo::mark_completed(&mut tx, payment.id, paid_at, raw_payload).await?;

    if !won {
        tx.commit().await?;
        let current = reload(pool, payment.id).await?;
        return Ok(match current.status {
            PaymentStatus::Failed => CompletionOutcome::AlreadyFailed,
            _ => CompletionOutcome::AlreadyCompleted,
        });
    }

    let bill = bill_repo::get_bill_in_tx(&mut tx, payment.bill_id).await?;
    let bill_number = match &bill {
        Some(bill) => {
            bill_repo::mark_paid(&mut tx, bill.id, payment.amount, paid_at).await?;
            bill.bill_number.clone()
        }
        None => {
            // Payment stands even when the bill lookup degrades.
            tracing::warn!(
                payment_id = %payment.id,
                bill_id = %payment.bill_id,
                "completed payment references a missing bill"
            );
            let anomaly = NewAuditEntry {
                id: Uuid::now_v7(),
                entity_type: "payment".to_string(),
                entity_id: Some(payment.id),
                reference: Some(payment.txn_reference.as_str().to_string()),
                action: "bill_missing".to_string(),
                actor: actor.to_string(),
                detail: serde_json::json!({ "bill_id": payment.bill_id }),
            };
            audit_repo::insert_audit_entry(&mut tx, &anomaly).await?;
            payment.bill_id.to_string()
        }
    };

    let notification = NewNotification::payment_confirmation(
        payment.user_id,
        payment.id,
        payment.bill_id,
        payment.txn_reference.as_str(),
        &bill_number,
        payment.amount.minor(),
    );
    notification_repo::insert_notification(&mut tx, &notification).await?;

    let audit = NewAuditEntry {
        id: Uuid::now_v7(),
        entity_type: "payment".to_string(),
        entity_id: Some(payment.id),
        reference: Some(payment.txn_reference.as_str().to_string()),
        action: "completed".to_string(),
        actor: actor.to_string(),
        detail: serde_json::json!({
            "bill_id": payment.bill_id,
            "amount": payment.amount.minor(),
            "paid_at": paid_at,
        }),
    };
    audit_repo::insert_audit_entry(&mut tx, &audit).await?;

    tx.commit().await?;

    tracing::info!(
        payment_id = %payment.id,
        txn_reference = %payment.txn_reference,
        actor,
        "payment completed"
    );
    Ok(CompletionOutcome::Completed)
}

/// Persist a gateway-reported failure: conditional FAILED transition plus
/// its audit entry, atomically. Returns whether this call mutated the row.
async fn record_failure(
    pool: &PgPool,
    payment: &Payment,
    verified: &VerifiedCharge,
    actor: &str,
) -> Result<bool, PaymentError> {
    let mut tx = pool.begin().await?;

    let mutated = payment_repo::mark_failed(
        &mut tx,
        payment.id,
        &verified.status_detail,
        Some(&verified.raw_payload),
    )
    .await?;

    if mutated {
        let audit = NewAuditEntry {
            id: Uuid::now_v7(),
            entity_type: "payment".to_string(),
            entity_id: Some(payment.id),
            reference: Some(payment.txn_reference.as_str().to_string()),
            action: "failed".to_string(),
            actor: actor.to_string(),
            detail: serde_json::json!({ "reason": verified.status_detail }),
        };
        audit_repo::insert_audit_entry(&mut tx, &audit).await?;
        tracing::info!(
            payment_id = %payment.id,
            reason = %verified.status_detail,
            "payment failed"
        );
    }

    tx.commit().await?;
    Ok(mutated)
}

async fn reload(pool: &PgPool, id: Uuid) -> Result<Payment, PaymentError> {
    payment_repo::get_by_id(pool, id)
        .await?
        .ok_or(PaymentError::NotFound("payment"))
}
