use {
    super::{auth::AuthUser, errors::ApiError},
    crate::{
        AppState,
        domain::{
            error::PaymentError,
            id::TxnReference,
            payment::{Payment, PaymentMethod, PaymentStatus},
        },
        infra::postgres::payment_repo,
        services::reconciliation::{self, VerifyOutcome},
    },
    axum::{
        Json,
        extract::{Path, Query, State},
    },
    serde::Deserialize,
    uuid::Uuid,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeBody {
    pub bill_id: Uuid,
    pub method: PaymentMethod,
}

pub async fn initialize(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<InitializeBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let initialized = reconciliation::initialize_payment(
        &state.pool,
        &*state.gateway,
        &state.fees,
        &state.callback_url,
        user.id,
        user.contact(),
        body.bill_id,
        body.method,
    )
    .await?;

    Ok(Json(serde_json::json!({
        "payment": {
            "id": initialized.payment_id,
            "transactionRef": initialized.txn_reference.as_str(),
            "amount": initialized.amount,
            "fee": initialized.fee,
            "totalAmount": initialized.total_amount,
        },
        "gateway": {
            "authorizationUrl": initialized.charge.authorization_url,
            "accessCode": initialized.charge.access_code,
            "reference": initialized.charge.gateway_reference.as_str(),
        },
    })))
}

pub async fn verify(
    State(state): State<AppState>,
    user: AuthUser,
    Path(reference): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let reference = TxnReference::parse(reference)?;
    let outcome = reconciliation::verify_payment(
        &state.pool,
        &*state.gateway,
        &*state.confirmations,
        &reference,
        user.id,
    )
    .await?;

    let payment = match &outcome {
        VerifyOutcome::Completed(p) | VerifyOutcome::Failed(p) => p,
    };
    Ok(Json(payment_body(payment)))
}

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub status: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);
    let status = params
        .status
        .as_deref()
        .map(PaymentStatus::try_from)
        .transpose()
        .map_err(ApiError::from)?;

    let payments =
        payment_repo::list_for_user(&state.pool, user.id, status, page, limit).await?;

    Ok(Json(serde_json::json!({
        "page": page,
        "limit": limit,
        "payments": payments.iter().map(payment_body).collect::<Vec<_>>(),
    })))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let payment = payment_repo::get_by_id(&state.pool, id)
        .await?
        .filter(|p| p.is_owned_by(user.id))
        .ok_or(PaymentError::NotFound("payment"))?;

    Ok(Json(payment_body(&payment)))
}

fn payment_body(payment: &Payment) -> serde_json::Value {
    serde_json::json!({
        "payment": {
            "id": payment.id,
            "transactionRef": payment.txn_reference.as_str(),
            "status": payment.status.as_str(),
            "paidAt": payment.paid_at,
            "amount": payment.amount.minor(),
            "fee": payment.fee.minor(),
            "totalAmount": payment.total_amount.minor(),
            "method": payment.method.as_str(),
            "failureReason": payment.failure_reason,
        },
    })
}
