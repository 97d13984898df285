use {
    super::errors::ApiError,
    crate::{
        AppState,
        domain::{error::PaymentError, gateway::GatewayEvent},
        services::reconciliation::{self, WebhookOutcome},
    },
    axum::{Json, extract::State, http::HeaderMap},
};

/// Unauthenticated by session; the HMAC signature over the raw body is the
/// authorization gate.
#[tracing::instrument(name = "webhook", skip_all, fields(event_type = tracing::field::Empty))]
pub async fn gateway_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<serde_json::Value>, ApiError> {
    let signature = headers
        .get("x-paystack-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            PaymentError::InvalidSignature("missing x-paystack-signature header".into())
        })?;

    if !state.gateway.verify_signature(body.as_bytes(), signature) {
        return Err(PaymentError::InvalidSignature("signature mismatch".into()).into());
    }

    let event = GatewayEvent::parse(body.as_bytes()).map_err(|e| match e {
        PaymentError::Serialization(err) => {
            PaymentError::Validation(format!("malformed webhook payload: {err}"))
        }
        other => other,
    })?;

    if let GatewayEvent::Other(event_type) = &event {
        tracing::Span::current().record("event_type", tracing::field::display(event_type));
    }

    match reconciliation::apply_webhook_event(&state.pool, &*state.confirmations, event).await? {
        WebhookOutcome::Completed => {
            Ok(Json(serde_json::json!({"message": "payment completed"})))
        }
        WebhookOutcome::Failed => {
            Ok(Json(serde_json::json!({"message": "failure recorded"})))
        }
        WebhookOutcome::AlreadyProcessed => {
            Ok(Json(serde_json::json!({"message": "already processed"})))
        }
        WebhookOutcome::Ignored(event_type) => Ok(Json(serde_json::json!({
            "message": format!("event {event_type} ignored")
        }))),
    }
}
