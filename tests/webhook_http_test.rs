mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
};
use binpay::domain::payment::PaymentMethod;
use binpay::services::notifier::LogChannel;
use binpay::services::reconciliation::initialize_payment;
use binpay::transport::http::{payments, webhook};
use binpay::AppState;
use common::*;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

const CALLBACK: &str = "https://pay.example/callback";

fn app(pool: sqlx::PgPool, gateway: Arc<FakeGateway>) -> Router {
    let state = AppState {
        pool,
        gateway,
        confirmations: Arc::new(LogChannel),
        fees: test_fees(),
        callback_url: CALLBACK.into(),
    };
    Router::new()
        .route("/payments/verify/{reference}", get(payments::verify))
        .route("/payments/webhook/gateway", post(webhook::gateway_webhook))
        .with_state(state)
}

fn contact() -> binpay::domain::payment::CustomerContact {
    binpay::domain::payment::CustomerContact {
        email: "payer@example.com".to_string(),
        phone: None,
    }
}

#[tokio::test]
async fn webhook_without_signature_is_rejected() {
    let pool = setup_pool("binpay_test_webhook_http").await;
    let app = app(pool, Arc::new(FakeGateway::default()));

    let (body, _) = signed_webhook("charge.success", "bp_abc123");
    let response = app
        .oneshot(
            Request::post("/payments/webhook/gateway")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn webhook_with_tampered_body_never_mutates() {
    let pool = setup_pool("binpay_test_webhook_http").await;
    let user = Uuid::now_v7();
    let bill_id = create_bill(&pool, user, 400_000).await;
    let gateway = Arc::new(FakeGateway::default());

    let init = initialize_payment(
        &pool,
        &*gateway,
        &test_fees(),
        CALLBACK,
        user,
        contact(),
        bill_id,
        PaymentMethod::Card,
    )
    .await
    .unwrap();

    // Signature computed over a different reference.
    let (_, signature) = signed_webhook("charge.success", "bp_other");
    let (body, _) = signed_webhook("charge.success", init.txn_reference.as_str());

    let response = app(pool.clone(), gateway)
        .oneshot(
            Request::post("/payments/webhook/gateway")
                .header("x-paystack-signature", signature)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let row = get_payment_row(&pool, init.txn_reference.as_str())
        .await
        .unwrap();
    assert_eq!(row.status, "processing");
    assert!(!row.webhook_consumed);
    assert_eq!(get_bill_row(&pool, bill_id).await.status, "unpaid");
}

#[tokio::test]
async fn signed_unknown_event_gets_200() {
    let pool = setup_pool("binpay_test_webhook_http").await;
    let app = app(pool, Arc::new(FakeGateway::default()));

    let (body, signature) = signed_webhook("transfer.success", "anything");
    let response = app
        .oneshot(
            Request::post("/payments/webhook/gateway")
                .header("x-paystack-signature", signature)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn webhook_for_unknown_reference_is_404() {
    let pool = setup_pool("binpay_test_webhook_http").await;
    let app = app(pool, Arc::new(FakeGateway::default()));

    let (body, signature) = signed_webhook("charge.success", "bp_ffffffffffffffff");
    let response = app
        .oneshot(
            Request::post("/payments/webhook/gateway")
                .header("x-paystack-signature", signature)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn verify_requires_identity_headers() {
    let pool = setup_pool("binpay_test_webhook_http").await;
    let app = app(pool, Arc::new(FakeGateway::default()));

    let response = app
        .oneshot(
            Request::get("/payments/verify/bp_abc123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
