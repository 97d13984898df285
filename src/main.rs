use {
    axum::{
        Router,
        extract::DefaultBodyLimit,
        routing::{get, post},
    },
    binpay::{
        AppState,
        config::Config,
        domain::fees::FeeSchedule,
        gateway::paystack::PaystackGateway,
        services::notifier::LogChannel,
        transport::http::{payments, webhook},
    },
    sqlx::postgres::PgPoolOptions,
    std::{sync::Arc, time::Duration},
    tokio::signal,
    tower_http::timeout::TimeoutLayer,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("invalid configuration");

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    let gateway = PaystackGateway::new(
        &config.paystack_base_url,
        &config.paystack_secret_key,
        &config.paystack_webhook_secret,
        config.gateway_timeout,
    );
    let fees = FeeSchedule::new(config.fee_rate_bps, config.fee_fixed_minor)
        .expect("invalid fee schedule");

    let state = AppState {
        pool,
        gateway: Arc::new(gateway),
        confirmations: Arc::new(LogChannel),
        fees,
        callback_url: config.callback_url.into(),
    };

    let app = Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/payments/initialize", post(payments::initialize))
        .route("/payments/verify/{reference}", get(payments::verify))
        .route("/payments/webhook/gateway", post(webhook::gateway_webhook))
        .route("/payments", get(payments::list))
        .route("/payments/history", get(payments::list))
        .route("/payments/{id}", get(payments::get_by_id))
        .layer(DefaultBodyLimit::max(64 * 1024)) // webhook bodies are small
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    tracing::info!("listening on 0.0.0.0:3000");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl+c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
