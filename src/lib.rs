pub mod config;
pub mod domain;
pub mod gateway;
pub mod infra;
pub mod services;
pub mod transport;

use {
    crate::domain::{fees::FeeSchedule, gateway::PaymentGateway},
    crate::services::notifier::ConfirmationChannel,
    std::sync::Arc,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::PgPool,
    pub gateway: Arc<dyn PaymentGateway>,
    pub confirmations: Arc<dyn ConfirmationChannel>,
    pub fees: FeeSchedule,
    pub callback_url: Arc<str>,
}
