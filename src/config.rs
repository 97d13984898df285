use {crate::domain::error::PaymentError, std::env, std::time::Duration};

/// Environment-driven configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub paystack_base_url: String,
    pub paystack_secret_key: String,
    pub paystack_webhook_secret: String,
    pub callback_url: String,
    pub fee_rate_bps: i64,
    pub fee_fixed_minor: i64,
    pub gateway_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, PaymentError> {
        let required = |name: &str| {
            env::var(name)
                .map_err(|_| PaymentError::Validation(format!("{name} must be set")))
        };
        let parsed = |name: &str, default: i64| -> Result<i64, PaymentError> {
            match env::var(name) {
                Ok(v) => v
                    .parse()
                    .map_err(|_| PaymentError::Validation(format!("{name} must be an integer"))),
                Err(_) => Ok(default),
            }
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            paystack_base_url: env::var("PAYSTACK_BASE_URL")
                .unwrap_or_else(|_| "https://api.paystack.co".to_string()),
            paystack_secret_key: required("PAYSTACK_SECRET_KEY")?,
            paystack_webhook_secret: required("PAYSTACK_WEBHOOK_SECRET")?,
            callback_url: required("CALLBACK_URL")?,
            fee_rate_bps: parsed("FEE_RATE_BPS", 150)?,
            fee_fixed_minor: parsed("FEE_FIXED_MINOR", 10_000)?,
            gateway_timeout: Duration::from_millis(parsed("GATEWAY_TIMEOUT_MS", 10_000)? as u64),
        })
    }
}
