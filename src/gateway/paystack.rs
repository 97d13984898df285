use {
    crate::domain::{
        error::PaymentError,
        gateway::{InitializeRequest, InitializedCharge, PaymentGateway, VerifiedCharge},
        id::GatewayReference,
    },
    hmac::{Hmac, Mac},
    serde_json::json,
    sha2::Sha512,
    std::time::Duration,
    subtle::ConstantTimeEq,
};

/// Paystack-style HTTP client. Holds no state beyond credentials and the
/// connection pool inside `reqwest::Client`.
pub struct PaystackGateway {
    base_url: String,
    secret_key: String,
    webhook_secret: String,
    client: reqwest::Client,
}

impl PaystackGateway {
    pub fn new(
        base_url: impl Into<String>,
        secret_key: impl Into<String>,
        webhook_secret: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build http client");
        Self {
            base_url: base_url.into(),
            secret_key: secret_key.into(),
            webhook_secret: webhook_secret.into(),
            client,
        }
    }

    async fn read_body(
        resp: reqwest::Response,
    ) -> Result<serde_json::Value, PaymentError> {
        let status = resp.status();
        let body: serde_json::Value = resp.json().await.map_err(|e| {
            PaymentError::GatewayUnavailable(format!("unreadable gateway response: {e}"))
        })?;
        if status.is_success() {
            return Ok(body);
        }
        let message = body
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("gateway error")
            .to_string();
        if status.is_server_error() {
            Err(PaymentError::GatewayUnavailable(format!(
                "HTTP {}: {message}",
                status.as_u16()
            )))
        } else {
            Err(PaymentError::GatewayRejected(message))
        }
    }
}

fn transport_error(e: reqwest::Error) -> PaymentError {
    if e.is_timeout() {
        PaymentError::GatewayUnavailable("gateway timeout".into())
    } else {
        PaymentError::GatewayUnavailable(e.to_string())
    }
}

#[async_trait::async_trait]
impl PaymentGateway for PaystackGateway {
    async fn initialize(&self, req: InitializeRequest) -> Result<InitializedCharge, PaymentError> {
        let url = format!("{}/transaction/initialize", self.base_url);
        let body = json!({
            "email": req.contact.email,
            "amount": req.total_amount.minor(),
            "reference": req.reference.as_str(),
            "callback_url": req.callback_url,
            "channels": [req.channel_hint],
            "metadata": {
                "bill_number": req.metadata.bill_number,
                "bin_id": req.metadata.bin_id,
                "state_code": req.metadata.state_code,
            },
        });

        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let body = Self::read_body(resp).await?;
        let data = body
            .get("data")
            .ok_or_else(|| PaymentError::GatewayUnavailable("initialize: no data".into()))?;

        let field = |name: &str| -> Result<String, PaymentError> {
            data.get(name)
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    PaymentError::GatewayUnavailable(format!("initialize: missing {name}"))
                })
        };

        Ok(InitializedCharge {
            authorization_url: field("authorization_url")?,
            access_code: field("access_code")?,
            gateway_reference: GatewayReference::new(field("reference")?)?,
        })
    }

    async fn verify(&self, reference: &GatewayReference) -> Result<VerifiedCharge, PaymentError> {
        let url = format!("{}/transaction/verify/{}", self.base_url, reference.as_str());

        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(transport_error)?;

        let body = Self::read_body(resp).await?;
        let data = body
            .get("data")
            .ok_or_else(|| PaymentError::GatewayUnavailable("verify: no data".into()))?;

        let status = data
            .get("status")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        let detail = data
            .get("gateway_response")
            .and_then(|v| v.as_str())
            .unwrap_or(status)
            .to_string();

        Ok(VerifiedCharge {
            success: status == "success",
            status_detail: detail,
            raw_payload: body,
        })
    }

    fn verify_signature(&self, raw_payload: &[u8], signature: &str) -> bool {
        verify_hmac_sha512(self.webhook_secret.as_bytes(), raw_payload, signature)
    }
}

/// HMAC-SHA512 over the exact raw body bytes, hex-encoded, compared in
/// constant time. An empty secret fails closed.
pub fn verify_hmac_sha512(secret: &[u8], payload: &[u8], signature: &str) -> bool {
    if secret.is_empty() {
        return false;
    }
    let Ok(mut mac) = Hmac::<Sha512>::new_from_slice(secret) else {
        return false;
    };
    mac.update(payload);
    let expected = hex::encode(mac.finalize().into_bytes());
    bool::from(ConstantTimeEq::ct_eq(
        signature.as_bytes(),
        expected.as_bytes(),
    ))
}

/// Hex signature for a payload — used by tests and local tooling to build
/// valid webhook requests.
pub fn sign_hmac_sha512(secret: &[u8], payload: &[u8]) -> String {
    let mut mac = Hmac::<Sha512>::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}
