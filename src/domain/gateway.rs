use {
    super::error::PaymentError,
    super::id::{GatewayReference, TxnReference},
    super::money::MinorAmount,
    super::payment::{CustomerContact, PaymentMetadata},
    serde::Deserialize,
};

/// Outbound initialize call, assembled by the reconciliation service.
pub struct InitializeRequest {
    pub contact: CustomerContact,
    pub total_amount: MinorAmount,
    pub reference: TxnReference,
    pub callback_url: String,
    pub channel_hint: &'static str,
    pub metadata: PaymentMetadata,
}

/// What a successful initialize hands back: where to send the payer, plus
/// the reference the gateway will use from here on.
#[derive(Debug, Clone)]
pub struct InitializedCharge {
    pub authorization_url: String,
    pub access_code: String,
    pub gateway_reference: GatewayReference,
}

/// Outcome of a verify call. `success` is the gateway's word on whether
/// money moved; `status_detail` carries its reason when it didn't.
#[derive(Debug, Clone)]
pub struct VerifiedCharge {
    pub success: bool,
    pub status_detail: String,
    pub raw_payload: serde_json::Value,
}

/// Seam between the reconciliation service and the wire. The service is
/// tested against a scripted fake; production wires up the Paystack client.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn initialize(&self, req: InitializeRequest) -> Result<InitializedCharge, PaymentError>;

    async fn verify(&self, reference: &GatewayReference) -> Result<VerifiedCharge, PaymentError>;

    /// HMAC check over the exact raw body bytes. Returns false on any
    /// mismatch; never errors.
    fn verify_signature(&self, raw_payload: &[u8], signature: &str) -> bool;
}

// ── Webhook event model ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawWebhook {
    event: String,
    data: RawWebhookData,
}

#[derive(Debug, Deserialize)]
struct RawWebhookData {
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    gateway_reference: Option<String>,
    #[serde(default)]
    gateway_response: Option<String>,
}

/// The reference a webhook carries — the gateway may send either ours or
/// its own.
#[derive(Debug, Clone)]
pub enum EventReference {
    Txn(TxnReference),
    Gateway(GatewayReference),
}

/// Closed enumeration of gateway events. Everything outside the two acted-on
/// types is acknowledged as a no-op but kept visible by name.
#[derive(Debug)]
pub enum GatewayEvent {
    ChargeSuccess {
        reference: EventReference,
        raw_payload: serde_json::Value,
    },
    ChargeFailed {
        reference: EventReference,
        reason: String,
        raw_payload: serde_json::Value,
    },
    Other(String),
}

impl GatewayEvent {
    pub fn parse(raw_body: &[u8]) -> Result<Self, PaymentError> {
        let raw: RawWebhook = serde_json::from_slice(raw_body)?;
        match raw.event.as_str() {
            "charge.success" | "charge.failed" => {
                let reference = event_reference(&raw.data).ok_or_else(|| {
                    PaymentError::Validation(format!(
                        "webhook event {} carries no reference",
                        raw.event
                    ))
                })?;
                let raw_payload: serde_json::Value = serde_json::from_slice(raw_body)?;
                if raw.event == "charge.success" {
                    Ok(Self::ChargeSuccess {
                        reference,
                        raw_payload,
                    })
                } else {
                    Ok(Self::ChargeFailed {
                        reference,
                        reason: raw
                            .data
                            .gateway_response
                            .unwrap_or_else(|| "declined".to_string()),
                        raw_payload,
                    })
                }
            }
            _ => Ok(Self::Other(raw.event)),
        }
    }
}

fn event_reference(data: &RawWebhookData) -> Option<EventReference> {
    if let Some(r) = &data.reference {
        // Merchant references carry our prefix; anything else is the
        // gateway's own naming.
        if let Ok(txn) = TxnReference::parse(r.clone()) {
            return Some(EventReference::Txn(txn));
        }
        return GatewayReference::new(r.clone()).ok().map(EventReference::Gateway);
    }
    data.gateway_reference
        .as_ref()
        .and_then(|r| GatewayReference::new(r.clone()).ok())
        .map(EventReference::Gateway)
}
