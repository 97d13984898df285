use {
    super::audit::NewAuditEntry,
    super::error::PaymentError,
    super::id::{GatewayReference, TxnReference},
    super::money::MinorAmount,
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    std::fmt,
    uuid::Uuid,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Completed and Failed are terminal; nothing leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn can_transition_to(&self, new: &PaymentStatus) -> bool {
        matches!(
            (self, new),
            (PaymentStatus::Pending, PaymentStatus::Processing)
                | (PaymentStatus::Pending, PaymentStatus::Completed)
                | (PaymentStatus::Pending, PaymentStatus::Failed)
                | (PaymentStatus::Processing, PaymentStatus::Completed)
                | (PaymentStatus::Processing, PaymentStatus::Failed)
        )
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = PaymentError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(PaymentError::Validation(format!(
                "unknown payment status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    BankTransfer,
    Ussd,
    MobileMoney,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::BankTransfer => "bank_transfer",
            Self::Ussd => "ussd",
            Self::MobileMoney => "mobile_money",
        }
    }

    /// Channel name the gateway expects in the initialize call.
    pub fn channel_hint(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::BankTransfer => "bank_transfer",
            Self::Ussd => "ussd",
            Self::MobileMoney => "mobile_money",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = PaymentError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "card" => Ok(Self::Card),
            "bank_transfer" => Ok(Self::BankTransfer),
            "ussd" => Ok(Self::Ussd),
            "mobile_money" => Ok(Self::MobileMoney),
            other => Err(PaymentError::Validation(format!(
                "unknown payment method: {other}"
            ))),
        }
    }
}

/// Closed structured metadata captured at initialization, for audit and
/// gateway display. Deliberately not an open map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMetadata {
    pub bill_number: String,
    pub bin_id: String,
    pub state_code: String,
}

/// Contact snapshot taken when the charge is initialized; never re-derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerContact {
    pub email: String,
    pub phone: Option<String>,
}

/// Full payment record as read from the ledger.
#[derive(Debug, Clone)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bill_id: Uuid,
    pub state_code: String,
    pub txn_reference: TxnReference,
    pub gateway_reference: Option<GatewayReference>,
    pub method: PaymentMethod,
    pub amount: MinorAmount,
    pub fee: MinorAmount,
    pub total_amount: MinorAmount,
    pub status: PaymentStatus,
    pub contact: CustomerContact,
    pub failure_reason: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub webhook_consumed: bool,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

pub struct NewPaymentParams {
    pub user_id: Uuid,
    pub bill_id: Uuid,
    pub state_code: String,
    pub method: PaymentMethod,
    pub amount: MinorAmount,
    pub fee: MinorAmount,
    pub total_amount: MinorAmount,
    pub contact: CustomerContact,
    pub metadata: PaymentMetadata,
}

/// For INSERT — id and txn reference generated in Rust.
#[derive(Debug, Clone)]
pub struct NewPayment {
    id: Uuid,
    txn_reference: TxnReference,
    user_id: Uuid,
    bill_id: Uuid,
    state_code: String,
    method: PaymentMethod,
    amount: MinorAmount,
    fee: MinorAmount,
    total_amount: MinorAmount,
    contact: CustomerContact,
    metadata: PaymentMetadata,
}

impl NewPayment {
    /// Validates the additivity invariant: total = amount + fee.
    pub fn new(params: NewPaymentParams) -> Result<Self, PaymentError> {
        let expected = params
            .amount
            .checked_add(params.fee)
            .ok_or_else(|| PaymentError::Validation("total overflow".into()))?;
        if expected != params.total_amount {
            return Err(PaymentError::Validation(format!(
                "total {} != amount {} + fee {}",
                params.total_amount, params.amount, params.fee
            )));
        }
        Ok(Self {
            id: Uuid::now_v7(),
            txn_reference: TxnReference::generate(),
            user_id: params.user_id,
            bill_id: params.bill_id,
            state_code: params.state_code,
            method: params.method,
            amount: params.amount,
            fee: params.fee,
            total_amount: params.total_amount,
            contact: params.contact,
            metadata: params.metadata,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn txn_reference(&self) -> &TxnReference {
        &self.txn_reference
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn bill_id(&self) -> Uuid {
        self.bill_id
    }

    pub fn state_code(&self) -> &str {
        &self.state_code
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn amount(&self) -> MinorAmount {
        self.amount
    }

    pub fn fee(&self) -> MinorAmount {
        self.fee
    }

    pub fn total_amount(&self) -> MinorAmount {
        self.total_amount
    }

    pub fn contact(&self) -> &CustomerContact {
        &self.contact
    }

    pub fn metadata(&self) -> &PaymentMetadata {
        &self.metadata
    }

    pub fn audit_entry(&self, actor: &str, action: &str) -> NewAuditEntry {
        NewAuditEntry {
            id: Uuid::now_v7(),
            entity_type: "payment".to_string(),
            entity_id: Some(self.id),
            reference: Some(self.txn_reference.as_str().to_string()),
            action: action.to_string(),
            actor: actor.to_string(),
            detail: serde_json::json!({
                "bill_id": self.bill_id,
                "method": self.method.as_str(),
                "amount": self.amount.minor(),
                "fee": self.fee.minor(),
                "total_amount": self.total_amount.minor(),
            }),
        }
    }
}
