use {
    super::error::PaymentError,
    super::money::MinorAmount,
    chrono::{DateTime, Utc},
    std::fmt,
    uuid::Uuid,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillStatus {
    Unpaid,
    Paid,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for BillStatus {
    type Error = PaymentError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "unpaid" => Ok(Self::Unpaid),
            "paid" => Ok(Self::Paid),
            other => Err(PaymentError::Validation(format!(
                "unknown bill status: {other}"
            ))),
        }
    }
}

/// The facet of a bill this core reads and mutates. Bills are owned by the
/// wider system; only the completion protocol may move one to Paid.
#[derive(Debug, Clone)]
pub struct Bill {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bill_number: String,
    pub bin_id: String,
    pub state_code: String,
    pub amount_due: MinorAmount,
    pub status: BillStatus,
    pub amount_paid: Option<MinorAmount>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl Bill {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn is_paid(&self) -> bool {
        self.status == BillStatus::Paid
    }
}
