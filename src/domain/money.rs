use {
    super::error::PaymentError,
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// An amount in the currency's minor unit (kobo). Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinorAmount(i64);

impl MinorAmount {
    pub fn new(minor: i64) -> Result<Self, PaymentError> {
        if minor < 0 {
            return Err(PaymentError::Validation(format!(
                "MinorAmount cannot be negative, got: {minor}"
            )));
        }
        Ok(Self(minor))
    }

    /// A strictly positive amount — bill amounts and charge bases.
    pub fn positive(minor: i64) -> Result<Self, PaymentError> {
        if minor <= 0 {
            return Err(PaymentError::Validation(format!(
                "amount must be positive, got: {minor}"
            )));
        }
        Ok(Self(minor))
    }

    pub fn minor(&self) -> i64 {
        self.0
    }

    pub fn checked_add(self, other: MinorAmount) -> Option<MinorAmount> {
        self.0.checked_add(other.0).map(MinorAmount)
    }
}

impl fmt::Display for MinorAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
