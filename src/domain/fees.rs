use {super::error::PaymentError, super::money::MinorAmount};

/// Gateway fee schedule: a percentage (in basis points) plus a fixed
/// component, both applied in minor units. Integer math only.
#[derive(Debug, Clone, Copy)]
pub struct FeeSchedule {
    rate_bps: i64,
    fixed_minor: i64,
}

impl FeeSchedule {
    pub fn new(rate_bps: i64, fixed_minor: i64) -> Result<Self, PaymentError> {
        if rate_bps < 0 || fixed_minor < 0 {
            return Err(PaymentError::Validation(format!(
                "fee schedule must be non-negative, got rate {rate_bps} bps, fixed {fixed_minor}"
            )));
        }
        Ok(Self {
            rate_bps,
            fixed_minor,
        })
    }

    /// fee = round_half_up(base × rate) + fixed.
    pub fn fee(&self, base: MinorAmount) -> Result<MinorAmount, PaymentError> {
        let base = MinorAmount::positive(base.minor())?;
        let scaled = base
            .minor()
            .checked_mul(self.rate_bps)
            .ok_or_else(|| PaymentError::Validation("fee overflow".into()))?;
        // round half up on the bps divisor
        let percentage = scaled
            .checked_add(5_000)
            .ok_or_else(|| PaymentError::Validation("fee overflow".into()))?
            / 10_000;
        let fee = percentage
            .checked_add(self.fixed_minor)
            .ok_or_else(|| PaymentError::Validation("fee overflow".into()))?;
        MinorAmount::new(fee)
    }

    /// total = base + fee. Additivity holds for every valid base.
    pub fn total(&self, base: MinorAmount) -> Result<MinorAmount, PaymentError> {
        let fee = self.fee(base)?;
        base.checked_add(fee)
            .ok_or_else(|| PaymentError::Validation("total overflow".into()))
    }
}
