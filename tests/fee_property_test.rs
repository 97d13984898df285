use binpay::domain::fees::FeeSchedule;
use binpay::domain::money::MinorAmount;
use binpay::domain::payment::PaymentStatus;
use proptest::prelude::*;

fn arb_status() -> impl Strategy<Value = PaymentStatus> {
    prop_oneof![
        Just(PaymentStatus::Pending),
        Just(PaymentStatus::Processing),
        Just(PaymentStatus::Completed),
        Just(PaymentStatus::Failed),
    ]
}

proptest! {
    /// fee(b) + b == total(b) for every positive base.
    #[test]
    fn fee_is_additive(base in 1i64..=1_000_000_000_000, bps in 0i64..=10_000, fixed in 0i64..=1_000_000) {
        let fees = FeeSchedule::new(bps, fixed).unwrap();
        let base = MinorAmount::positive(base).unwrap();
        let fee = fees.fee(base).unwrap();
        let total = fees.total(base).unwrap();
        prop_assert_eq!(base.minor() + fee.minor(), total.minor());
    }

    /// total is monotonically non-decreasing in the base amount.
    #[test]
    fn total_is_monotonic(a in 1i64..=1_000_000_000, b in 1i64..=1_000_000_000) {
        let fees = FeeSchedule::new(150, 10_000).unwrap();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo = fees.total(MinorAmount::positive(lo).unwrap()).unwrap();
        let hi = fees.total(MinorAmount::positive(hi).unwrap()).unwrap();
        prop_assert!(lo <= hi);
    }

    /// Non-positive base amounts are rejected outright.
    #[test]
    fn non_positive_base_rejected(base in i64::MIN..=0) {
        prop_assert!(MinorAmount::positive(base).is_err());
    }

    /// Terminal states (Completed, Failed) can never transition to anything.
    #[test]
    fn terminal_states_reject_all_transitions(target in arb_status()) {
        use PaymentStatus::*;
        for terminal in [Completed, Failed] {
            prop_assert!(!terminal.can_transition_to(&target));
        }
    }

    /// Any random walk from Pending reaches a terminal state in at most
    /// two valid steps.
    #[test]
    fn random_walk_terminates(steps in prop::collection::vec(arb_status(), 1..20)) {
        let mut current = PaymentStatus::Pending;
        let mut transitions = 0u32;
        for next in &steps {
            if current.can_transition_to(next) {
                current = *next;
                transitions += 1;
            }
        }
        prop_assert!(transitions <= 2, "got {transitions} transitions in walk: {steps:?}");
    }

    /// as_str → try_from roundtrip is identity for any status.
    #[test]
    fn status_roundtrip(status in arb_status()) {
        let roundtripped = PaymentStatus::try_from(status.as_str()).unwrap();
        prop_assert_eq!(roundtripped, status);
    }
}

/// Round-half-up at the configured rate: 1.5% + 10000 on 500000 is 17500.
#[test]
fn documented_fee_scenario() {
    let fees = FeeSchedule::new(150, 10_000).unwrap();
    let base = MinorAmount::positive(500_000).unwrap();
    assert_eq!(fees.fee(base).unwrap().minor(), 17_500);
    assert_eq!(fees.total(base).unwrap().minor(), 517_500);
}

/// 333 × 1.5% = 4.995, which rounds up to 5.
#[test]
fn fee_rounds_half_up() {
    let fees = FeeSchedule::new(150, 0).unwrap();
    let base = MinorAmount::positive(333).unwrap();
    assert_eq!(fees.fee(base).unwrap().minor(), 5);

    // 300 × 1.5% = 4.5 exactly — half rounds up.
    let base = MinorAmount::positive(300).unwrap();
    assert_eq!(fees.fee(base).unwrap().minor(), 5);
}

/// A zero charge base is invalid even though MinorAmount::new accepts zero.
#[test]
fn zero_base_rejected_by_fee() {
    let fees = FeeSchedule::new(150, 10_000).unwrap();
    let zero = MinorAmount::new(0).unwrap();
    assert!(fees.fee(zero).is_err());
}

/// Extreme inputs surface as validation errors, never integer overflow.
#[test]
fn fee_overflow_is_rejected() {
    // base × 1 bps fits in i64, but the rounding addend pushes it over.
    let fees = FeeSchedule::new(1, 0).unwrap();
    let base = MinorAmount::positive(i64::MAX - 100).unwrap();
    assert!(fees.fee(base).is_err());

    // the fixed component alone can overflow the percentage part.
    let fees = FeeSchedule::new(10_000, i64::MAX).unwrap();
    let base = MinorAmount::positive(10_000).unwrap();
    assert!(fees.fee(base).is_err());
}
