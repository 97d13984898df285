use binpay::domain::gateway::{EventReference, GatewayEvent};
use binpay::gateway::paystack::{sign_hmac_sha512, verify_hmac_sha512};

const SECRET: &[u8] = b"whsec_test";

#[test]
fn valid_signature_verifies() {
    let body = br#"{"event":"charge.success","data":{"reference":"bp_abc"}}"#;
    let sig = sign_hmac_sha512(SECRET, body);
    assert!(verify_hmac_sha512(SECRET, body, &sig));
}

#[test]
fn tampered_payload_rejected() {
    let body = br#"{"event":"charge.success","data":{"reference":"bp_abc"}}"#;
    let sig = sign_hmac_sha512(SECRET, body);
    let tampered = br#"{"event":"charge.success","data":{"reference":"bp_xyz"}}"#;
    assert!(!verify_hmac_sha512(SECRET, tampered, &sig));
}

#[test]
fn wrong_secret_rejected() {
    let body = br#"{"event":"charge.success","data":{"reference":"bp_abc"}}"#;
    let sig = sign_hmac_sha512(b"other_secret", body);
    assert!(!verify_hmac_sha512(SECRET, body, &sig));
}

#[test]
fn garbage_signature_rejected() {
    let body = br#"{"event":"charge.success"}"#;
    assert!(!verify_hmac_sha512(SECRET, body, "not-even-hex"));
    assert!(!verify_hmac_sha512(SECRET, body, ""));
}

#[test]
fn empty_secret_fails_closed() {
    let body = br#"{"event":"charge.success"}"#;
    let sig = sign_hmac_sha512(SECRET, body);
    assert!(!verify_hmac_sha512(b"", body, &sig));
}

// ── Event parsing ──────────────────────────────────────────────────────────

#[test]
fn parses_charge_success_with_merchant_reference() {
    let body = br#"{"event":"charge.success","data":{"reference":"bp_0191f00aa"}}"#;
    match GatewayEvent::parse(body).unwrap() {
        GatewayEvent::ChargeSuccess { reference, .. } => match reference {
            EventReference::Txn(r) => assert_eq!(r.as_str(), "bp_0191f00aa"),
            other => panic!("expected merchant reference, got {other:?}"),
        },
        other => panic!("expected ChargeSuccess, got {other:?}"),
    }
}

#[test]
fn parses_charge_success_with_gateway_reference() {
    let body = br#"{"event":"charge.success","data":{"reference":"4099260516"}}"#;
    match GatewayEvent::parse(body).unwrap() {
        GatewayEvent::ChargeSuccess { reference, .. } => match reference {
            EventReference::Gateway(r) => assert_eq!(r.as_str(), "4099260516"),
            other => panic!("expected gateway reference, got {other:?}"),
        },
        other => panic!("expected ChargeSuccess, got {other:?}"),
    }
}

#[test]
fn parses_charge_failed_with_reason() {
    let body = br#"{"event":"charge.failed","data":{"reference":"bp_abc1","gateway_response":"insufficient funds"}}"#;
    match GatewayEvent::parse(body).unwrap() {
        GatewayEvent::ChargeFailed { reason, .. } => assert_eq!(reason, "insufficient funds"),
        other => panic!("expected ChargeFailed, got {other:?}"),
    }
}

#[test]
fn unknown_event_types_are_no_ops() {
    for event in ["transfer.success", "subscription.create", "invoice.update"] {
        let body = format!(r#"{{"event":"{event}","data":{{}}}}"#);
        match GatewayEvent::parse(body.as_bytes()).unwrap() {
            GatewayEvent::Other(t) => assert_eq!(t, event),
            other => panic!("expected Other, got {other:?}"),
        }
    }
}

#[test]
fn acted_on_event_without_reference_is_an_error() {
    let body = br#"{"event":"charge.success","data":{}}"#;
    assert!(GatewayEvent::parse(body).is_err());
}
