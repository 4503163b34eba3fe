//! Signature algorithm and verification for the payment gateway.
//!
//! Both schemes are hex-encoded HMAC-SHA256:
//!
//! * **Payment signing** (checkout callback):
//!   `HMAC-SHA256("{gateway_order_id}|{payment_id}", key_secret)`
//!
//! * **Webhook signing** (gateway callbacks):
//!   `HMAC-SHA256(raw_body_bytes, webhook_secret)`, carried in the
//!   `X-Razorpay-Signature` header.
//!
//! Verification always goes through [`ring::hmac::verify`], which compares
//! in constant time.

use ring::hmac;

/// Header name carrying the webhook body signature.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "X-Razorpay-Signature";

/// Errors produced by signature operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("missing signature")]
    Missing,
    #[error("invalid hex encoding")]
    InvalidHex,
    #[error("invalid signature")]
    SignatureMismatch,
}

impl From<ring::error::Unspecified> for SignatureError {
    fn from(_: ring::error::Unspecified) -> Self {
        Self::SignatureMismatch
    }
}

fn hmac_key(secret: &[u8]) -> hmac::Key {
    hmac::Key::new(hmac::HMAC_SHA256, secret)
}

/// The exact message signed for a checkout payment.
pub fn payment_message(gateway_order_id: &str, payment_id: &str) -> String {
    format!("{gateway_order_id}|{payment_id}")
}

/// Sign a payment confirmation, returning the lowercase hex digest.
pub fn sign_payment(gateway_order_id: &str, payment_id: &str, key_secret: &[u8]) -> String {
    sign_bytes(
        payment_message(gateway_order_id, payment_id).as_bytes(),
        key_secret,
    )
}

/// Verify a hex payment signature returned by the checkout widget.
pub fn verify_payment(
    gateway_order_id: &str,
    payment_id: &str,
    signature: &str,
    key_secret: &[u8],
) -> Result<(), SignatureError> {
    verify_bytes(
        payment_message(gateway_order_id, payment_id).as_bytes(),
        signature,
        key_secret,
    )
}

/// Sign a raw webhook body, returning the lowercase hex digest.
pub fn sign_webhook(body: &[u8], webhook_secret: &[u8]) -> String {
    sign_bytes(body, webhook_secret)
}

/// Verify the hex signature of a raw webhook body.
pub fn verify_webhook(
    body: &[u8],
    signature: &str,
    webhook_secret: &[u8],
) -> Result<(), SignatureError> {
    verify_bytes(body, signature, webhook_secret)
}

fn sign_bytes(data: &[u8], secret: &[u8]) -> String {
    hex::encode(hmac::sign(&hmac_key(secret), data).as_ref())
}

fn verify_bytes(data: &[u8], signature: &str, secret: &[u8]) -> Result<(), SignatureError> {
    let signature = signature.trim();
    if signature.is_empty() {
        return Err(SignatureError::Missing);
    }
    let expected = hex::decode(signature).map_err(|_| SignatureError::InvalidHex)?;
    hmac::verify(&hmac_key(secret), data, &expected)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc4231_vector() {
        // RFC 4231, test case 2
        let sig = sign_bytes(b"what do ya want for nothing?", b"Jefe");
        assert_eq!(
            sig,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_payment_signature_roundtrip() {
        let secret = b"key_secret";
        let sig = sign_payment("order_A1", "pay_1", secret);
        assert!(verify_payment("order_A1", "pay_1", &sig, secret).is_ok());
        assert!(verify_payment("order_A1", "pay_1", &sig.to_uppercase(), secret).is_ok());
    }

    #[test]
    fn test_payment_signature_is_bound_to_both_ids() {
        let secret = b"key_secret";
        let sig = sign_payment("order_A1", "pay_1", secret);
        assert_eq!(
            verify_payment("order_A1", "pay_2", &sig, secret),
            Err(SignatureError::SignatureMismatch)
        );
        assert_eq!(
            verify_payment("order_B1", "pay_1", &sig, secret),
            Err(SignatureError::SignatureMismatch)
        );
        assert_eq!(
            verify_payment("order_A1", "pay_1", &sig, b"other"),
            Err(SignatureError::SignatureMismatch)
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(
            verify_webhook(b"{}", "not-hex", b"s"),
            Err(SignatureError::InvalidHex)
        );
        assert_eq!(
            verify_webhook(b"{}", "  ", b"s"),
            Err(SignatureError::Missing)
        );
        assert_eq!(
            verify_webhook(b"{}", "abcd", b"s"),
            Err(SignatureError::SignatureMismatch)
        );
    }

    #[test]
    fn test_webhook_signature_covers_exact_bytes() {
        let secret = b"whsec";
        let body = br#"{"event":"refund.processed"}"#;
        let sig = sign_webhook(body, secret);
        assert!(verify_webhook(body, &sig, secret).is_ok());
        let reformatted = br#"{ "event": "refund.processed" }"#;
        assert!(verify_webhook(reformatted, &sig, secret).is_err());
    }
}
