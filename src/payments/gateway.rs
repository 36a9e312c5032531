//! Payment gateway verification. The gateway itself is an external
//! collaborator; all this core does is check the signature the client
//! relays after checkout and act on the verdict. The verifier sits behind
//! a trait so the webhook path can be exercised without a live gateway.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
}

#[derive(Debug)]
pub enum GatewayError {
    InvalidSignature,
    MissingSecret,
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSignature => write!(f, "Signature does not match payload"),
            Self::MissingSecret => write!(f, "Webhook secret is not configured"),
        }
    }
}

impl std::error::Error for GatewayError {}

pub trait GatewayVerifier: Send + Sync {
    fn verify(&self, req: &VerificationRequest) -> Result<(), GatewayError>;
}

/// Verifies `HMAC-SHA256(secret, "{order_id}|{payment_id}")` against the
/// hex signature submitted by the gateway callback.
pub struct HmacGatewayVerifier {
    secret: String,
}

impl HmacGatewayVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn sign(&self, order_id: &str, payment_id: &str) -> Result<String, GatewayError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| GatewayError::MissingSecret)?;
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl GatewayVerifier for HmacGatewayVerifier {
    fn verify(&self, req: &VerificationRequest) -> Result<(), GatewayError> {
        if self.secret.is_empty() {
            return Err(GatewayError::MissingSecret);
        }
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| GatewayError::MissingSecret)?;
        mac.update(
            format!("{}|{}", req.gateway_order_id, req.gateway_payment_id).as_bytes(),
        );
        let submitted =
            hex::decode(&req.signature).map_err(|_| GatewayError::InvalidSignature)?;
        mac.verify_slice(&submitted)
            .map_err(|_| GatewayError::InvalidSignature)
    }
}

/// Fixed-verdict verifier for tests.
pub struct StaticVerifier {
    pub accept: bool,
}

impl GatewayVerifier for StaticVerifier {
    fn verify(&self, _req: &VerificationRequest) -> Result<(), GatewayError> {
        if self.accept {
            Ok(())
        } else {
            Err(GatewayError::InvalidSignature)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(signature: String) -> VerificationRequest {
        VerificationRequest {
            gateway_order_id: "order_123".to_string(),
            gateway_payment_id: "pay_456".to_string(),
            signature,
        }
    }

    #[test]
    fn test_valid_signature_accepted() {
        let verifier = HmacGatewayVerifier::new("test-secret");
        let signature = verifier.sign("order_123", "pay_456").unwrap();
        assert!(verifier.verify(&request(signature)).is_ok());
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let verifier = HmacGatewayVerifier::new("test-secret");
        let mut signature = verifier.sign("order_123", "pay_456").unwrap();
        let flipped = if signature.starts_with("00") { "11" } else { "00" };
        signature.replace_range(0..2, flipped);
        // A flipped byte must fail; so must a signature for other ids.
        let err = verifier.verify(&request(signature)).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidSignature));

        let other = verifier.sign("order_999", "pay_456").unwrap();
        assert!(verifier.verify(&request(other)).is_err());
    }

    #[test]
    fn test_non_hex_signature_rejected() {
        let verifier = HmacGatewayVerifier::new("test-secret");
        let err = verifier.verify(&request("not hex!".to_string())).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidSignature));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let verifier = HmacGatewayVerifier::new("");
        let err = verifier.verify(&request("00".to_string())).unwrap_err();
        assert!(matches!(err, GatewayError::MissingSecret));
    }

    #[test]
    fn test_static_verifier() {
        assert!(StaticVerifier { accept: true }
            .verify(&request("x".into()))
            .is_ok());
        assert!(StaticVerifier { accept: false }
            .verify(&request("x".into()))
            .is_err());
    }
}
