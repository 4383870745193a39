//! HMAC-SHA256 verification of carrier webhooks.
//!
//! Verification is mandatory. Without a configured secret every webhook is
//! refused.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex signature of the raw request body.
pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

const SIGNATURE_PREFIX: &str = "sha256=";

/// Why a webhook signature was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// No shared secret is configured.
    #[error("webhook secret is not configured")]
    MissingSecret,
    /// Neither the header nor the payload carried a signature.
    #[error("webhook signature is missing")]
    MissingSignature,
    /// The signature is not hex.
    #[error("webhook signature is malformed")]
    Malformed,
    /// The signature does not match.
    #[error("webhook signature does not match")]
    Mismatch,
}

impl SignatureError {
    /// Stable reason code for logs and error details.
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            Self::MissingSecret => "missing_secret",
            Self::MissingSignature => "missing_signature",
            Self::Malformed => "malformed",
            Self::Mismatch => "mismatch",
        }
    }
}

/// Verifies webhook signatures under the shared secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: Option<Zeroizing<String>>,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("configured", &self.secret.is_some())
            .finish()
    }
}

impl WebhookVerifier {
    /// Build a verifier; a blank secret counts as absent.
    #[must_use]
    pub fn new(secret: Option<Zeroizing<String>>) -> Self {
        Self {
            secret: secret.filter(|value| !value.trim().is_empty()),
        }
    }

    /// Whether a secret is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    fn mac(&self) -> Result<HmacSha256, SignatureError> {
        let secret = self.secret.as_ref().ok_or(SignatureError::MissingSecret)?;
        // HMAC accepts keys of any length.
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::MissingSecret)
    }

    /// Hex signature of `message`.
    ///
    /// # Errors
    ///
    /// [`SignatureError::MissingSecret`] without a secret.
    ///
    /// # Examples
    /// ```
    /// use shipping::domain::reconciliation::WebhookVerifier;
    /// use zeroize::Zeroizing;
    ///
    /// let verifier = WebhookVerifier::new(Some(Zeroizing::new("s3cret".to_owned())));
    /// let signature = verifier.sign(b"{}")?;
    /// assert!(verifier.verify(b"{}", &signature).is_ok());
    /// # Ok::<(), shipping::domain::reconciliation::SignatureError>(())
    /// ```
    pub fn sign(&self, message: &[u8]) -> Result<String, SignatureError> {
        let mut mac = self.mac()?;
        mac.update(message);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Check a hex signature, optionally prefixed `sha256=`, in constant time.
    ///
    /// # Errors
    ///
    /// Any [`SignatureError`] describing the refusal.
    pub fn verify(&self, message: &[u8], signature: &str) -> Result<(), SignatureError> {
        let mut mac = self.mac()?;
        let trimmed = signature.trim();
        if trimmed.is_empty() {
            return Err(SignatureError::MissingSignature);
        }
        let hex_digest = trimmed.strip_prefix(SIGNATURE_PREFIX).unwrap_or(trimmed);
        let expected = hex::decode(hex_digest).map_err(|_| SignatureError::Malformed)?;
        mac.update(message);
        mac.verify_slice(&expected)
            .map_err(|_| SignatureError::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn verifier() -> WebhookVerifier {
        WebhookVerifier::new(Some(Zeroizing::new("shared-secret".to_owned())))
    }

    #[rstest]
    fn accepts_own_signature_with_or_without_prefix(verifier: WebhookVerifier) {
        let body = br#"{"event":"parcel.delivered"}"#;
        let signature = verifier.sign(body).expect("sign");
        assert_eq!(signature.len(), 64);
        assert!(verifier.verify(body, &signature).is_ok());
        assert!(verifier.verify(body, &format!("sha256={signature}")).is_ok());
    }

    #[rstest]
    fn tampered_body_is_a_mismatch(verifier: WebhookVerifier) {
        let signature = verifier.sign(b"original").expect("sign");
        assert_eq!(
            verifier.verify(b"tampered", &signature),
            Err(SignatureError::Mismatch)
        );
    }

    #[rstest]
    #[case::not_hex("zz-not-hex", SignatureError::Malformed)]
    #[case::blank("  ", SignatureError::MissingSignature)]
    #[case::short_hex("abcd", SignatureError::Mismatch)]
    fn unusable_signatures_are_refused(
        verifier: WebhookVerifier,
        #[case] signature: &str,
        #[case] expected: SignatureError,
    ) {
        assert_eq!(verifier.verify(b"body", signature), Err(expected));
    }

    #[rstest]
    #[case::absent(None)]
    #[case::blank(Some(Zeroizing::new("   ".to_owned())))]
    fn missing_secret_refuses_everything(#[case] secret: Option<Zeroizing<String>>) {
        let verifier = WebhookVerifier::new(secret);
        assert!(!verifier.is_configured());
        assert_eq!(
            verifier.verify(b"body", "abcd"),
            Err(SignatureError::MissingSecret)
        );
    }

    #[test]
    fn debug_output_hides_secret() {
        let verifier = WebhookVerifier::new(Some(Zeroizing::new("hunter2".to_owned())));
        assert!(!format!("{verifier:?}").contains("hunter2"));
    }
}
