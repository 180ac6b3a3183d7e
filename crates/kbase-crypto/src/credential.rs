use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};
use tracing::{instrument, warn};
use zeroize::Zeroizing;

use crate::keys::{parse_public_key_pem, DEFAULT_PUBLIC_KEY_PEM};

const CANARY_SECRET: &str = "kbase-canary";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    EncodingUnavailable,
    InvalidPublicKey,
    EmptySecret,
    EncryptionFailed,
}

impl std::fmt::Display for CryptoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EncodingUnavailable => write!(f, "password encryption is unavailable"),
            Self::InvalidPublicKey => write!(f, "invalid public key"),
            Self::EmptySecret => write!(f, "secret is empty"),
            Self::EncryptionFailed => write!(f, "encryption failed"),
        }
    }
}

impl std::error::Error for CryptoError {}

/// Turns a plaintext secret into the ciphertext the server expects in
/// place of the password.
pub trait CredentialEncoder: Send + Sync {
    fn encode(&self, secret: &str) -> Result<String, CryptoError>;

    /// Canary check; never errors.
    fn is_supported(&self) -> bool {
        self.encode(CANARY_SECRET)
            .map(|ciphertext| !ciphertext.is_empty())
            .unwrap_or(false)
    }
}

/// base64(secret) encrypted with RSA PKCS#1 v1.5, then base64 again.
pub struct RsaCredentialEncoder {
    public_key: Option<RsaPublicKey>,
}

impl RsaCredentialEncoder {
    #[must_use]
    pub fn new(public_key: RsaPublicKey) -> Self {
        Self {
            public_key: Some(public_key),
        }
    }

    /// Builds an encoder from PEM text. An unusable key yields an encoder
    /// whose engine is unavailable rather than an error.
    #[must_use]
    pub fn from_pem(pem: &str) -> Self {
        match parse_public_key_pem(pem) {
            Ok(key) => Self::new(key),
            Err(err) => {
                warn!("credential encoder disabled: {err}");
                Self { public_key: None }
            }
        }
    }

    #[must_use]
    pub fn bundled() -> Self {
        Self::from_pem(DEFAULT_PUBLIC_KEY_PEM)
    }
}

impl Default for RsaCredentialEncoder {
    fn default() -> Self {
        Self::bundled()
    }
}

impl std::fmt::Debug for RsaCredentialEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaCredentialEncoder")
            .field("available", &self.public_key.is_some())
            .finish()
    }
}

impl CredentialEncoder for RsaCredentialEncoder {
    #[instrument(level = "debug", skip_all, fields(secret_len = secret.len()))]
    fn encode(&self, secret: &str) -> Result<String, CryptoError> {
        let public_key = self
            .public_key
            .as_ref()
            .ok_or(CryptoError::EncodingUnavailable)?;
        if secret.is_empty() {
            return Err(CryptoError::EmptySecret);
        }
        let intermediate = Zeroizing::new(STANDARD.encode(secret.as_bytes()));
        let mut rng = rand::thread_rng();
        let ciphertext = public_key
            .encrypt(&mut rng, Pkcs1v15Encrypt, intermediate.as_bytes())
            .map_err(|_| CryptoError::EncryptionFailed)?;
        Ok(STANDARD.encode(ciphertext))
    }
}

/// Encoder for hosts without a public-key engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableEncoder;

impl CredentialEncoder for UnavailableEncoder {
    fn encode(&self, _secret: &str) -> Result<String, CryptoError> {
        Err(CryptoError::EncodingUnavailable)
    }
}
