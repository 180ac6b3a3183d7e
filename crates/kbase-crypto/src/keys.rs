use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;

use crate::CryptoError;

/// Public half of the server's password key, SPKI PEM.
pub const DEFAULT_PUBLIC_KEY_PEM: &str = include_str!("../keys/public.pem");

pub const EXPECTED_KEY_BITS: usize = 2048;

/// Parses an RSA public key from either an SPKI (`BEGIN PUBLIC KEY`) or a
/// PKCS#1 (`BEGIN RSA PUBLIC KEY`) PEM document.
pub fn parse_public_key_pem(pem: &str) -> Result<RsaPublicKey, CryptoError> {
    let pem = pem.trim();
    let key = if pem.contains("BEGIN RSA PUBLIC KEY") {
        RsaPublicKey::from_pkcs1_pem(pem).map_err(|_| CryptoError::InvalidPublicKey)?
    } else {
        RsaPublicKey::from_public_key_pem(pem).map_err(|_| CryptoError::InvalidPublicKey)?
    };
    let bits = key.size() * 8;
    if bits != EXPECTED_KEY_BITS {
        tracing::warn!(bits, "public key is not {EXPECTED_KEY_BITS} bits");
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_key_parses_as_2048_bit() {
        let key = parse_public_key_pem(DEFAULT_PUBLIC_KEY_PEM).expect("bundled key");
        assert_eq!(key.size() * 8, EXPECTED_KEY_BITS);
    }

    #[test]
    fn garbage_pem_is_rejected() {
        let err = parse_public_key_pem("-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----")
            .expect_err("invalid key");
        assert_eq!(err, CryptoError::InvalidPublicKey);
    }
}
