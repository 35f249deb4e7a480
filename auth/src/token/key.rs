use base64::prelude::*;
use jsonwebtoken::Algorithm;

use super::errors::ConfigurationError;

/// Process-wide symmetric secret used to both sign and verify tokens.
///
/// The HMAC variant follows the key length: 64+ bytes selects HS512,
/// 48+ bytes HS384 and anything else at or above the minimum HS256.
#[derive(Clone)]
pub struct SigningKey {
    secret: Vec<u8>,
    algorithm: Algorithm,
}

impl SigningKey {
    /// Smallest secret accepted for HMAC-SHA256 (256 bits).
    pub const MIN_LENGTH: usize = 32;

    /// Decode a base64 (standard alphabet, padded) secret.
    ///
    /// # Errors
    /// * `MissingSigningKey` - Input is empty or whitespace
    /// * `InvalidSigningKeyEncoding` - Input is not valid base64
    /// * `SigningKeyTooShort` - Decoded secret is shorter than 32 bytes
    pub fn from_base64(encoded: &str) -> Result<Self, ConfigurationError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(ConfigurationError::MissingSigningKey);
        }

        let secret = BASE64_STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| ConfigurationError::InvalidSigningKeyEncoding(e.to_string()))?;

        Self::from_bytes(secret)
    }

    /// Use raw secret bytes directly.
    pub fn from_bytes(secret: Vec<u8>) -> Result<Self, ConfigurationError> {
        if secret.is_empty() {
            return Err(ConfigurationError::MissingSigningKey);
        }
        if secret.len() < Self::MIN_LENGTH {
            return Err(ConfigurationError::SigningKeyTooShort {
                min: Self::MIN_LENGTH,
                actual: secret.len(),
            });
        }

        let algorithm = match secret.len() {
            n if n >= 64 => Algorithm::HS512,
            n if n >= 48 => Algorithm::HS384,
            _ => Algorithm::HS256,
        };

        Ok(Self { secret, algorithm })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.secret
    }
}

// Never print the secret itself.
impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .field("length", &self.secret.len())
            .finish()
    }
}
