use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::ConfigurationError;
use super::errors::TokenError;
use super::key::SigningKey;

/// A freshly signed token together with its validity window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub value: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies signed, time-bounded bearer tokens.
///
/// Holds only immutable settings after construction, so a single instance can
/// be shared across request tasks behind an `Arc` without locking.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    key: SigningKey,
    lifetime: Duration,
    leeway: Duration,
}

impl TokenService {
    /// Longest accepted token lifetime: one year.
    pub const MAX_LIFETIME_MS: i64 = 365 * 24 * 60 * 60 * 1000;

    /// Create a token service from an already decoded key.
    ///
    /// # Errors
    /// * `InvalidTokenLifetime` - Lifetime is not positive or exceeds `MAX_LIFETIME_MS`
    pub fn new(key: SigningKey, lifetime_ms: i64) -> Result<Self, ConfigurationError> {
        if lifetime_ms <= 0 || lifetime_ms > Self::MAX_LIFETIME_MS {
            return Err(ConfigurationError::InvalidTokenLifetime(lifetime_ms));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(key.as_bytes()),
            decoding_key: DecodingKey::from_secret(key.as_bytes()),
            key,
            lifetime: Duration::milliseconds(lifetime_ms),
            leeway: Duration::zero(),
        })
    }

    /// Build the service straight from its configured values.
    ///
    /// # Arguments
    /// * `signing_key` - Base64-encoded symmetric secret
    /// * `lifetime_ms` - Token lifetime in milliseconds
    ///
    /// # Errors
    /// Any `ConfigurationError` from key decoding or lifetime validation
    pub fn from_config(signing_key: &str, lifetime_ms: i64) -> Result<Self, ConfigurationError> {
        Self::new(SigningKey::from_base64(signing_key)?, lifetime_ms)
    }

    /// Tolerate clock skew between issuer and verifier when checking expiry.
    pub fn with_leeway(mut self, leeway_ms: u64) -> Self {
        self.leeway = Duration::milliseconds(leeway_ms.min(i64::MAX as u64) as i64);
        self
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for `subject`, valid from now for the configured lifetime.
    ///
    /// # Errors
    /// * `EmptySubject` - Subject is empty
    /// * `EncodingFailed` - Expiry out of range or token signing failed
    pub fn issue(&self, subject: &str) -> Result<IssuedToken, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        if subject.is_empty() {
            return Err(TokenError::EmptySubject);
        }

        let claims = Claims::for_subject(subject, now, self.lifetime)?;
        let header = Header::new(self.key.algorithm());

        let value = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        Ok(IssuedToken {
            value,
            issued_at: now,
            expires_at: claims.expires_at(),
        })
    }

    /// Verify signature, structure and expiry, returning the subject.
    ///
    /// # Errors
    /// * `Malformed` - Token cannot be parsed or its signature does not match
    /// * `Expired` - Signature is valid but the token is past its expiry
    pub fn verify(&self, raw: &str) -> Result<String, TokenError> {
        self.verify_at(raw, Utc::now())
    }

    /// Verify as if the current time were `now`.
    pub fn verify_at(&self, raw: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = self.decode_claims(raw)?;

        if claims.is_expired_at(now, self.leeway) {
            return Err(TokenError::Expired);
        }

        Ok(claims.sub)
    }

    /// Full verification plus a check that the token names `expected_subject`.
    ///
    /// # Errors
    /// * `Malformed` / `Expired` - As for `verify`
    /// * `SubjectMismatch` - Token is valid but was issued for another subject
    pub fn verify_for_subject(&self, raw: &str, expected_subject: &str) -> Result<(), TokenError> {
        let subject = self.verify(raw)?;

        if subject != expected_subject {
            return Err(TokenError::SubjectMismatch);
        }

        Ok(())
    }

    /// Parse the token and return its subject without checking expiry.
    ///
    /// The signature is still verified: a subject is only ever read from a
    /// token this process (or one sharing its key) signed. Callers are
    /// expected to follow up with `verify_for_subject` once they have loaded
    /// the identity.
    ///
    /// # Errors
    /// * `Malformed` - Token cannot be parsed or its signature does not match
    pub fn extract_subject(&self, raw: &str) -> Result<String, TokenError> {
        self.decode_claims(raw).map(|claims| claims.sub)
    }

    fn decode_claims(&self, raw: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.key.algorithm());
        // Expiry is checked by `Claims::is_expired_at` with millisecond precision
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<Claims>(raw, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            }
        })?;

        if token_data.claims.sub.is_empty() {
            return Err(TokenError::Malformed("empty subject".to_string()));
        }

        Ok(token_data.claims)
    }
}
