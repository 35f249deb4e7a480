use thiserror::Error;

/// Error type for token operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token subject does not match the expected identity")]
    SubjectMismatch,

    #[error("Token subject must not be empty")]
    EmptySubject,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),
}

impl TokenError {
    /// Whether the token carried a valid signature but is past its expiry.
    pub fn is_expired(&self) -> bool {
        matches!(self, TokenError::Expired)
    }
}

/// Startup error raised while building the token service from its settings.
///
/// Any of these must abort the process before it starts serving requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Signing key is missing or empty")]
    MissingSigningKey,

    #[error("Signing key is not valid base64: {0}")]
    InvalidSigningKeyEncoding(String),

    #[error("Signing key too short: minimum {min} bytes, got {actual}")]
    SigningKeyTooShort { min: usize, actual: usize },

    #[error("Token lifetime must be between 1 ms and one year, got {0} ms")]
    InvalidTokenLifetime(i64),
}
