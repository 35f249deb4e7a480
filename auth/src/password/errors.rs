use thiserror::Error;

/// Failure while hashing or checking an identity secret.
///
/// A wrong secret is not an error; see `PasswordHasher::verify`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("Secret hashing failed: {0}")]
    HashingFailed(String),

    #[error("Secret verification failed: {0}")]
    VerificationFailed(String),
}
