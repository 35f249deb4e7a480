use chrono::DateTime;
use chrono::Utc;

use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::IssuedToken;
use crate::token::TokenError;
use crate::token::TokenService;

/// Authentication coordinator combining secret verification and token issuing.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_service: TokenService,
    decoy_hash: Option<String>,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// Signed bearer token
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedToken> for AuthenticationResult {
    fn from(token: IssuedToken) -> Self {
        Self {
            access_token: token.value,
            expires_at: token.expires_at,
        }
    }
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create an authenticator around an already configured token service.
    ///
    /// Also hashes the decoy secret used by `reject_unknown`, so even the
    /// first unknown-identifier login costs exactly one verification.
    pub fn new(token_service: TokenService) -> Self {
        let password_hasher = PasswordHasher::new();
        let decoy_hash = password_hasher.hash("decoy-secret").ok();

        Self {
            password_hasher,
            token_service,
            decoy_hash,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.token_service
    }

    /// Hash a secret for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a secret against its stored hash and issue a token for `subject`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Secret does not match
    /// * `PasswordError` - Stored hash could not be parsed
    /// * `TokenError` - Token issuing failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.token_service.issue(subject)?.into())
    }

    /// Issue a token without secret verification (e.g. right after registration).
    ///
    /// # Errors
    /// * `TokenError` - Token issuing failed
    pub fn issue_token(&self, subject: &str) -> Result<AuthenticationResult, TokenError> {
        self.token_service.issue(subject).map(Into::into)
    }

    /// Reject a login attempt for an unknown identifier.
    ///
    /// Runs one verification against a decoy hash first, so that the response
    /// time does not reveal whether the identifier exists.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        if let Some(decoy) = &self.decoy_hash {
            let _ = self.password_hasher.verify(password, decoy);
        }

        AuthenticationError::InvalidCredentials
    }
}
