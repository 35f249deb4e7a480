//! Stateless authentication and authorization primitives
//!
//! Provides the framework-agnostic core used by HTTP services:
//! - Signed, time-bounded session tokens (HMAC-SHA2 JWT)
//! - Secret hashing (Argon2id)
//! - Authentication coordination (verify secret, issue token)
//! - Ownership and role checks
//!
//! Services own their identity model and request plumbing and adapt these
//! implementations at their boundaries.
//!
//! # Examples
//!
//! ## Tokens
//! ```
//! use auth::TokenService;
//!
//! // base64 of a 32-byte secret
//! let key = "dGVzdF9zZWNyZXRfa2V5X2F0X2xlYXN0XzMyX2J5dGVzIQ==";
//! let tokens = TokenService::from_config(key, 60_000).unwrap();
//!
//! let issued = tokens.issue("a@example.com").unwrap();
//! assert_eq!(tokens.verify(&issued.value).unwrap(), "a@example.com");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, TokenService};
//!
//! let key = "dGVzdF9zZWNyZXRfa2V5X2F0X2xlYXN0XzMyX2J5dGVzIQ==";
//! let auth = Authenticator::new(TokenService::from_config(key, 60_000).unwrap());
//!
//! // Register: hash secret
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let result = auth.authenticate("password123", &hash, "a@example.com").unwrap();
//!
//! // Later requests: verify token
//! let subject = auth.tokens().verify(&result.access_token).unwrap();
//! assert_eq!(subject, "a@example.com");
//! ```
//!
//! ## Ownership
//! ```
//! use auth::policy::assert_owner;
//!
//! assert!(assert_owner(&5, &5).is_ok());
//! assert!(assert_owner(&5, &7).is_err());
//! ```

pub mod authenticator;
pub mod password;
pub mod policy;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use policy::Forbidden;
pub use token::Claims;
pub use token::ConfigurationError;
pub use token::IssuedToken;
pub use token::SigningKey;
pub use token::TokenError;
pub use token::TokenService;
