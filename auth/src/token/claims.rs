use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::TokenError;

/// Claims carried by a session token.
///
/// `iat` and `exp` are RFC 7519 NumericDate values (whole seconds since the
/// epoch), with `exp` rounded up so standard validators never reject early.
/// `exp_ms` is the exact expiry in milliseconds and is what this crate
/// enforces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (login identifier of the identity)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp, rounded up)
    pub exp: i64,

    /// Expiration time in milliseconds since the epoch
    pub exp_ms: i64,
}

impl Claims {
    /// Create claims for a subject issued at `issued_at` and valid for `lifetime`.
    ///
    /// # Errors
    /// * `EncodingFailed` - The expiry falls outside the representable range
    pub fn for_subject(
        subject: impl ToString,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<Self, TokenError> {
        let expires_at = issued_at.checked_add_signed(lifetime).ok_or_else(|| {
            TokenError::EncodingFailed("token expiry is out of range".to_string())
        })?;
        let exp_ms = expires_at.timestamp_millis();

        Ok(Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: exp_ms.div_euclid(1000) + i64::from(exp_ms.rem_euclid(1000) != 0),
            exp_ms,
        })
    }

    /// Expiry instant in milliseconds since the epoch.
    pub fn expires_at_millis(&self) -> i64 {
        self.exp_ms
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.exp_ms).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Check expiry against `now`, tolerating `leeway` of clock skew.
    ///
    /// A token is valid only while its expiry is strictly after `now - leeway`.
    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway: Duration) -> bool {
        match now.checked_sub_signed(leeway) {
            Some(horizon) => self.exp_ms <= horizon.timestamp_millis(),
            None => false,
        }
    }
}
