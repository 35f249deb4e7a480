use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::identity::errors::DisplayNameError;
use crate::identity::errors::IdentityIdError;
use crate::identity::errors::LoginIdentifierError;
use crate::identity::errors::RoleError;

/// Identity aggregate entity.
///
/// A registered principal able to obtain session tokens. The secret hash
/// stays inside the domain and the credential store; it is never serialized
/// into responses and is redacted from `Debug` output.
#[derive(Clone)]
pub struct Identity {
    pub id: IdentityId,
    pub login_identifier: LoginIdentifier,
    pub display_name: DisplayName,
    pub role: Role,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("login_identifier", &self.login_identifier)
            .field("display_name", &self.display_name)
            .field("role", &self.role)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Identity unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityId(pub Uuid);

impl IdentityId {
    /// Generate a new random identity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identity ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, IdentityIdError> {
        Uuid::parse_str(s)
            .map(IdentityId)
            .map_err(|e| IdentityIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for IdentityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Login identifier value type (an e-mail address).
///
/// Trimmed and lower-cased on construction so that uniqueness holds
/// regardless of how the caller typed it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoginIdentifier(String);

impl LoginIdentifier {
    /// Create a normalized, validated login identifier.
    ///
    /// # Errors
    /// * `Empty` - Identifier is empty after trimming
    /// * `InvalidFormat` - Identifier is not an RFC 5322 address
    pub fn new(raw: impl AsRef<str>) -> Result<Self, LoginIdentifierError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(LoginIdentifierError::Empty);
        }

        email_address::EmailAddress::from_str(&normalized)
            .map(|_| LoginIdentifier(normalized))
            .map_err(|e| LoginIdentifierError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoginIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type, 1 to 64 characters after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MAX_LENGTH: usize = 64;

    /// # Errors
    /// * `Empty` - Name is blank
    /// * `TooLong` - Name exceeds 64 characters
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DisplayNameError> {
        let name = raw.as_ref().trim();
        let length = name.chars().count();

        if length == 0 {
            Err(DisplayNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(DisplayNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Closed set of roles an identity can hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    /// Authorities granted by this role. Admins hold every user authority too.
    pub fn authorities(&self) -> &'static [Role] {
        match self {
            Role::User => &[Role::User],
            Role::Admin => &[Role::Admin, Role::User],
        }
    }

    pub fn grants(&self, required: Role) -> bool {
        self.authorities().contains(&required)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(RoleError::Unknown(s.to_string())),
        }
    }
}

/// Command to register a new identity with domain types
#[derive(Debug)]
pub struct RegisterIdentityCommand {
    pub login_identifier: LoginIdentifier,
    pub display_name: DisplayName,
    pub password: String,
}

impl RegisterIdentityCommand {
    pub fn new(login_identifier: LoginIdentifier, display_name: DisplayName, password: String) -> Self {
        Self {
            login_identifier,
            display_name,
            password,
        }
    }
}

/// Command to update an existing identity. Only provided fields change.
#[derive(Debug, Default)]
pub struct UpdateIdentityCommand {
    pub display_name: Option<DisplayName>,
    pub password: Option<String>,
}
