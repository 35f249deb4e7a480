use async_trait::async_trait;

use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::LoginIdentifier;
use crate::domain::identity::models::RegisterIdentityCommand;
use crate::domain::identity::models::UpdateIdentityCommand;
use crate::identity::errors::IdentityError;

/// Bridges stored credentials into the authentication subsystem.
#[async_trait]
pub trait IdentityLoader: Send + Sync + 'static {
    /// Load the identity a token subject or login attempt refers to.
    ///
    /// # Errors
    /// * `NotFoundByLoginIdentifier` - No identity with this login identifier
    /// * `DatabaseError` - Credential store lookup failed
    async fn load_by_login_identifier(
        &self,
        login_identifier: &LoginIdentifier,
    ) -> Result<Identity, IdentityError>;
}

/// Port for identity domain service operations.
#[async_trait]
pub trait IdentityServicePort: IdentityLoader {
    /// Register a new identity with the `USER` role.
    ///
    /// # Errors
    /// * `AlreadyExists` - Login identifier is already registered
    /// * `Password` - Secret hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterIdentityCommand) -> Result<Identity, IdentityError>;

    /// Retrieve identity by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_identity(&self, id: &IdentityId) -> Result<Identity, IdentityError>;

    /// Retrieve every registered identity.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_identities(&self) -> Result<Vec<Identity>, IdentityError>;

    /// Update display name and/or secret, refreshing `updated_at`.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `Password` - Secret hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn update_identity(
        &self,
        id: &IdentityId,
        command: UpdateIdentityCommand,
    ) -> Result<Identity, IdentityError>;
}

/// Persistence operations for identity records.
///
/// Implementations must keep login identifiers unique.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist a new identity.
    ///
    /// # Errors
    /// * `AlreadyExists` - Login identifier is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, identity: Identity) -> Result<Identity, IdentityError>;

    /// # Returns
    /// Optional identity (None if not found)
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityError>;

    /// # Returns
    /// Optional identity (None if not found)
    async fn find_by_login_identifier(
        &self,
        login_identifier: &LoginIdentifier,
    ) -> Result<Option<Identity>, IdentityError>;

    async fn exists_by_login_identifier(
        &self,
        login_identifier: &LoginIdentifier,
    ) -> Result<bool, IdentityError>;

    async fn list_all(&self) -> Result<Vec<Identity>, IdentityError>;

    /// Replace the stored identity with the same id.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, identity: Identity) -> Result<Identity, IdentityError>;
}
