use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::LoginIdentifier;
use crate::domain::identity::ports::CredentialStore;
use crate::identity::errors::IdentityError;

/// Process-local credential store.
///
/// Used by tests and by local runs without a database. Uniqueness of login
/// identifiers is checked under the write lock.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    identities: RwLock<HashMap<IdentityId, Identity>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create(&self, identity: Identity) -> Result<Identity, IdentityError> {
        let mut identities = self.identities.write().await;

        if identities
            .values()
            .any(|existing| existing.login_identifier == identity.login_identifier)
        {
            return Err(IdentityError::AlreadyExists(
                identity.login_identifier.to_string(),
            ));
        }

        identities.insert(identity.id, identity.clone());
        Ok(identity)
    }

    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityError> {
        Ok(self.identities.read().await.get(id).cloned())
    }

    async fn find_by_login_identifier(
        &self,
        login_identifier: &LoginIdentifier,
    ) -> Result<Option<Identity>, IdentityError> {
        Ok(self
            .identities
            .read()
            .await
            .values()
            .find(|identity| &identity.login_identifier == login_identifier)
            .cloned())
    }

    async fn exists_by_login_identifier(
        &self,
        login_identifier: &LoginIdentifier,
    ) -> Result<bool, IdentityError> {
        Ok(self
            .identities
            .read()
            .await
            .values()
            .any(|identity| &identity.login_identifier == login_identifier))
    }

    async fn list_all(&self) -> Result<Vec<Identity>, IdentityError> {
        let mut identities: Vec<Identity> =
            self.identities.read().await.values().cloned().collect();
        identities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(identities)
    }

    async fn update(&self, identity: Identity) -> Result<Identity, IdentityError> {
        let mut identities = self.identities.write().await;

        match identities.get_mut(&identity.id) {
            Some(stored) => {
                *stored = identity.clone();
                Ok(identity)
            }
            None => Err(IdentityError::NotFound(identity.id.to_string())),
        }
    }
}
