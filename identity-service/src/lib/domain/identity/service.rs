use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::LoginIdentifier;
use crate::domain::identity::models::RegisterIdentityCommand;
use crate::domain::identity::models::Role;
use crate::domain::identity::models::UpdateIdentityCommand;
use crate::identity::errors::IdentityError;
use crate::identity::ports::CredentialStore;
use crate::identity::ports::IdentityLoader;
use crate::identity::ports::IdentityServicePort;

/// Domain service implementation for identity operations.
pub struct IdentityService<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    password_hasher: auth::PasswordHasher,
}

impl<CS> IdentityService<CS>
where
    CS: CredentialStore,
{
    pub fn new(store: Arc<CS>) -> Self {
        Self {
            store,
            password_hasher: auth::PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl<CS> IdentityLoader for IdentityService<CS>
where
    CS: CredentialStore,
{
    async fn load_by_login_identifier(
        &self,
        login_identifier: &LoginIdentifier,
    ) -> Result<Identity, IdentityError> {
        self.store
            .find_by_login_identifier(login_identifier)
            .await?
            .ok_or_else(|| IdentityError::NotFoundByLoginIdentifier(login_identifier.to_string()))
    }
}

#[async_trait]
impl<CS> IdentityServicePort for IdentityService<CS>
where
    CS: CredentialStore,
{
    async fn register(&self, command: RegisterIdentityCommand) -> Result<Identity, IdentityError> {
        if self
            .store
            .exists_by_login_identifier(&command.login_identifier)
            .await?
        {
            return Err(IdentityError::AlreadyExists(
                command.login_identifier.to_string(),
            ));
        }

        let password_hash = self.password_hasher.hash(&command.password)?;

        let now = Utc::now();
        let identity = Identity {
            id: IdentityId::new(),
            login_identifier: command.login_identifier,
            display_name: command.display_name,
            role: Role::User,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        let created = self.store.create(identity).await?;
        tracing::info!(identity_id = %created.id, role = %created.role, "Identity registered");

        Ok(created)
    }

    async fn get_identity(&self, id: &IdentityId) -> Result<Identity, IdentityError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::NotFound(id.to_string()))
    }

    async fn list_identities(&self) -> Result<Vec<Identity>, IdentityError> {
        self.store.list_all().await
    }

    async fn update_identity(
        &self,
        id: &IdentityId,
        command: UpdateIdentityCommand,
    ) -> Result<Identity, IdentityError> {
        let mut identity = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::NotFound(id.to_string()))?;

        if let Some(display_name) = command.display_name {
            identity.display_name = display_name;
        }

        if let Some(password) = command.password {
            identity.password_hash = self.password_hasher.hash(&password)?;
        }

        identity.updated_at = Utc::now();

        let updated = self.store.update(identity).await?;
        tracing::info!(identity_id = %updated.id, "Identity updated");

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::domain::identity::models::DisplayName;

    mock! {
        pub TestCredentialStore {}

        #[async_trait]
        impl CredentialStore for TestCredentialStore {
            async fn create(&self, identity: Identity) -> Result<Identity, IdentityError>;
            async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityError>;
            async fn find_by_login_identifier(&self, login_identifier: &LoginIdentifier) -> Result<Option<Identity>, IdentityError>;
            async fn exists_by_login_identifier(&self, login_identifier: &LoginIdentifier) -> Result<bool, IdentityError>;
            async fn list_all(&self) -> Result<Vec<Identity>, IdentityError>;
            async fn update(&self, identity: Identity) -> Result<Identity, IdentityError>;
        }
    }

    fn identity(login: &str) -> Identity {
        let created_at = Utc::now() - chrono::Duration::hours(1);
        Identity {
            id: IdentityId::new(),
            login_identifier: LoginIdentifier::new(login).unwrap(),
            display_name: DisplayName::new("Test").unwrap(),
            role: Role::User,
            password_hash: "$argon2id$test_hash".to_string(),
            created_at,
            updated_at: created_at,
        }
    }

    fn register_command(login: &str) -> RegisterIdentityCommand {
        RegisterIdentityCommand::new(
            LoginIdentifier::new(login).unwrap(),
            DisplayName::new("Alice").unwrap(),
            "password123".to_string(),
        )
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_exists_by_login_identifier()
            .times(1)
            .returning(|_| Ok(false));
        store
            .expect_create()
            .withf(|identity| {
                identity.login_identifier.as_str() == "alice@example.com"
                    && identity.role == Role::User
                    && identity.password_hash.starts_with("$argon2")
                    && identity.created_at == identity.updated_at
            })
            .times(1)
            .returning(|identity| Ok(identity));

        let service = IdentityService::new(Arc::new(store));

        let created = service
            .register(register_command("Alice@Example.com"))
            .await
            .expect("Registration failed");
        assert_eq!(created.login_identifier.as_str(), "alice@example.com");
        assert_eq!(created.display_name.as_str(), "Alice");
    }

    #[tokio::test]
    async fn test_register_duplicate_identifier() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_exists_by_login_identifier()
            .times(1)
            .returning(|_| Ok(true));
        store.expect_create().times(0);

        let service = IdentityService::new(Arc::new(store));

        let result = service.register(register_command("alice@example.com")).await;
        assert!(matches!(result, Err(IdentityError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_store_race_reports_conflict() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_exists_by_login_identifier()
            .returning(|_| Ok(false));
        store
            .expect_create()
            .returning(|identity| Err(IdentityError::AlreadyExists(identity.login_identifier.to_string())));

        let service = IdentityService::new(Arc::new(store));

        let result = service.register(register_command("alice@example.com")).await;
        assert!(matches!(result, Err(IdentityError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_load_by_login_identifier() {
        let mut store = MockTestCredentialStore::new();
        let expected = identity("a@example.com");
        let returned = expected.clone();

        store
            .expect_find_by_login_identifier()
            .withf(|login| login.as_str() == "a@example.com")
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        let service = IdentityService::new(Arc::new(store));

        let loaded = service
            .load_by_login_identifier(&LoginIdentifier::new("a@example.com").unwrap())
            .await
            .unwrap();
        assert_eq!(loaded.id, expected.id);
    }

    #[tokio::test]
    async fn test_load_by_login_identifier_not_found() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_by_login_identifier()
            .times(1)
            .returning(|_| Ok(None));

        let service = IdentityService::new(Arc::new(store));

        let result = service
            .load_by_login_identifier(&LoginIdentifier::new("ghost@example.com").unwrap())
            .await;
        let err = result.unwrap_err();
        assert!(matches!(err, IdentityError::NotFoundByLoginIdentifier(_)));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_identity_not_found() {
        let mut store = MockTestCredentialStore::new();
        store.expect_find_by_id().times(1).returning(|_| Ok(None));

        let service = IdentityService::new(Arc::new(store));

        let result = service.get_identity(&IdentityId::new()).await;
        assert!(matches!(result, Err(IdentityError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_identity_refreshes_updated_at() {
        let mut store = MockTestCredentialStore::new();
        let existing = identity("a@example.com");
        let id = existing.id;
        let original_updated_at = existing.updated_at;
        let returned = existing.clone();

        store
            .expect_find_by_id()
            .withf(move |candidate| *candidate == id)
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));
        store
            .expect_update()
            .withf(move |identity| {
                identity.display_name.as_str() == "Renamed"
                    && identity.password_hash.starts_with("$argon2")
                    && identity.updated_at > original_updated_at
            })
            .times(1)
            .returning(|identity| Ok(identity));

        let service = IdentityService::new(Arc::new(store));

        let command = UpdateIdentityCommand {
            display_name: Some(DisplayName::new("Renamed").unwrap()),
            password: Some("new-password".to_string()),
        };

        let updated = service.update_identity(&id, command).await.unwrap();
        assert_eq!(updated.display_name.as_str(), "Renamed");
        assert_eq!(updated.created_at, existing.created_at);
    }

    #[tokio::test]
    async fn test_update_identity_not_found() {
        let mut store = MockTestCredentialStore::new();
        store.expect_find_by_id().times(1).returning(|_| Ok(None));
        store.expect_update().times(0);

        let service = IdentityService::new(Arc::new(store));

        let result = service
            .update_identity(&IdentityId::new(), UpdateIdentityCommand::default())
            .await;
        assert!(matches!(result, Err(IdentityError::NotFound(_))));
    }
}
