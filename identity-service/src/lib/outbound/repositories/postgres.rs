use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::identity::models::DisplayName;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::LoginIdentifier;
use crate::domain::identity::ports::CredentialStore;
use crate::identity::errors::IdentityError;
use crate::identity::errors::LoginIdentifierError;

const LOGIN_IDENTIFIER_CONSTRAINT: &str = "identities_login_identifier_key";
const LOGIN_IDENTIFIER_NORMALIZED_CONSTRAINT: &str = "identities_login_identifier_normalized";

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    login_identifier: String,
    display_name: String,
    role: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = IdentityError;

    fn try_from(r: IdentityRow) -> Result<Self, Self::Error> {
        Ok(Identity {
            id: IdentityId(r.id),
            login_identifier: LoginIdentifier::new(r.login_identifier)?,
            display_name: DisplayName::new(r.display_name)?,
            role: r.role.parse()?,
            password_hash: r.password_hash,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

fn map_write_error(e: sqlx::Error, identity: &Identity) -> IdentityError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some(LOGIN_IDENTIFIER_CONSTRAINT)
        {
            return IdentityError::AlreadyExists(identity.login_identifier.to_string());
        }
        if db_err.constraint() == Some(LOGIN_IDENTIFIER_NORMALIZED_CONSTRAINT) {
            return IdentityError::InvalidLoginIdentifier(LoginIdentifierError::InvalidFormat(
                identity.login_identifier.to_string(),
            ));
        }
    }
    IdentityError::DatabaseError(e.to_string())
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn create(&self, identity: Identity) -> Result<Identity, IdentityError> {
        sqlx::query(
            r#"
            INSERT INTO identities
                (id, login_identifier, display_name, role, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(identity.id.0)
        .bind(identity.login_identifier.as_str())
        .bind(identity.display_name.as_str())
        .bind(identity.role.as_str())
        .bind(&identity.password_hash)
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &identity))?;

        Ok(identity)
    }

    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, login_identifier, display_name, role, password_hash, created_at, updated_at
            FROM identities
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IdentityError::DatabaseError(e.to_string()))?;

        row.map(Identity::try_from).transpose()
    }

    async fn find_by_login_identifier(
        &self,
        login_identifier: &LoginIdentifier,
    ) -> Result<Option<Identity>, IdentityError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, login_identifier, display_name, role, password_hash, created_at, updated_at
            FROM identities
            WHERE login_identifier = $1
            "#,
        )
        .bind(login_identifier.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IdentityError::DatabaseError(e.to_string()))?;

        row.map(Identity::try_from).transpose()
    }

    async fn exists_by_login_identifier(
        &self,
        login_identifier: &LoginIdentifier,
    ) -> Result<bool, IdentityError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM identities WHERE login_identifier = $1)",
        )
        .bind(login_identifier.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| IdentityError::DatabaseError(e.to_string()))
    }

    async fn list_all(&self) -> Result<Vec<Identity>, IdentityError> {
        let rows = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, login_identifier, display_name, role, password_hash, created_at, updated_at
            FROM identities
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| IdentityError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Identity::try_from).collect()
    }

    async fn update(&self, identity: Identity) -> Result<Identity, IdentityError> {
        let result = sqlx::query(
            r#"
            UPDATE identities
            SET display_name = $2, role = $3, password_hash = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(identity.id.0)
        .bind(identity.display_name.as_str())
        .bind(identity.role.as_str())
        .bind(&identity.password_hash)
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &identity))?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::NotFound(identity.id.to_string()));
        }

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIGRATION: &str = include_str!("../../../../migrations/20240601000000_create_identities.sql");

    #[test]
    fn test_schema_declares_constraints_the_store_maps() {
        assert!(MIGRATION.contains(LOGIN_IDENTIFIER_CONSTRAINT));
        assert!(MIGRATION.contains(LOGIN_IDENTIFIER_NORMALIZED_CONSTRAINT));
        assert!(MIGRATION.contains("CHECK (login_identifier = lower(btrim(login_identifier)))"));
    }

    #[test]
    fn test_row_identifier_matches_lookup_form() {
        let row = IdentityRow {
            id: Uuid::new_v4(),
            login_identifier: "admin@corp.io".to_string(),
            display_name: "Admin".to_string(),
            role: "ADMIN".to_string(),
            password_hash: "$argon2id$test_hash".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let identity = Identity::try_from(row).unwrap();
        let lookup = LoginIdentifier::new(" Admin@Corp.io ").unwrap();
        assert_eq!(identity.login_identifier.as_str(), lookup.as_str());
    }
}
