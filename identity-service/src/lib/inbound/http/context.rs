use std::convert::Infallible;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::identity::models::DisplayName;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::LoginIdentifier;
use crate::domain::identity::models::Role;
use crate::inbound::http::handlers::ApiError;

/// Verified identity attached to a request after successful authentication.
///
/// Carries everything handlers need for authorization decisions and nothing
/// from the credential store that must stay private (the secret hash).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub identity_id: IdentityId,
    pub login_identifier: LoginIdentifier,
    pub display_name: DisplayName,
    pub role: Role,
}

impl From<&Identity> for AuthenticatedIdentity {
    fn from(identity: &Identity) -> Self {
        Self {
            identity_id: identity.id,
            login_identifier: identity.login_identifier.clone(),
            display_name: identity.display_name.clone(),
            role: identity.role,
        }
    }
}

impl AuthenticatedIdentity {
    pub fn authorities(&self) -> &'static [Role] {
        self.role.authorities()
    }
}

/// Request-scoped authentication state.
///
/// Inserted into the request extensions by the authentication middleware and
/// dropped with the request. Never cached or shared between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthenticatedContext {
    #[default]
    Anonymous,
    Authenticated(AuthenticatedIdentity),
}

impl AuthenticatedContext {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthenticatedContext::Authenticated(_))
    }

    /// Whether the caller holds `role`, directly or through a broader role.
    pub fn has_role(&self, role: Role) -> bool {
        match self {
            AuthenticatedContext::Authenticated(identity) => identity.role.grants(role),
            AuthenticatedContext::Anonymous => false,
        }
    }

    pub fn identity(&self) -> Option<&AuthenticatedIdentity> {
        match self {
            AuthenticatedContext::Authenticated(identity) => Some(identity),
            AuthenticatedContext::Anonymous => None,
        }
    }

    pub fn login_identifier(&self) -> Option<&LoginIdentifier> {
        self.identity().map(|identity| &identity.login_identifier)
    }

    pub fn role(&self) -> Option<Role> {
        self.identity().map(|identity| identity.role)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<AuthenticatedContext>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Extractor for handlers that require an authenticated caller.
///
/// Rejects anonymous requests with `401 Unauthorized`.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub AuthenticatedIdentity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthenticatedContext>() {
            Some(AuthenticatedContext::Authenticated(identity)) => {
                Ok(CurrentIdentity(identity.clone()))
            }
            _ => Err(ApiError::Unauthorized(
                "Authentication required".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn authenticated(role: Role) -> AuthenticatedContext {
        AuthenticatedContext::Authenticated(AuthenticatedIdentity {
            identity_id: IdentityId::new(),
            login_identifier: LoginIdentifier::new("a@example.com").unwrap(),
            display_name: DisplayName::new("A").unwrap(),
            role,
        })
    }

    #[test]
    fn test_anonymous_context() {
        let context = AuthenticatedContext::default();

        assert!(!context.is_authenticated());
        assert!(!context.has_role(Role::User));
        assert!(context.login_identifier().is_none());
        assert!(context.role().is_none());
    }

    #[test]
    fn test_authenticated_context() {
        let context = authenticated(Role::User);

        assert!(context.is_authenticated());
        assert!(context.has_role(Role::User));
        assert!(!context.has_role(Role::Admin));
        assert_eq!(context.login_identifier().unwrap().as_str(), "a@example.com");
        assert_eq!(context.role(), Some(Role::User));
    }

    #[test]
    fn test_admin_context_holds_user_role() {
        let context = authenticated(Role::Admin);

        assert!(context.has_role(Role::Admin));
        assert!(context.has_role(Role::User));
        assert_eq!(
            context.identity().unwrap().authorities(),
            &[Role::Admin, Role::User]
        );
    }

    #[tokio::test]
    async fn test_current_identity_rejects_anonymous() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        parts.extensions.insert(AuthenticatedContext::Anonymous);

        let result = CurrentIdentity::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_context_defaults_to_anonymous_without_extension() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();

        let context = AuthenticatedContext::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(context, AuthenticatedContext::Anonymous);
    }
}
