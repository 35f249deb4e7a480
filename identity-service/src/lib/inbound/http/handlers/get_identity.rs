use auth::policy::assert_self;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::Role;
use crate::domain::identity::ports::IdentityServicePort;
use crate::inbound::http::context::CurrentIdentity;
use crate::inbound::http::router::AppState;

/// Callers may read their own identity; admins may read any.
pub async fn get_identity(
    State(state): State<AppState>,
    CurrentIdentity(caller): CurrentIdentity,
    Path(identity_id): Path<String>,
) -> Result<ApiSuccess<IdentityData>, ApiError> {
    let identity_id =
        IdentityId::from_string(&identity_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if !caller.role.grants(Role::Admin) {
        assert_self(&identity_id, &caller.identity_id)?;
    }

    state
        .identity_service
        .get_identity(&identity_id)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::OK, identity.into()))
}
