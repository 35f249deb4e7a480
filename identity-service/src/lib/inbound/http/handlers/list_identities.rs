use auth::policy::assert_role;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::domain::identity::models::Role;
use crate::domain::identity::ports::IdentityServicePort;
use crate::inbound::http::context::CurrentIdentity;
use crate::inbound::http::router::AppState;

pub async fn list_identities(
    State(state): State<AppState>,
    CurrentIdentity(caller): CurrentIdentity,
) -> Result<ApiSuccess<Vec<IdentityData>>, ApiError> {
    assert_role(Role::Admin, caller.role.grants(Role::Admin))?;

    let identities = state.identity_service.list_identities().await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        identities.iter().map(IdentityData::from).collect(),
    ))
}
