use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::domain::identity::ports::IdentityServicePort;
use crate::inbound::http::context::CurrentIdentity;
use crate::inbound::http::router::AppState;

pub async fn me(
    State(state): State<AppState>,
    CurrentIdentity(caller): CurrentIdentity,
) -> Result<ApiSuccess<IdentityData>, ApiError> {
    state
        .identity_service
        .get_identity(&caller.identity_id)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::OK, identity.into()))
}
