use auth::policy::assert_self;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::domain::identity::models::DisplayName;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::UpdateIdentityCommand;
use crate::domain::identity::ports::IdentityServicePort;
use crate::identity::errors::DisplayNameError;
use crate::identity::errors::IdentityError;
use crate::inbound::http::context::CurrentIdentity;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating an identity (raw JSON)
#[derive(Debug, Deserialize)]
pub struct UpdateIdentityRequest {
    pub display_name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Error)]
pub enum ParseUpdateIdentityRequestError {
    #[error("Invalid display name: {0}")]
    DisplayName(#[from] DisplayNameError),

    #[error("Password must not be empty")]
    EmptyPassword,
}

impl UpdateIdentityRequest {
    fn try_into_command(self) -> Result<UpdateIdentityCommand, ParseUpdateIdentityRequestError> {
        let display_name = self.display_name.map(DisplayName::new).transpose()?;

        if self.password.as_deref() == Some("") {
            return Err(ParseUpdateIdentityRequestError::EmptyPassword);
        }

        Ok(UpdateIdentityCommand {
            display_name,
            password: self.password,
        })
    }
}

impl From<ParseUpdateIdentityRequestError> for ApiError {
    fn from(err: ParseUpdateIdentityRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

/// Only the identity itself may change its display name or secret.
pub async fn update_identity(
    State(state): State<AppState>,
    CurrentIdentity(caller): CurrentIdentity,
    Path(identity_id): Path<String>,
    Json(req): Json<UpdateIdentityRequest>,
) -> Result<ApiSuccess<IdentityData>, ApiError> {
    let identity_id = IdentityId::from_string(&identity_id).map_err(IdentityError::from)?;
    assert_self(&identity_id, &caller.identity_id)?;

    let command = req.try_into_command()?;

    state
        .identity_service
        .update_identity(&identity_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::OK, identity.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(display_name: Option<&str>, password: Option<&str>) -> UpdateIdentityRequest {
        UpdateIdentityRequest {
            display_name: display_name.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_password_is_rejected() {
        let result = request(None, Some("")).try_into_command();
        assert!(matches!(
            result,
            Err(ParseUpdateIdentityRequestError::EmptyPassword)
        ));
        assert_eq!(
            ApiError::from(result.unwrap_err()),
            ApiError::UnprocessableEntity("Password must not be empty".to_string())
        );
    }

    #[test]
    fn test_blank_display_name_is_rejected() {
        let result = request(Some("   "), None).try_into_command();
        assert!(matches!(
            result,
            Err(ParseUpdateIdentityRequestError::DisplayName(_))
        ));
    }

    #[test]
    fn test_absent_fields_are_left_unchanged() {
        let command = request(None, None).try_into_command().unwrap();
        assert!(command.display_name.is_none());
        assert!(command.password.is_none());

        let command = request(Some("Nico"), Some("new_secret")).try_into_command().unwrap();
        assert_eq!(command.display_name.unwrap().as_str(), "Nico");
        assert_eq!(command.password.as_deref(), Some("new_secret"));
    }
}
