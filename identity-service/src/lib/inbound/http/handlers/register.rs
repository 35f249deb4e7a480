use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::domain::identity::models::DisplayName;
use crate::domain::identity::models::LoginIdentifier;
use crate::domain::identity::models::RegisterIdentityCommand;
use crate::domain::identity::ports::IdentityServicePort;
use crate::identity::errors::DisplayNameError;
use crate::identity::errors::LoginIdentifierError;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let identity = state
        .identity_service
        .register(body.try_into_command()?)
        .await?;

    let result = state
        .authenticator
        .issue_token(identity.login_identifier.as_str())
        .map_err(|e| ApiError::InternalServerError(format!("Token issuing failed: {}", e)))?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        TokenResponseData::new(&identity, result),
    ))
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    login_identifier: String,
    display_name: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
pub enum ParseRegisterRequestError {
    #[error("Invalid login identifier: {0}")]
    LoginIdentifier(#[from] LoginIdentifierError),

    #[error("Invalid display name: {0}")]
    DisplayName(#[from] DisplayNameError),

    #[error("Password must not be empty")]
    EmptyPassword,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterIdentityCommand, ParseRegisterRequestError> {
        let login_identifier = LoginIdentifier::new(self.login_identifier)?;
        let display_name = DisplayName::new(self.display_name)?;
        if self.password.is_empty() {
            return Err(ParseRegisterRequestError::EmptyPassword);
        }
        Ok(RegisterIdentityCommand::new(
            login_identifier,
            display_name,
            self.password,
        ))
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
