use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::domain::identity::models::LoginIdentifier;
use crate::domain::identity::ports::IdentityLoader;
use crate::inbound::http::router::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let unauthorized = || ApiError::Unauthorized(INVALID_CREDENTIALS.to_string());

    let login_identifier = LoginIdentifier::new(&body.login_identifier).map_err(|_| unauthorized())?;

    let identity = match state
        .identity_service
        .load_by_login_identifier(&login_identifier)
        .await
    {
        Ok(identity) => identity,
        Err(e) if e.is_not_found() => {
            // Same cost and answer as a wrong secret
            state.authenticator.reject_unknown(&body.password);
            return Err(unauthorized());
        }
        Err(e) => return Err(ApiError::from(e)),
    };

    let result = state
        .authenticator
        .authenticate(
            &body.password,
            &identity.password_hash,
            identity.login_identifier.as_str(),
        )
        .map_err(|e| match e {
            auth::AuthenticationError::InvalidCredentials => {
                tracing::info!(identity_id = %identity.id, "Login rejected");
                unauthorized()
            }
            auth::AuthenticationError::PasswordError(err) => {
                ApiError::InternalServerError(format!("Password verification failed: {}", err))
            }
            auth::AuthenticationError::TokenError(err) => {
                ApiError::InternalServerError(format!("Token issuing failed: {}", err))
            }
        })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        TokenResponseData::new(&identity, result),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    login_identifier: String,
    password: String,
}
