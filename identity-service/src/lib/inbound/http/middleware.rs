use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::identity::models::LoginIdentifier;
use crate::domain::identity::ports::IdentityLoader;
use crate::inbound::http::context::AuthenticatedContext;
use crate::inbound::http::context::AuthenticatedIdentity;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Authenticates every request from its bearer token, if any.
///
/// Requests without a bearer token continue as anonymous; handlers that need
/// a caller reject them through the `CurrentIdentity` extractor. A token that
/// cannot be parsed stops the chain with 400, a token that fails full
/// verification (expired, unknown subject, subject mismatch) with 401.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = extract_bearer_token(&req) else {
        if req.extensions().get::<AuthenticatedContext>().is_none() {
            req.extensions_mut().insert(AuthenticatedContext::Anonymous);
        }
        return Ok(next.run(req).await);
    };

    let tokens = state.authenticator.tokens();

    let subject = tokens.extract_subject(&token).map_err(|e| {
        tracing::warn!(error = %e, "Rejected malformed bearer token");
        ApiError::BadRequest("Malformed token".to_string())
    })?;

    let already_authenticated = req
        .extensions()
        .get::<AuthenticatedContext>()
        .is_some_and(AuthenticatedContext::is_authenticated);

    if !already_authenticated {
        let identity = authenticate_subject(&state, &token, &subject).await?;
        req.extensions_mut()
            .insert(AuthenticatedContext::Authenticated(identity));
    }

    Ok(next.run(req).await)
}

async fn authenticate_subject(
    state: &AppState,
    token: &str,
    subject: &str,
) -> Result<AuthenticatedIdentity, ApiError> {
    let unauthorized = || ApiError::Unauthorized("Invalid or expired token".to_string());

    let login_identifier = LoginIdentifier::new(subject).map_err(|e| {
        tracing::warn!(error = %e, "Token subject is not a valid login identifier");
        unauthorized()
    })?;

    let identity = state
        .identity_service
        .load_by_login_identifier(&login_identifier)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                tracing::warn!("Token subject does not match any identity");
                unauthorized()
            } else {
                ApiError::from(e)
            }
        })?;

    state
        .authenticator
        .tokens()
        .verify_for_subject(token, identity.login_identifier.as_str())
        .map_err(|e| {
            tracing::warn!(error = %e, identity_id = %identity.id, "Token verification failed");
            unauthorized()
        })?;

    tracing::debug!(identity_id = %identity.id, role = %identity.role, "Request authenticated");

    Ok(AuthenticatedIdentity::from(&identity))
}

/// Raw token after `Bearer `, or `None` when the request carries no bearer
/// credentials at all.
fn extract_bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(|token| token.trim().to_string())
}
