use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use credentials::IdentityPayload;
use credentials::TokenPair;

use crate::domain::auth::models::ActorId;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type carrying the validated session through the request.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub actor: ActorId,
    /// Payload decoded from the presented token (signature verified).
    pub identity: IdentityPayload,
    /// Pair re-issued by the session validator for this request.
    pub tokens: TokenPair,
}

/// Middleware that runs the session validator on the presented bearer token.
///
/// The presented token is signature-verified here to obtain the identity
/// payload; the validator then resolves the stored session and checks its
/// expiry. Both rejection reasons map to 401 with the same message.
pub async fn validate_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let bearer = extract_bearer_header(&req)?;

    let token = bearer.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )
        .into_response()
    })?;

    let claims = state.token_issuer.decode_access(token).map_err(|e| {
        tracing::warn!(error = %e, "Presented token failed verification");
        ApiError::Unauthorized("Session expired or invalid".to_string()).into_response()
    })?;

    let actor = ActorId::from_string(&claims.identity.id).map_err(|e| {
        tracing::error!(error = %e, "Failed to parse actor ID from token");
        ApiError::Unauthorized("Invalid token format".to_string()).into_response()
    })?;

    let tokens = state
        .auth_service
        .validate_session(bearer, claims.identity.clone())
        .await
        .map_err(|e| ApiError::from(e).into_response())?;

    req.extensions_mut().insert(SessionContext {
        actor,
        identity: claims.identity,
        tokens,
    });

    Ok(next.run(req).await)
}

fn extract_bearer_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            ApiError::Unauthorized("Missing Authorization header".to_string()).into_response()
        })?;

    auth_header.to_str().map_err(|_| {
        ApiError::Unauthorized("Invalid Authorization header".to_string()).into_response()
    })
}
