use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::StoredSession;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<SessionData>, ApiError> {
    let email = EmailAddress::new(body.email).map_err(|e| ApiError::from(AuthError::from(e)))?;

    let command = LoginCommand::new(email, body.password);

    let session = state
        .auth_service
        .login(command)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(StatusCode::OK, SessionData::from(&session)))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionData {
    pub access_token: String,
    pub refresh_token: String,
    pub actor: String,
    pub actor_kind: String,
}

impl From<&StoredSession> for SessionData {
    fn from(session: &StoredSession) -> Self {
        Self {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            actor: session.actor.to_string(),
            actor_kind: session.actor_kind.as_str().to_string(),
        }
    }
}
