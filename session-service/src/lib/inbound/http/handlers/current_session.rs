use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::SessionContext;

/// Returns the pair re-issued by the session middleware for this request.
pub async fn current_session(
    Extension(context): Extension<SessionContext>,
) -> Result<ApiSuccess<TokenPairData>, ApiError> {
    Ok(ApiSuccess::new(
        StatusCode::OK,
        TokenPairData {
            access_token: context.tokens.access_token,
            refresh_token: context.tokens.refresh_token,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPairData {
    pub access_token: String,
    pub refresh_token: String,
}
