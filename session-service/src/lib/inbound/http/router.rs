use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use credentials::TokenIssuer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::current_session::current_session;
use super::handlers::login::login;
use super::middleware::validate_session;
use crate::domain::auth::service::AuthService;
use crate::outbound::repositories::identity::PostgresIdentityDirectory;
use crate::outbound::repositories::session::PostgresSessionStore;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService<PostgresIdentityDirectory, PostgresSessionStore>>,
    pub token_issuer: Arc<TokenIssuer>,
}

pub fn create_router(
    auth_service: Arc<AuthService<PostgresIdentityDirectory, PostgresSessionStore>>,
    token_issuer: Arc<TokenIssuer>,
) -> Router {
    let state = AppState {
        auth_service,
        token_issuer,
    };

    let public_routes = Router::new().route("/api/auth/login", post(login));

    let protected_routes = Router::new()
        .route("/api/auth/session", get(current_session))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            validate_session,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
