use std::sync::Arc;

use chrono::Duration;
use credentials::TokenIssuer;
use session_service::config::Config;
use session_service::domain::auth::service::AuthService;
use session_service::inbound::http::router::create_router;
use session_service::outbound::repositories::PostgresIdentityDirectory;
use session_service::outbound::repositories::PostgresSessionStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "session_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "session-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        access_ttl_seconds = config.jwt.access_ttl_seconds,
        refresh_ttl_seconds = config.jwt.refresh_ttl_seconds,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let token_issuer = Arc::new(TokenIssuer::new(
        config.jwt.secret.as_bytes(),
        Duration::seconds(config.jwt.access_ttl_seconds),
        Duration::seconds(config.jwt.refresh_ttl_seconds),
    ));
    let identity_directory = Arc::new(PostgresIdentityDirectory::new(pg_pool.clone()));
    let session_store = Arc::new(PostgresSessionStore::new(pg_pool));

    let auth_service = Arc::new(AuthService::new(
        identity_directory,
        session_store,
        Arc::clone(&token_issuer),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, token_issuer);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
