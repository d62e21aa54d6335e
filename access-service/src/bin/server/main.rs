use std::sync::Arc;
use std::time::Duration;

use access_service::config::Config;
use access_service::domain::identity::service::AuthService;
use access_service::inbound::http::router::create_router;
use access_service::outbound::repositories::PostgresCredentialStore;
use access_service::outbound::revocation::spawn_purge_task;
use access_service::outbound::revocation::InMemoryRevocationRegistry;
use auth::Clock;
use auth::PasswordHasher;
use auth::SystemClock;
use auth::TokenCodec;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "access_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "access-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_ttl_seconds = config.token.ttl_seconds,
        password_memory_kib = config.password.memory_kib,
        password_iterations = config.password.iterations,
        purge_interval_secs = config.revocation.purge_interval_secs,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let token_codec = Arc::new(TokenCodec::with_clock(
        config.token.secret.as_bytes(),
        Arc::clone(&clock),
    )?);
    let password_hasher = PasswordHasher::with_params(config.password.into())?;

    let credential_store = Arc::new(PostgresCredentialStore::new(pg_pool));
    let revocation_registry = Arc::new(InMemoryRevocationRegistry::with_clock(Arc::clone(
        &clock,
    )));

    let purge_task = spawn_purge_task(
        Arc::clone(&revocation_registry),
        Arc::clone(&clock),
        Duration::from_secs(config.revocation.purge_interval_secs),
    );

    let auth_service = Arc::new(AuthService::new(
        credential_store,
        revocation_registry,
        password_hasher,
        token_codec,
        config.token.ttl(),
    )?);

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service);

    match axum::serve(http_listener, http_application).await {
        Ok(()) => tracing::info!("Server exited successfully"),
        Err(e) => tracing::error!(error = %e, "Server error"),
    };

    purge_task.abort();

    Ok(())
}
