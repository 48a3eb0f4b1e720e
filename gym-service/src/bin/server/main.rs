use std::sync::Arc;

use auth::PasswordHasher;
use auth::TokenService;
use auth::TokenTtl;
use gym_service::config::Config;
use gym_service::domain::auth::service::AuthService;
use gym_service::domain::rate_limit::service::RateLimiter;
use gym_service::inbound::http::router::create_router;
use gym_service::outbound::repositories::PostgresRateLimitStore;
use gym_service::outbound::repositories::PostgresSessionStore;
use gym_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gym_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "gym-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        access_ttl = %config.jwt.access_ttl,
        refresh_ttl_days = config.jwt.refresh_ttl_days,
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

    let token_service = TokenService::new(
        config.jwt.access_secret.as_bytes(),
        config.jwt.refresh_secret.as_bytes(),
        TokenTtl {
            access: config.access_ttl()?,
            refresh_days: config.jwt.refresh_ttl_days,
        },
    );
    let password_hasher = PasswordHasher::new(config.password.hash_cost)
        .map_err(|e| anyhow::anyhow!("Invalid password hasher configuration: {}", e))?;

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let session_store = Arc::new(PostgresSessionStore::new(pg_pool.clone()));
    let rate_limit_store = Arc::new(PostgresRateLimitStore::new(pg_pool));

    let auth_service = Arc::new(AuthService::new(
        user_repository,
        session_store,
        password_hasher,
        token_service,
    ));
    let rate_limiter = Arc::new(RateLimiter::new(rate_limit_store));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let application = create_router(auth_service, rate_limiter);
    axum::serve(http_listener, application).await?;

    Ok(())
}
