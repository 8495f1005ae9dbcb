//! Courier identity service binary.

use std::sync::Arc;

use clap::Parser;
use courier_api::IdentityState;
use courier_core::auth::TokenAuthority;
use courier_core::store::postgres::{PgRefreshTokenStore, PgUserStore};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// CLI arguments for the identity service.
#[derive(Parser, Debug)]
#[command(name = "courier_identity_server", about = "Courier identity service")]
struct Args {
    /// Port to listen on (0 = ephemeral).
    #[arg(long, default_value_t = 3200)]
    port: u16,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/courier"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,courier_api=debug,courier_core=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    info!(database_url = %args.database_url, port = args.port, "starting identity service");

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&args.database_url)
        .await?;

    info!("running database migrations");
    courier_core::migrate::migrate(&pool).await?;

    let authority = TokenAuthority::new(
        Arc::new(PgUserStore::new(pool.clone())),
        Arc::new(PgRefreshTokenStore::new(pool)),
        courier_api::config::token_config_from_env(),
    );

    let app = courier_api::identity_router(IdentityState {
        authority: Arc::new(authority),
    });

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!(addr = %listener.local_addr()?, "identity service listening");

    axum::serve(listener, app).await?;
    Ok(())
}
