use std::sync::Arc;

use pigseller_backend::{
    config::Config,
    routes::create_routes,
    services::{business_verification::AlwaysApprove, payment_gateway::TossPaymentsClient},
    AppState,
};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pigseller_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!(region = %config.region, "Connecting to database...");
    let db = Database::connect(&config.database_url).await?;

    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None).await?;

    let gateway = TossPaymentsClient::new(&config.gateway)?;
    tracing::info!(
        gateway = %config.gateway.base_url,
        timeout_secs = config.gateway.timeout.as_secs(),
        max_retries = config.gateway.max_retries,
        "Payment gateway configured"
    );

    let bind_addr = config.bind_addr.clone();
    let state = AppState {
        db,
        config: Arc::new(config),
        gateway: Arc::new(gateway),
        business_verifier: Arc::new(AlwaysApprove),
    };

    let app = create_routes(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
