use dotenvy::dotenv;
use sample_bank::{
    api::{self, AppState},
    config,
    core::client,
    errors::Result,
};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Welcome to Sample bank Server");

    // 3. Load the application configuration
    let app_config = config::settings::load_app_configuration()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    info!(
        listen_address = %app_config.listen_address,
        allowed_origin = %app_config.allowed_origin,
        "Configuration loaded"
    );

    // 4. Connect and ensure tables
    let db = config::database::init_db(&app_config.database)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Seed the demo client when asked to
    if app_config.seed_demo_data {
        if let Some(seeded) = client::seed_demo_client(&db)
            .await
            .inspect_err(|e| error!("Failed to seed demo data: {}", e))?
        {
            info!(id = seeded.id, "Seeded demo client");
        }
    }

    // 6. Serve until shutdown, then release the connection pool
    let app = api::router(AppState { db: db.clone() }, &app_config.allowed_origin)?;
    let listener = TcpListener::bind(&app_config.listen_address)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", app_config.listen_address, e))?;
    let served = api::serve(listener, app).await;

    db.close().await?;
    info!("Database connection closed");
    served
}
