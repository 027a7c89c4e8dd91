use bierlounge_tracker::config;
use bierlounge_tracker::db::{self, Database};
use bierlounge_tracker::errors::Result;
use bierlounge_tracker::twint::TwintService;
use dotenvy::dotenv;
use std::path::Path;
use std::sync::Arc;
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

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Make it non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Resolve the storage path and make sure its directory exists
    let db_path = config::get_database_path();
    if let Some(parent) = Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // 4. Initialize storage and the store
    let pool = db::init_storage(&db_path)
        .await
        .inspect(|_| info!("Storage initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize storage: {}", e))?;

    let database = Database::open(Arc::clone(&pool)).await?;

    // 5. Seed the demo dataset on a completely empty store
    let status = database.get_database_status().await?;
    if status.table_counts.users == 0 && status.table_counts.drinks == 0 {
        info!("Empty store detected, seeding demo data.");
        database
            .reset_mock_data()
            .await
            .inspect_err(|e| error!("Failed to seed demo data: {}", e))?;
    }

    // 6. Bring up the payment codec over the same storage
    let twint = TwintService::load(Arc::clone(&pool)).await;

    let status = database.get_database_status().await?;
    info!(
        "Store ready: {} users, {} drinks, {} consumptions",
        status.table_counts.users, status.table_counts.drinks, status.table_counts.consumptions
    );
    info!(
        "TWINT payee IBAN {}",
        if twint.admin_config().iban.is_some() {
            "configured"
        } else {
            "not configured"
        }
    );

    Ok(())
}
