#![allow(dead_code)]
use crate::db::{Database, StoragePool, schema};
use crate::errors::{Error, Result};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer() // Crucial for `cargo test` output
        .try_init(); // Use try_init to avoid panic if already initialized
}

// Helper to create an in-memory storage pool for testing, with the schema
// already applied.
pub(crate) fn setup_test_storage() -> Result<StoragePool> {
    let conn = Connection::open_in_memory()
        .map_err(|e| Error::Storage(format!("Test storage: failed to open in-memory: {}", e)))?;
    schema::create_tables(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

// Helper to open a fresh empty store over in-memory storage.
pub(crate) async fn setup_test_db() -> Result<Database> {
    let pool = setup_test_storage()?;
    Database::open(pool).await
}
