use crate::db::schema::create_tables;
use crate::errors::{Error, Result};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument};

// A simple wrapper around a single rusqlite connection. The store is owned
// by one process; Arc<Mutex<Connection>> is enough to share it between the
// store and the payment codec.
pub type StoragePool = Arc<Mutex<Connection>>;

/// Opens the key-value storage database and ensures its schema exists.
#[instrument]
pub async fn init_storage(db_path: &str) -> Result<StoragePool> {
    debug!("Initializing storage connection to: {}", db_path);
    let conn = Connection::open(db_path)
        .map_err(|e| Error::Storage(format!("Failed to open storage at {}: {}", db_path, e)))?;

    info!("Storage connection opened. Ensuring tables are created...");
    create_tables(&conn)?;

    Ok(Arc::new(Mutex::new(conn)))
}
