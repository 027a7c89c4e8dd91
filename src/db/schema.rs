use crate::errors::{Error, Result};
use rusqlite::Connection;
use tracing::{debug, info, instrument};

#[instrument(skip(conn))]
pub(crate) fn create_tables(conn: &Connection) -> Result<()> {
    debug!("Executing CREATE TABLE statements if tables do not exist.");
    conn.execute_batch(
        "BEGIN;

        -- Single key-value table; each collection is stored whole as one
        -- JSON document under a fixed key.
        CREATE TABLE IF NOT EXISTS storage ( key TEXT PRIMARY KEY, value TEXT NOT NULL );

        COMMIT;",
    )
    .map_err(|e| Error::Storage(format!("Failed to create storage table: {}", e)))?;
    info!("Storage table ensured.");
    Ok(())
}
