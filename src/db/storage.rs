//! Raw key-value access to the `storage` table.
//!
//! Collections are serialized whole (not as deltas) and written under these
//! fixed keys, one write per affected collection.

use crate::db::StoragePool;
use crate::errors::{Error, Result};
use rusqlite::{OptionalExtension, params};
use tracing::{debug, info, instrument};

/// Key holding the JSON array of user profiles.
pub const USERS_KEY: &str = "users";
/// Key holding the JSON array of drinks.
pub const DRINKS_KEY: &str = "drinks";
/// Key holding the JSON array of consumption records.
pub const CONSUMPTIONS_KEY: &str = "consumptions";
/// Key holding the TWINT admin configuration object.
pub const TWINT_ADMIN_CONFIG_KEY: &str = "twint_admin_config";

/// Retrieves a raw JSON value from the key-value `storage` table.
///
/// # Returns
///
/// Returns `Ok(Some(String))` if the key exists, `Ok(None)` if it does not.
///
/// # Errors
///
/// Returns `Error::Storage` if there's an issue acquiring the storage lock,
/// preparing the SQL statement, or mapping the query result.
#[instrument(skip(pool))]
pub async fn get_value(pool: &StoragePool, key: &str) -> Result<Option<String>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Storage("Failed to acquire storage lock".to_string()))?;
    let mut stmt = conn.prepare_cached("SELECT value FROM storage WHERE key = ?1")?;
    let value_result: Option<String> = stmt.query_row(params![key], |row| row.get(0)).optional()?;
    debug!(
        "Storage value for key '{}': {} bytes",
        key,
        value_result.as_ref().map_or(0, String::len)
    );
    Ok(value_result)
}

/// Sets or replaces a raw JSON value in the key-value `storage` table
/// (UPSERT behavior).
///
/// # Errors
///
/// Returns `Error::Storage` if there's an issue acquiring the storage lock
/// or executing the insert/update statement.
#[instrument(skip(pool, value))]
pub async fn set_value(pool: &StoragePool, key: &str, value: &str) -> Result<()> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Storage("Failed to acquire storage lock".to_string()))?;
    conn.execute(
        "INSERT INTO storage (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    info!("Persisted storage key '{}' ({} bytes)", key, value.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{init_test_tracing, setup_test_storage};
    use crate::errors::Result;

    #[tokio::test]
    async fn test_set_and_get_new_key() -> Result<()> {
        init_test_tracing();
        let pool = setup_test_storage()?;

        set_value(&pool, "test_key", "[1,2,3]").await?;
        let retrieved = get_value(&pool, "test_key").await?;

        assert_eq!(
            retrieved,
            Some("[1,2,3]".to_string()),
            "Retrieved value should match the set value for a new key."
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_set_replaces_existing_key() -> Result<()> {
        init_test_tracing();
        let pool = setup_test_storage()?;

        set_value(&pool, "users", "[]").await?;
        set_value(&pool, "users", "[{\"id\":\"u1\"}]").await?;

        let retrieved = get_value(&pool, "users").await?;
        assert_eq!(
            retrieved,
            Some("[{\"id\":\"u1\"}]".to_string()),
            "Second write should replace the first wholesale."
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_get_non_existent_key() -> Result<()> {
        init_test_tracing();
        let pool = setup_test_storage()?;

        let retrieved = get_value(&pool, "this_key_does_not_exist").await?;
        assert!(
            retrieved.is_none(),
            "Retrieved value for a non-existent key should be None."
        );
        Ok(())
    }
}
