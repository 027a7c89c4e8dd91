//! The persistent store.
//!
//! [`Database`] is the single source of truth for the three collections
//! (users, drinks, consumptions). It is constructed exactly once by the
//! composition root and passed by reference to all consumers; construction
//! loads every collection from durable storage, and every mutation
//! re-serializes the affected collection back under its fixed key.
//!
//! Failure policy: a corrupt or missing stored collection is logged and
//! replaced by the empty collection at load time; a failed persist is
//! returned to the caller and leaves the in-memory state ahead of the
//! durable state until the next successful write.

pub mod connection;
pub mod consumptions;
pub mod drinks;
pub mod maintenance;
pub(crate) mod schema;
pub mod storage;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;

pub use connection::{StoragePool, init_storage};

use crate::errors::{Error, Result};
use crate::models::{Consumption, Drink, UserProfile};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::{Mutex, MutexGuard};
use tracing::{info, instrument, warn};

/// In-memory mirror of the stored collections, in insertion order.
#[derive(Debug, Default)]
pub(crate) struct Collections {
    pub(crate) users: Vec<UserProfile>,
    pub(crate) drinks: Vec<Drink>,
    pub(crate) consumptions: Vec<Consumption>,
}

/// The drinks-tab store. One instance per process.
#[derive(Debug)]
pub struct Database {
    pool: StoragePool,
    state: Mutex<Collections>,
    is_initialized: bool,
}

impl Database {
    /// Opens the store over an initialized storage pool, loading all three
    /// collections from durable storage.
    ///
    /// A missing or corrupt stored collection is logged and treated as
    /// empty; the store still comes up.
    #[instrument(skip(pool))]
    pub async fn open(pool: StoragePool) -> Result<Self> {
        let users = load_collection(&pool, storage::USERS_KEY).await;
        let drinks = load_collection(&pool, storage::DRINKS_KEY).await;
        let consumptions = load_collection(&pool, storage::CONSUMPTIONS_KEY).await;

        info!(
            "Store loaded: {} users, {} drinks, {} consumptions",
            users.len(),
            drinks.len(),
            consumptions.len()
        );

        Ok(Self {
            pool,
            state: Mutex::new(Collections {
                users,
                drinks,
                consumptions,
            }),
            is_initialized: true,
        })
    }

    pub(crate) fn lock_state(&self) -> Result<MutexGuard<'_, Collections>> {
        self.state
            .lock()
            .map_err(|_| Error::Storage("Failed to acquire collection lock".to_string()))
    }

    pub(crate) fn initialized(&self) -> bool {
        self.is_initialized
    }

    /// Serializes a full collection snapshot and writes it under its key.
    pub(crate) async fn persist_collection<T: Serialize>(
        &self,
        key: &str,
        snapshot: &[T],
    ) -> Result<()> {
        let json = serde_json::to_string(snapshot)?;
        storage::set_value(&self.pool, key, &json).await
    }
}

/// Loads one collection from storage, falling back to empty on a missing
/// key, a read error, or corrupt JSON.
async fn load_collection<T: DeserializeOwned>(pool: &StoragePool, key: &str) -> Vec<T> {
    match storage::get_value(pool, key).await {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(values) => values,
            Err(e) => {
                warn!("Ignoring corrupt '{}' entry in storage: {}", key, e);
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("Failed to read '{}' from storage, starting empty: {}", key, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{init_test_tracing, setup_test_storage};
    use crate::errors::Result;

    #[tokio::test]
    async fn test_open_on_empty_storage_yields_empty_collections() -> Result<()> {
        init_test_tracing();
        let pool = setup_test_storage()?;
        let db = Database::open(pool).await?;

        let status = db.get_database_status().await?;
        assert!(status.is_initialized);
        assert_eq!(status.table_counts.users, 0);
        assert_eq!(status.table_counts.drinks, 0);
        assert_eq!(status.table_counts.consumptions, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_open_tolerates_corrupt_collection() -> Result<()> {
        init_test_tracing();
        let pool = setup_test_storage()?;
        storage::set_value(&pool, storage::USERS_KEY, "not valid json").await?;

        let db = Database::open(pool).await?;
        let status = db.get_database_status().await?;
        assert!(
            status.is_initialized,
            "A corrupt stored collection must not prevent the store from coming up."
        );
        assert_eq!(status.table_counts.users, 0);
        Ok(())
    }
}
