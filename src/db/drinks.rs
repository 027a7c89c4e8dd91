//! Drink inventory operations.

use crate::db::{Database, storage};
use crate::errors::Result;
use crate::models::Drink;
use tracing::{debug, info, instrument};

impl Database {
    /// Upserts a drink by id. Same semantics as
    /// [`save_user_profile`](Database::save_user_profile): replace in place
    /// on a known id, append otherwise.
    #[instrument(skip(self, drink), fields(drink_id = %drink.id))]
    pub async fn save_drink(&self, drink: Drink) -> Result<()> {
        let snapshot = {
            let mut state = self.lock_state()?;
            match state.drinks.iter_mut().find(|d| d.id == drink.id) {
                Some(existing) => *existing = drink,
                None => state.drinks.push(drink),
            }
            state.drinks.clone()
        };
        self.persist_collection(storage::DRINKS_KEY, &snapshot).await
    }

    /// Returns the matching drink, or `None` for an unknown id.
    #[instrument(skip(self))]
    pub async fn get_drink(&self, id: &str) -> Result<Option<Drink>> {
        let state = self.lock_state()?;
        Ok(state.drinks.iter().find(|d| d.id == id).cloned())
    }

    /// Returns a snapshot copy of the inventory in insertion order.
    #[instrument(skip(self))]
    pub async fn get_all_drinks(&self) -> Result<Vec<Drink>> {
        let state = self.lock_state()?;
        Ok(state.drinks.clone())
    }

    /// Removes the drink with the given id; idempotent.
    ///
    /// Historical consumptions referencing the drink are deliberately left
    /// untouched - readers substitute placeholders for the dangling id.
    #[instrument(skip(self))]
    pub async fn delete_drink(&self, drink_id: &str) -> Result<()> {
        let snapshot = {
            let mut state = self.lock_state()?;
            state.drinks.retain(|d| d.id != drink_id);
            state.drinks.clone()
        };
        debug!("Deleted drink '{}' (if present)", drink_id);
        self.persist_collection(storage::DRINKS_KEY, &snapshot).await
    }

    /// Sets the stock count of a drink. Unknown ids are a silent no-op.
    #[instrument(skip(self))]
    pub async fn update_drink_stock(&self, drink_id: &str, new_stock: i64) -> Result<()> {
        let snapshot = {
            let mut state = self.lock_state()?;
            let Some(drink) = state.drinks.iter_mut().find(|d| d.id == drink_id) else {
                return Ok(());
            };
            drink.stock = new_stock;
            state.drinks.clone()
        };
        self.persist_collection(storage::DRINKS_KEY, &snapshot).await?;
        info!("Updated stock for drink '{}': {}", drink_id, new_stock);
        Ok(())
    }
}
