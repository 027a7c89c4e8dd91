//! Consumption record operations.

use crate::db::{Database, storage};
use crate::errors::Result;
use crate::models::{Consumption, ConsumptionWithDrink, DEFAULT_ICON_KEY, UNKNOWN_DRINK_NAME};
use tracing::{debug, instrument};

impl Database {
    /// Upserts a consumption record by id. In practice records are appended
    /// once at purchase time and never mutated afterwards.
    #[instrument(skip(self, consumption), fields(consumption_id = %consumption.id))]
    pub async fn add_consumption(&self, consumption: Consumption) -> Result<()> {
        let snapshot = {
            let mut state = self.lock_state()?;
            match state.consumptions.iter_mut().find(|c| c.id == consumption.id) {
                Some(existing) => *existing = consumption,
                None => state.consumptions.push(consumption),
            }
            state.consumptions.clone()
        };
        self.persist_collection(storage::CONSUMPTIONS_KEY, &snapshot)
            .await
    }

    /// Returns all consumptions of one user, in insertion order.
    #[instrument(skip(self))]
    pub async fn get_consumptions_by_user(&self, user_id: &str) -> Result<Vec<Consumption>> {
        let state = self.lock_state()?;
        Ok(state
            .consumptions
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    /// Returns one user's consumptions joined with the *current* drink name
    /// and icon. The price always comes from the consumption record itself.
    ///
    /// A consumption whose drink has since been deleted is still returned,
    /// with placeholder name and default icon substituted for the dangling
    /// reference.
    #[instrument(skip(self))]
    pub async fn get_consumptions_with_drink_info(
        &self,
        user_id: &str,
    ) -> Result<Vec<ConsumptionWithDrink>> {
        let state = self.lock_state()?;
        let joined = state
            .consumptions
            .iter()
            .filter(|c| c.user_id == user_id)
            .map(|c| {
                let drink = state.drinks.iter().find(|d| d.id == c.drink_id);
                ConsumptionWithDrink {
                    consumption: c.clone(),
                    drink_name: drink
                        .map_or_else(|| UNKNOWN_DRINK_NAME.to_string(), |d| d.name.clone()),
                    icon_key: drink
                        .map_or_else(|| DEFAULT_ICON_KEY.to_string(), |d| d.icon_key.clone()),
                }
            })
            .collect();
        Ok(joined)
    }

    /// Removes the consumption with the given id; idempotent. Used to
    /// correct a mistaken purchase - the user's balance is not adjusted
    /// here.
    #[instrument(skip(self))]
    pub async fn delete_consumption(&self, consumption_id: &str) -> Result<()> {
        let snapshot = {
            let mut state = self.lock_state()?;
            state.consumptions.retain(|c| c.id != consumption_id);
            state.consumptions.clone()
        };
        debug!("Deleted consumption '{}' (if present)", consumption_id);
        self.persist_collection(storage::CONSUMPTIONS_KEY, &snapshot)
            .await
    }
}
