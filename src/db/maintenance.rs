//! Store maintenance: demo seed, wipe, export and status.

use crate::db::{Database, storage};
use crate::errors::Result;
use crate::models::{
    Consumption, DataExport, DatabaseStatus, Drink, TableCounts, UserProfile,
};
use chrono::Utc;
use tracing::{info, instrument};

const HOUR_MS: i64 = 3_600_000;

/// The fixed demo dataset: 3 users, 6 drinks, 3 consumption records.
fn demo_users() -> Vec<UserProfile> {
    let mut max = UserProfile::new("Max Mustermann", Some("max@example.com".to_string()));
    max.balance = 25.50;
    max.monthly_count = 12;
    let mut anna = UserProfile::new("Anna Schmidt", Some("anna@example.com".to_string()));
    anna.balance = 18.75;
    anna.monthly_count = 8;
    let mut tom = UserProfile::new("Tom Weber", Some("tom@example.com".to_string()));
    tom.balance = 32.00;
    tom.monthly_count = 15;
    vec![max, anna, tom]
}

fn demo_drinks() -> Vec<Drink> {
    vec![
        Drink::new("Bier", 3.50, 50, "beer"),
        Drink::new("Wein", 4.50, 30, "wine"),
        Drink::new("Cocktail", 6.00, 20, "cocktail"),
        Drink::new("Softdrink", 2.50, 40, "soda"),
        Drink::new("Kaffee", 2.00, 60, "coffee"),
        Drink::new("Tee", 1.50, 45, "water"),
    ]
}

fn demo_consumptions(users: &[UserProfile], drinks: &[Drink]) -> Vec<Consumption> {
    let now = Utc::now().timestamp_millis();
    let mut seeded = Vec::new();
    for (user_idx, drink_idx, hours_ago) in [(0, 0, 24), (1, 2, 12), (0, 1, 6)] {
        if let (Some(user), Some(drink)) = (users.get(user_idx), drinks.get(drink_idx)) {
            let mut consumption = Consumption::new(&user.id, &drink.id, drink.price);
            consumption.timestamp = now - hours_ago * HOUR_MS;
            seeded.push(consumption);
        }
    }
    seeded
}

impl Database {
    /// Wipes all three collections and reseeds the fixed demo dataset.
    /// For demos and tests, not production semantics.
    #[instrument(skip(self))]
    pub async fn reset_mock_data(&self) -> Result<()> {
        self.clear_all_data().await?;

        let users = demo_users();
        let drinks = demo_drinks();
        let consumptions = demo_consumptions(&users, &drinks);

        for user in users {
            self.save_user_profile(user).await?;
        }
        for drink in drinks {
            self.save_drink(drink).await?;
        }
        for consumption in consumptions {
            self.add_consumption(consumption).await?;
        }

        info!("Demo data reseeded.");
        Ok(())
    }

    /// Wipes all three collections and persists the empty state.
    #[instrument(skip(self))]
    pub async fn clear_all_data(&self) -> Result<()> {
        {
            let mut state = self.lock_state()?;
            state.users.clear();
            state.drinks.clear();
            state.consumptions.clear();
        }
        self.persist_collection::<UserProfile>(storage::USERS_KEY, &[])
            .await?;
        self.persist_collection::<Drink>(storage::DRINKS_KEY, &[])
            .await?;
        self.persist_collection::<Consumption>(storage::CONSUMPTIONS_KEY, &[])
            .await?;
        info!("All collections cleared.");
        Ok(())
    }

    /// Returns a full snapshot of the store for backup/portability.
    #[instrument(skip(self))]
    pub async fn export_data(&self) -> Result<DataExport> {
        let state = self.lock_state()?;
        Ok(DataExport {
            users: state.users.clone(),
            drinks: state.drinks.clone(),
            consumptions: state.consumptions.clone(),
            export_date: Utc::now(),
        })
    }

    /// Returns whether the store came up and the per-collection counts.
    #[instrument(skip(self))]
    pub async fn get_database_status(&self) -> Result<DatabaseStatus> {
        let state = self.lock_state()?;
        Ok(DatabaseStatus {
            is_initialized: self.initialized(),
            table_counts: TableCounts {
                users: state.users.len(),
                drinks: state.drinks.len(),
                consumptions: state.consumptions.len(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{init_test_tracing, setup_test_db};
    use crate::errors::Result;

    #[tokio::test]
    async fn test_reset_mock_data_yields_fixed_counts() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;

        // Prior state must not matter.
        db.save_user_profile(UserProfile::new("Leftover", None)).await?;
        db.save_drink(Drink::new("Leftover", 1.0, 1, "beer")).await?;

        db.reset_mock_data().await?;

        let status = db.get_database_status().await?;
        assert_eq!(status.table_counts.users, 3);
        assert_eq!(status.table_counts.drinks, 6);
        assert_eq!(status.table_counts.consumptions, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_demo_consumptions_reference_seeded_entities() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        db.reset_mock_data().await?;

        let users = db.get_all_user_profiles().await?;
        let drinks = db.get_all_drinks().await?;
        for user in &users {
            for consumption in db.get_consumptions_by_user(&user.id).await? {
                assert!(
                    drinks.iter().any(|d| d.id == consumption.drink_id),
                    "Seeded consumption must reference a seeded drink."
                );
            }
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_clear_all_data_persists_empty_state() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        db.reset_mock_data().await?;

        db.clear_all_data().await?;

        let status = db.get_database_status().await?;
        assert_eq!(status.table_counts.users, 0);
        assert_eq!(status.table_counts.drinks, 0);
        assert_eq!(status.table_counts.consumptions, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_export_contains_all_collections() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        db.reset_mock_data().await?;

        let export = db.export_data().await?;
        assert_eq!(export.users.len(), 3);
        assert_eq!(export.drinks.len(), 6);
        assert_eq!(export.consumptions.len(), 3);
        assert!(export.export_date <= Utc::now());
        Ok(())
    }
}
