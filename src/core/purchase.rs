//! The purchase transaction.
//!
//! A purchase touches all three collections: the drink loses one unit of
//! stock, the user's balance drops by the drink's price (and the purchase
//! counter goes up by one), and a consumption record is appended with the
//! price snapshotted at purchase time. The three writes are sequential; on
//! a failure partway through, every collection is rolled back best-effort
//! to its pre-purchase records so the in-memory ledger never keeps a
//! partial purchase. A store write that fails to persist still commits its
//! in-memory mutation, so the failed write itself is reverted too, not
//! only the ones before it.

use crate::db::Database;
use crate::errors::{Error, Result};
use crate::models::Consumption;
use tracing::{error, info, instrument, warn};

/// Executes one purchase of `drink_id` by `user_id`.
///
/// Refuses with [`Error::OutOfStock`] before any write when the drink has
/// no stock left; zero- or negative-stock drinks never produce a
/// consumption record or a balance change.
///
/// # Errors
///
/// [`Error::UserNotFound`] / [`Error::DrinkNotFound`] when either party is
/// missing, [`Error::OutOfStock`] on an empty drink, or a storage error
/// from the underlying writes (after attempted reversal).
#[instrument(skip(db))]
pub async fn purchase_drink(db: &Database, user_id: &str, drink_id: &str) -> Result<Consumption> {
    let user = db
        .get_user_profile(user_id)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            id: user_id.to_string(),
        })?;
    let drink = db
        .get_drink(drink_id)
        .await?
        .ok_or_else(|| Error::DrinkNotFound {
            id: drink_id.to_string(),
        })?;

    if drink.stock <= 0 {
        return Err(Error::OutOfStock { name: drink.name });
    }

    // Write 1: stock decrement. On failure the in-memory stock is already
    // decremented, so the original record is written back.
    let mut updated_drink = drink.clone();
    updated_drink.stock -= 1;
    if let Err(e) = db.save_drink(updated_drink).await {
        warn!(
            "Stock decrement for '{}' failed, restoring the original record: {}",
            drink.name, e
        );
        if let Err(undo) = db.save_drink(drink.clone()).await {
            error!("Reversal of stock decrement for '{}' failed: {}", drink.name, undo);
        }
        return Err(e);
    }

    // Write 2: balance decrement + purchase counter.
    let mut updated_user = user.clone();
    updated_user.balance -= drink.price;
    updated_user.monthly_count += 1;
    if let Err(e) = db.save_user_profile(updated_user).await {
        warn!(
            "Balance update for user '{}' failed, restoring stock of '{}': {}",
            user.id, drink.name, e
        );
        if let Err(undo) = db.save_drink(drink.clone()).await {
            error!("Reversal of stock decrement for '{}' failed: {}", drink.name, undo);
        }
        if let Err(undo) = db.save_user_profile(user.clone()).await {
            error!("Reversal of balance update for '{}' failed: {}", user.id, undo);
        }
        return Err(e);
    }

    // Write 3: the audit record, with the price snapshotted. A failed append
    // leaves the record in memory, so it is deleted again alongside the
    // other reversals.
    let consumption = Consumption::new(&user.id, &drink.id, drink.price);
    if let Err(e) = db.add_consumption(consumption.clone()).await {
        warn!(
            "Consumption append failed, reversing purchase of '{}' by '{}': {}",
            drink.name, user.id, e
        );
        if let Err(undo) = db.delete_consumption(&consumption.id).await {
            error!("Removal of the orphaned consumption record failed: {}", undo);
        }
        if let Err(undo) = db.save_drink(drink.clone()).await {
            error!("Reversal of stock decrement for '{}' failed: {}", drink.name, undo);
        }
        if let Err(undo) = db.save_user_profile(user.clone()).await {
            error!("Reversal of balance update for '{}' failed: {}", user.id, undo);
        }
        return Err(e);
    }

    info!(
        "Purchase recorded: user='{}', drink='{}', price={:.2}",
        user.id, drink.name, drink.price
    );
    Ok(consumption)
}
