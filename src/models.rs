use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder name shown when a consumption references a drink that has
/// since been deleted from the inventory.
pub const UNKNOWN_DRINK_NAME: &str = "Unbekanntes Getränk";

/// Icon tag used whenever a drink's own tag cannot be resolved.
pub const DEFAULT_ICON_KEY: &str = "beer";

/// Mints a fresh entity id. IDs are opaque strings, unique per collection.
fn new_entity_id() -> String {
    Uuid::new_v4().to_string()
}

/// A drink offered at the venue.
///
/// Stored JSON uses camelCase keys (`iconKey`) to match the storage layout.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Drink {
    pub id: String,
    pub name: String,
    pub price: f64, // CHF, snapshotted onto consumptions at purchase time
    pub stock: i64,
    // Opaque tag resolved by the display layer; unknown tags fall back to
    // DEFAULT_ICON_KEY rather than erroring.
    pub icon_key: String,
}

impl Drink {
    /// Creates a drink with a freshly minted id.
    pub fn new(
        name: impl Into<String>,
        price: f64,
        stock: i64,
        icon_key: impl Into<String>,
    ) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            price,
            stock,
            icon_key: icon_key.into(),
        }
    }
}

/// A user with a running tab.
///
/// `balance` is signed: it goes negative with repeated purchases (debt) and
/// is only returned to zero by an explicit reset - marking a payment request
/// as paid never touches it, since this system never observes money moving.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub balance: f64,
    // Purchase counter, incremented per purchase and zeroed on reset.
    // There is no automatic month-boundary rollover.
    pub monthly_count: u32,
}

impl UserProfile {
    /// Creates a user with a fresh id, zero balance and zero counter.
    pub fn new(name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            email,
            balance: 0.0,
            monthly_count: 0,
        }
    }
}

/// One purchase, recorded at the price charged at purchase time.
///
/// Append-mostly audit record: deletable individually (to correct a mistaken
/// purchase) but otherwise never mutated. `user_id`/`drink_id` referenced
/// real entities at creation time, but referential integrity is not
/// maintained after deletion - readers must tolerate dangling ids.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Consumption {
    pub id: String,
    pub user_id: String,
    pub drink_id: String,
    pub timestamp: i64, // epoch millis
    pub price: f64,     // snapshot, immune to later drink price changes
}

impl Consumption {
    /// Creates a consumption record stamped with the current time.
    pub fn new(user_id: impl Into<String>, drink_id: impl Into<String>, price: f64) -> Self {
        Self {
            id: new_entity_id(),
            user_id: user_id.into(),
            drink_id: drink_id.into(),
            timestamp: Utc::now().timestamp_millis(),
            price,
        }
    }

    /// The purchase time as a UTC datetime, or `None` for an out-of-range
    /// timestamp.
    #[must_use]
    pub fn date(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// A consumption joined with the *current* drink name and icon for display.
///
/// The price still comes from the consumption record itself; only name and
/// icon are looked up live, with placeholders when the drink is gone.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionWithDrink {
    #[serde(flatten)]
    pub consumption: Consumption,
    pub drink_name: String,
    pub icon_key: String,
}

/// Full snapshot of all collections, for backup/portability.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataExport {
    pub users: Vec<UserProfile>,
    pub drinks: Vec<Drink>,
    pub consumptions: Vec<Consumption>,
    pub export_date: DateTime<Utc>,
}

/// Per-collection record counts.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TableCounts {
    pub users: usize,
    pub drinks: usize,
    pub consumptions: usize,
}

/// Store health summary.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStatus {
    pub is_initialized: bool,
    pub table_counts: TableCounts,
}
