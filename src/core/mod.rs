/// The purchase transaction over the store
pub mod purchase;

pub use purchase::purchase_drink;
