//! Storage configuration.
//!
//! The store lives in a single local `SQLite` file. Its location comes from
//! the `DATABASE_PATH` environment variable (loaded from `.env` by the
//! composition root) and falls back to a default local file.

/// Default on-disk location of the key-value storage database.
pub const DEFAULT_DATABASE_PATH: &str = "data/bierlounge.sqlite";

/// Gets the storage database path from the environment or returns the
/// default local `SQLite` path.
#[must_use]
pub fn get_database_path() -> String {
    std::env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string())
}

#[cfg(test)]
// Edition 2024 makes env mutation `unsafe`; the crate-wide `deny(unsafe_code)`
// is relaxed for this test only.
#[allow(unsafe_code)]
mod tests {
    use super::*;

    #[test]
    fn test_env_override_and_default_path() {
        // No other test reads DATABASE_PATH, so mutating it here cannot
        // race; the prior value is restored on the way out.
        let saved = std::env::var("DATABASE_PATH").ok();

        unsafe { std::env::remove_var("DATABASE_PATH") };
        assert_eq!(get_database_path(), DEFAULT_DATABASE_PATH);

        unsafe { std::env::set_var("DATABASE_PATH", "custom/tab.sqlite") };
        assert_eq!(get_database_path(), "custom/tab.sqlite");

        match saved {
            Some(value) => unsafe { std::env::set_var("DATABASE_PATH", value) },
            None => unsafe { std::env::remove_var("DATABASE_PATH") },
        }
    }
}
