//! User profile operations.

use crate::db::{Database, storage};
use crate::errors::Result;
use crate::models::UserProfile;
use tracing::{debug, info, instrument};

impl Database {
    /// Upserts a user profile by id.
    ///
    /// An existing profile with the same id is replaced in place; otherwise
    /// the profile is appended. No field validation is performed here - the
    /// caller is the gate.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn save_user_profile(&self, user: UserProfile) -> Result<()> {
        let snapshot = {
            let mut state = self.lock_state()?;
            match state.users.iter_mut().find(|u| u.id == user.id) {
                Some(existing) => *existing = user,
                None => state.users.push(user),
            }
            state.users.clone()
        };
        self.persist_collection(storage::USERS_KEY, &snapshot).await
    }

    /// Returns the matching profile, or `None` for an unknown id.
    #[instrument(skip(self))]
    pub async fn get_user_profile(&self, id: &str) -> Result<Option<UserProfile>> {
        let state = self.lock_state()?;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    /// Returns a snapshot copy of all profiles in insertion order.
    #[instrument(skip(self))]
    pub async fn get_all_user_profiles(&self) -> Result<Vec<UserProfile>> {
        let state = self.lock_state()?;
        Ok(state.users.clone())
    }

    /// Removes the profile with the given id. Deleting an unknown id is a
    /// no-op, not an error.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        let snapshot = {
            let mut state = self.lock_state()?;
            state.users.retain(|u| u.id != user_id);
            state.users.clone()
        };
        debug!("Deleted user '{}' (if present)", user_id);
        self.persist_collection(storage::USERS_KEY, &snapshot).await
    }

    /// Settles a user's tab: balance back to zero, purchase counter back to
    /// zero. This is the only path that zeroes a balance - marking a payment
    /// request as paid never does.
    ///
    /// Returns the updated profile, or `None` for an unknown id.
    #[instrument(skip(self))]
    pub async fn reset_user_tab(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let (updated, snapshot) = {
            let mut state = self.lock_state()?;
            let Some(user) = state.users.iter_mut().find(|u| u.id == user_id) else {
                return Ok(None);
            };
            user.balance = 0.0;
            user.monthly_count = 0;
            (user.clone(), state.users.clone())
        };
        self.persist_collection(storage::USERS_KEY, &snapshot).await?;
        info!("Reset tab for user '{}'", user_id);
        Ok(Some(updated))
    }
}
