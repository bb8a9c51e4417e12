//! Persistence for [`UserProgress`] under the `chronos_user_progress` key.

use super::{merge, UserProgress};
use crate::error::Result;
use crate::protocol::PHASES;
use crate::storage::{KvStore, PROGRESS_KEY};

/// Loads and saves progress through a [`KvStore`].
pub struct ProgressStore<S> {
    store: S,
}

impl<S: KvStore> ProgressStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read the stored progress, merged against the phase table.
    ///
    /// Never fails: a missing record is a first run, and an unreadable or
    /// malformed record is logged and replaced by the initial state.
    pub fn load(&self) -> UserProgress {
        let raw = match self.store.get(PROGRESS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return UserProgress::initial(PHASES),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read user progress, starting fresh");
                return UserProgress::initial(PHASES);
            }
        };

        match serde_json::from_str::<UserProgress>(&raw) {
            Ok(loaded) => merge(loaded, PHASES),
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse user progress, starting fresh");
                UserProgress::initial(PHASES)
            }
        }
    }

    /// Overwrite the stored record.
    pub fn save(&self, progress: &UserProgress) -> Result<()> {
        let json = serde_json::to_string(progress)?;
        self.store.set(PROGRESS_KEY, &json)?;
        tracing::debug!(total_fasts = progress.total_fasts, "saved user progress");
        Ok(())
    }

    /// Replace the stored record with the initial state and return it.
    pub fn reset(&self) -> Result<UserProgress> {
        let initial = UserProgress::initial(PHASES);
        self.save(&initial)?;
        tracing::info!("user progress reset");
        Ok(initial)
    }
}
