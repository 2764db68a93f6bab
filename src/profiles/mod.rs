pub mod age;
pub mod model;
pub mod summarize;

pub use age::age_from_birthday;
pub use model::{OnboardingForm, StoredUser, UserProfile, UNKNOWN_FIELD};
pub use summarize::{assistant_context, summarize_profile, ProfileSummary};

use anyhow::{Context, Result};
use std::fs;

use crate::storage::{self, RecordWriteOutcome};
use crate::workspace::DataLayout;

/// Durable per-user record of the onboarding outcome.
pub struct ProfileStore<'a> {
    layout: &'a DataLayout,
}

impl<'a> ProfileStore<'a> {
    pub fn new(layout: &'a DataLayout) -> Self {
        Self { layout }
    }

    pub fn load(&self, user_id: &str) -> Result<Option<StoredUser>> {
        storage::read_record(self.layout.user_json(user_id)?)
    }

    pub fn save(&self, user_id: &str, user: &StoredUser) -> Result<RecordWriteOutcome> {
        let outcome = storage::write_record(self.layout.user_json(user_id)?, user)?;
        tracing::debug!(user_id, hash = %outcome.hash, "stored user profile");
        Ok(outcome)
    }

    /// Replaces the profile of an onboarded user wholesale.
    pub fn update_profile(&self, user_id: &str, profile: UserProfile) -> Result<StoredUser> {
        let mut user = self
            .load(user_id)?
            .with_context(|| format!("No stored profile for user {user_id}"))?;
        user.profile = profile;
        self.save(user_id, &user)?;
        Ok(user)
    }

    /// Removes the stored record. Returns whether anything was deleted.
    pub fn clear(&self, user_id: &str) -> Result<bool> {
        let path = self.layout.user_json(user_id)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).with_context(|| format!("Failed removing record {:?}", path))?;
        Ok(true)
    }
}
