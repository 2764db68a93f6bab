//! Data structures backing the onboarding profile.
//!
//! Field names follow the JSON contract the onboarding model emits
//! (`has_id`, `wellbeing_score`, ...), so the same structs are used for
//! parsing model output and for the on-disk profile record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wellbeing scores at or below this value are treated as "at risk".
pub const WELLBEING_AT_RISK_THRESHOLD: i32 = 2;

/// Placeholder written into free-text fields the onboarding step could not infer.
pub const UNKNOWN_FIELD: &str = "unknown";

/// Structured record of a user's housing, documents, healthcare, food and
/// wellbeing situation, derived once at onboarding.
///
/// Keys missing from a record take the `Default` values, so a partial model
/// reply keeps what it did say instead of being discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub housing_status: String,
    pub has_id: bool,
    pub has_healthcare: bool,
    pub education_level: String,
    pub food_secure: bool,
    /// Self-reported on a 1-5 scale. Not validated here.
    pub wellbeing_score: i32,
    pub zip_code: String,
    pub state: String,
    /// Missing documents or unaddressed rights, in the order they were raised.
    pub legal_gaps: Vec<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            housing_status: UNKNOWN_FIELD.into(),
            has_id: false,
            has_healthcare: false,
            education_level: UNKNOWN_FIELD.into(),
            food_secure: true,
            wellbeing_score: 3,
            zip_code: UNKNOWN_FIELD.into(),
            state: UNKNOWN_FIELD.into(),
            legal_gaps: Vec::new(),
        }
    }
}

impl UserProfile {
    /// Local fallback profile used when no model-backed profile step runs.
    pub fn fallback_for_zip(zip_code: &str) -> Self {
        let zip_code = zip_code.trim();
        Self {
            zip_code: if zip_code.is_empty() {
                UNKNOWN_FIELD.into()
            } else {
                zip_code.to_string()
            },
            ..Self::default()
        }
    }

    pub fn wellbeing_at_risk(&self) -> bool {
        self.wellbeing_score <= WELLBEING_AT_RISK_THRESHOLD
    }

    /// Substring heuristic over the free-text housing description.
    pub fn housing_unstable(&self) -> bool {
        self.housing_status.to_lowercase().contains("unstable")
    }
}

/// Details collected on the first onboarding screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingForm {
    /// Nickname or alias; never a legal name.
    pub name: String,
    #[serde(default)]
    pub birthday: String,
    pub zip_code: String,
}

/// Everything persisted for a user once onboarding completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub form: OnboardingForm,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    pub profile: UserProfile,
    pub welcome_summary: String,
    pub onboarding_completed_at: DateTime<Utc>,
}

impl StoredUser {
    /// Zip code used for location lookups, preferring what the user typed.
    pub fn lookup_zip(&self) -> Option<&str> {
        let form_zip = self.form.zip_code.trim();
        if !form_zip.is_empty() {
            return Some(form_zip);
        }
        let profile_zip = self.profile.zip_code.trim();
        if profile_zip.is_empty() || profile_zip == UNKNOWN_FIELD {
            None
        } else {
            Some(profile_zip)
        }
    }
}
