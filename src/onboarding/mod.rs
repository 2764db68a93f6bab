pub mod flow;

pub use flow::{OnboardingFlow, OnboardingPhase};

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use serde_json::json;

use crate::orchestration::{log_event, EventType};
use crate::priorities::{compute_priority_actions, PriorityAction};
use crate::profiles::{age_from_birthday, OnboardingForm, ProfileStore, StoredUser, UserProfile, UNKNOWN_FIELD};
use crate::services::{generate_profile_from_transcript, LlmGateway};
use crate::workspace::DataLayout;

/// Where the stored profile came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSource {
    Model,
    LocalDefault,
}

impl ProfileSource {
    fn as_str(&self) -> &'static str {
        match self {
            ProfileSource::Model => "model",
            ProfileSource::LocalDefault => "local_default",
        }
    }
}

#[derive(Debug, Clone)]
pub struct OnboardingOutcome {
    pub user: StoredUser,
    pub actions: Vec<PriorityAction>,
    pub source: ProfileSource,
}

/// Describes the form in a sentence the profile model can work from.
pub fn form_prompt(form: &OnboardingForm, today: NaiveDate) -> String {
    let age = age_from_birthday(&form.birthday, today)
        .map(|age| format!(" Age: {age}."))
        .unwrap_or_default();
    format!(
        "Onboarding form. Nickname (alias): {}.{} Zip code: {}.",
        form.name.trim(),
        age,
        form.zip_code.trim()
    )
}

/// Builds the full text handed to the profile model.
pub fn onboarding_transcript(
    form: &OnboardingForm,
    transcript: Option<&str>,
    today: NaiveDate,
) -> String {
    let prefix = form_prompt(form, today);
    match transcript.map(str::trim).filter(|t| !t.is_empty()) {
        Some(spoken) => format!("{prefix}\n\nConversation:\n{spoken}"),
        None => format!("{prefix} Use these details to infer a supportive profile and welcome summary."),
    }
}

pub struct OnboardingService<'a> {
    layout: &'a DataLayout,
}

impl<'a> OnboardingService<'a> {
    pub fn new(layout: &'a DataLayout) -> Self {
        Self { layout }
    }

    /// Derives, stores and returns the profile for a user finishing onboarding.
    ///
    /// Without a gateway, or when the model call fails, a local default
    /// profile is stored so the user is never blocked.
    pub fn complete(
        &self,
        user_id: &str,
        form: OnboardingForm,
        transcript: Option<String>,
        gateway: Option<&dyn LlmGateway>,
        today: NaiveDate,
    ) -> Result<OnboardingOutcome> {
        let prompt = onboarding_transcript(&form, transcript.as_deref(), today);
        let derived = gateway.and_then(|gateway| {
            match generate_profile_from_transcript(gateway, &prompt) {
                Ok(result) => Some(result),
                Err(err) => {
                    tracing::warn!(error = %err, user_id, "profile generation failed, using local default");
                    None
                }
            }
        });
        let (mut profile, welcome_summary, source) = match derived {
            Some(result) => (result.profile, result.welcome_summary, ProfileSource::Model),
            None => (
                UserProfile::fallback_for_zip(&form.zip_code),
                local_welcome(&form),
                ProfileSource::LocalDefault,
            ),
        };
        if is_unknown(&profile.zip_code) && !form.zip_code.trim().is_empty() {
            profile.zip_code = form.zip_code.trim().to_string();
        }

        let user = StoredUser {
            form,
            transcript,
            profile,
            welcome_summary,
            onboarding_completed_at: Utc::now(),
        };
        ProfileStore::new(self.layout).save(user_id, &user)?;
        let actions = compute_priority_actions(&user.profile);
        log_event(
            self.layout,
            Some(user_id),
            EventType::OnboardingCompleted,
            json!({
                "source": source.as_str(),
                "priority_ids": actions.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(),
            }),
        )?;
        Ok(OnboardingOutcome {
            user,
            actions,
            source,
        })
    }

    /// Finishes a completed flow.
    pub fn complete_flow(
        &self,
        user_id: &str,
        flow: OnboardingFlow,
        gateway: Option<&dyn LlmGateway>,
        today: NaiveDate,
    ) -> Result<OnboardingOutcome> {
        let (form, transcript) = flow.finalize()?;
        self.complete(user_id, form, transcript, gateway, today)
    }
}

fn is_unknown(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(UNKNOWN_FIELD)
}

fn local_welcome(form: &OnboardingForm) -> String {
    match form.name.trim() {
        "" => "Welcome. We're here to support you.".into(),
        name => format!("Welcome, {name}. We're here to support you."),
    }
}
