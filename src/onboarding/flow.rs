//! Phase tracking for the onboarding flow.
//!
//! A lightweight flow manager records the form and the optional transcript
//! so the profile step runs once with everything the user shared.

use anyhow::{bail, Result};

use crate::profiles::OnboardingForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingPhase {
    CollectingForm,
    CapturingTranscript,
    Summarizing,
    Completed,
}

#[derive(Debug, Clone)]
pub struct OnboardingFlow {
    state: OnboardingPhase,
    form: Option<OnboardingForm>,
    transcript: Option<String>,
}

impl Default for OnboardingFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl OnboardingFlow {
    pub fn new() -> Self {
        Self {
            state: OnboardingPhase::CollectingForm,
            form: None,
            transcript: None,
        }
    }

    pub fn phase(&self) -> OnboardingPhase {
        self.state
    }

    pub fn submit_form(&mut self, form: OnboardingForm) -> Result<()> {
        if self.state != OnboardingPhase::CollectingForm {
            bail!("The onboarding form was already submitted.");
        }
        if form.zip_code.trim().is_empty() {
            bail!("A zip code is required to find nearby resources.");
        }
        self.form = Some(form);
        self.state = OnboardingPhase::CapturingTranscript;
        Ok(())
    }

    /// Records what the user said. Empty transcripts are treated as skipped.
    pub fn record_transcript(&mut self, transcript: impl Into<String>) -> Result<()> {
        if self.state != OnboardingPhase::CapturingTranscript {
            bail!("Transcripts can only be recorded after the form and before summarizing.");
        }
        let transcript = transcript.into();
        if !transcript.trim().is_empty() {
            self.transcript = Some(transcript);
        }
        self.state = OnboardingPhase::Summarizing;
        Ok(())
    }

    pub fn advance(&mut self) {
        self.state = match self.state {
            OnboardingPhase::CollectingForm => OnboardingPhase::CollectingForm,
            OnboardingPhase::CapturingTranscript => OnboardingPhase::Summarizing,
            OnboardingPhase::Summarizing => OnboardingPhase::Completed,
            OnboardingPhase::Completed => OnboardingPhase::Completed,
        };
    }

    /// Hands back the collected inputs once the form exists.
    pub fn finalize(mut self) -> Result<(OnboardingForm, Option<String>)> {
        let Some(form) = self.form.take() else {
            bail!("Onboarding cannot finish before the form is submitted.");
        };
        self.state = OnboardingPhase::Completed;
        Ok((form, self.transcript))
    }
}
