//! Hosted language model gateway (Anthropic Messages API, direct HTTP).
//!
//! Three flows use the model: turning an onboarding transcript into a
//! `UserProfile` plus a welcome summary, the conversational assistant, and
//! short coach replies for wellbeing check-ins.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{truncate_for_preview, GatewayError};
use crate::profiles::UserProfile;
use crate::workspace::LlmSettings;

const SERVICE: &str = "anthropic";
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Separates the profile JSON from the welcome summary in onboarding replies.
pub const WELCOME_MARKER: &str = "WELCOME_SUMMARY:";
pub const DEFAULT_WELCOME: &str = "Welcome. We're here to support you.";
pub const COACH_FALLBACK: &str =
    "You're doing a good job checking in with yourself. Be kind to yourself today.";

const PROFILE_SYSTEM_PROMPT: &str = "You support young people aging out of foster care. \
You will receive the transcript of an onboarding conversation. Reply with two parts.\n\n\
First, a single JSON object with exactly these keys: housing_status (string), has_id (boolean), \
has_healthcare (boolean), education_level (string), food_secure (boolean), \
wellbeing_score (integer 1-5), zip_code (string, \"unknown\" if not given), \
state (string, inferred from the zip code when possible), \
legal_gaps (array of strings naming missing documents or rights to address). \
When something is unclear pick a cautious default, for example has_id false.\n\n\
Second, after the line WELCOME_SUMMARY:, write three or four warm sentences in the second \
person reflecting what you learned.";

const COACH_SYSTEM_PROMPT: &str = "You are a gentle coach for a young person, often a former \
foster youth, who is sharing how they feel in a short daily check-in. Answer in two to four \
sentences: acknowledge the feeling, offer brief encouragement or a small reframe, stay hopeful. \
No lists, no labels, no lectures.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Provider-neutral completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

/// A hosted model that turns a request into reply text.
pub trait LlmGateway: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError>;

    /// Token budget for regular replies.
    fn max_tokens(&self) -> u32 {
        1024
    }

    /// Token budget for coach replies.
    fn coach_max_tokens(&self) -> u32 {
        256
    }
}

/// Profile and welcome narrative derived from an onboarding transcript.
#[derive(Debug, Clone)]
pub struct ProfileResult {
    pub profile: UserProfile,
    pub welcome_summary: String,
}

pub fn generate_profile_from_transcript(
    gateway: &dyn LlmGateway,
    transcript: &str,
) -> Result<ProfileResult, GatewayError> {
    let request = CompletionRequest {
        system: PROFILE_SYSTEM_PROMPT.to_string(),
        messages: vec![ChatMessage::user(format!(
            "Transcript of onboarding conversation:\n\n{transcript}"
        ))],
        max_tokens: gateway.max_tokens(),
    };
    let text = gateway.complete(&request)?;
    parse_profile_reply(&text)
}

/// Splits an onboarding reply into the profile JSON and the welcome summary.
pub fn parse_profile_reply(text: &str) -> Result<ProfileResult, GatewayError> {
    if text.trim().is_empty() {
        return Err(GatewayError::EmptyResponse { service: SERVICE });
    }
    let (json_part, summary) = match text.find(WELCOME_MARKER) {
        Some(index) => (
            text[..index].trim(),
            text[index + WELCOME_MARKER.len()..].trim(),
        ),
        None => (text, ""),
    };
    let json_str = match (json_part.find('{'), json_part.rfind('}')) {
        (Some(start), Some(end)) if start < end => &json_part[start..=end],
        _ => json_part,
    };
    let invalid = |e: serde_json::Error| GatewayError::InvalidResponse {
        service: SERVICE,
        reason: format!("profile JSON: {e}. Raw: {}", truncate_for_preview(json_str)),
    };
    let mut raw: serde_json::Value = serde_json::from_str(json_str).map_err(invalid)?;
    // Null and missing keys both fall back to the profile defaults.
    if let Some(fields) = raw.as_object_mut() {
        fields.retain(|_, value| !value.is_null());
    }
    let profile: UserProfile = serde_json::from_value(raw).map_err(invalid)?;
    let welcome_summary = if summary.is_empty() {
        DEFAULT_WELCOME.to_string()
    } else {
        summary.to_string()
    };
    Ok(ProfileResult {
        profile,
        welcome_summary,
    })
}

/// Conversational assistant reply, personalized with `system_context`.
pub fn chat_reply(
    gateway: &dyn LlmGateway,
    message: &str,
    system_context: &str,
    history: &[ChatMessage],
) -> Result<String, GatewayError> {
    let system = format!(
        "You are a warm, supportive assistant for young people aging out of foster care. \
         What you know about the user:\n\n{system_context}\n\nBe concise, kind, and practical."
    );
    let mut messages = history.to_vec();
    messages.push(ChatMessage::user(message));
    gateway.complete(&CompletionRequest {
        system,
        messages,
        max_tokens: gateway.max_tokens(),
    })
}

/// Coach reply for a check-in message, as a `Result`.
pub fn try_coach_feedback(gateway: &dyn LlmGateway, message: &str) -> Result<String, GatewayError> {
    let text = gateway.complete(&CompletionRequest {
        system: COACH_SYSTEM_PROMPT.to_string(),
        messages: vec![ChatMessage::user(message)],
        max_tokens: gateway.coach_max_tokens(),
    })?;
    if text.trim().is_empty() {
        return Err(GatewayError::EmptyResponse { service: SERVICE });
    }
    Ok(text.trim().to_string())
}

/// Coach reply that never fails; falls back to a fixed encouragement.
pub fn coach_feedback(gateway: &dyn LlmGateway, message: &str) -> String {
    match try_coach_feedback(gateway, message) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(error = %err, "coach reply unavailable, using fallback");
            COACH_FALLBACK.to_string()
        }
    }
}

/// Blocking Anthropic Messages API client.
pub struct AnthropicGateway {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    coach_max_tokens: u32,
}

impl AnthropicGateway {
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, GatewayError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(GatewayError::MissingApiKey { service: SERVICE })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        let base_url = settings
            .base_url
            .as_deref()
            .unwrap_or(ANTHROPIC_API_URL)
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            client,
            api_key,
            model: settings.model.clone(),
            base_url,
            max_tokens: settings.max_tokens,
            coach_max_tokens: settings.coach_max_tokens,
        })
    }

    fn api_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

impl LlmGateway for AnthropicGateway {
    fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let body = AnthropicRequest {
            model: &self.model,
            system: &request.system,
            max_tokens: request.max_tokens,
            messages: request
                .messages
                .iter()
                .map(|m| AnthropicMessage {
                    role: m.role,
                    content: &m.content,
                })
                .collect(),
        };
        let url = self.api_url();
        tracing::debug!(%url, messages = body.messages.len(), "sending completion request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&body)
            .send()?;
        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(GatewayError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body: truncate_for_preview(&text),
            });
        }
        let parsed: AnthropicResponse =
            serde_json::from_str(&text).map_err(|e| GatewayError::InvalidResponse {
                service: SERVICE,
                reason: format!("{e}. Raw: {}", truncate_for_preview(&text)),
            })?;
        first_text_block(&parsed).ok_or(GatewayError::EmptyResponse { service: SERVICE })
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    fn coach_max_tokens(&self) -> u32 {
        self.coach_max_tokens
    }
}

// --- Anthropic Messages API types ---

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    system: &'a str,
    max_tokens: u32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: ChatRole,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicResponseBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum AnthropicResponseBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

fn first_text_block(response: &AnthropicResponse) -> Option<String> {
    response.content.iter().find_map(|block| match block {
        AnthropicResponseBlock::Text { text } if !text.is_empty() => Some(text.clone()),
        _ => None,
    })
}
