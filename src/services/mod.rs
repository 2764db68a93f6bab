//! Clients for the hosted services Compass depends on.
//!
//! Each service sits behind a small trait so flows can be exercised with
//! scripted fakes; the HTTP implementations are blocking `reqwest` clients.

pub mod llm;
pub mod places;

pub use llm::{
    chat_reply, coach_feedback, generate_profile_from_transcript, try_coach_feedback,
    AnthropicGateway, ChatMessage, ChatRole, CompletionRequest, LlmGateway, ProfileResult,
    COACH_FALLBACK,
};
pub use places::{
    distance_miles, format_distance, Coordinates, GooglePlacesGateway, LocationFromZip,
    LocationResources, NearbyResources, PlaceCategory, PlaceQuery, PlaceResource, PlacesGateway,
    PlacesService,
};

/// Bytes of an error body kept in error messages.
const ERROR_BODY_PREVIEW: usize = 512;

/// Failures talking to a hosted service.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("No API key configured for {service}")]
    MissingApiKey { service: &'static str },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} returned no usable content")]
    EmptyResponse { service: &'static str },

    #[error("Invalid response from {service}: {reason}")]
    InvalidResponse {
        service: &'static str,
        reason: String,
    },
}

pub(crate) fn truncate_for_preview(text: &str) -> String {
    if text.len() <= ERROR_BODY_PREVIEW {
        return text.to_string();
    }
    let mut end = ERROR_BODY_PREVIEW;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
