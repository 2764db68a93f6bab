use chrono::NaiveDate;
use compass::profiles::OnboardingForm;
use compass::services::{
    CompletionRequest, Coordinates, GatewayError, LlmGateway, PlaceQuery, PlacesGateway,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Language model fake that replays queued replies and records requests.
#[derive(Clone, Default)]
pub struct ScriptedLlm {
    replies: Arc<Mutex<VecDeque<Option<String>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Some(text.to_string()));
        self
    }

    /// Queues a failed call.
    pub fn outage(self) -> Self {
        self.replies.lock().unwrap().push_back(None);
        self
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl LlmGateway for ScriptedLlm {
    fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(Some(text)) => Ok(text),
            _ => Err(GatewayError::Status {
                service: "scripted",
                status: 529,
                body: "overloaded".into(),
            }),
        }
    }
}

/// Places fake that knows a single zip code.
#[derive(Clone)]
pub struct FixturePlaces {
    pub zip_code: &'static str,
    pub country: &'static str,
}

impl PlacesGateway for FixturePlaces {
    fn geocode(&self, zip_code: &str) -> Result<Option<Value>, GatewayError> {
        if zip_code != self.zip_code {
            return Ok(None);
        }
        Ok(Some(json!({
            "geometry": { "location": { "lat": 37.3382, "lng": -121.8863 } },
            "address_components": [
                { "long_name": "San Jose", "short_name": "San Jose", "types": ["locality"] },
                { "long_name": "California", "short_name": "CA", "types": ["administrative_area_level_1"] },
                { "long_name": "United States", "short_name": self.country, "types": ["country"] }
            ]
        })))
    }

    fn text_search(
        &self,
        query: &PlaceQuery,
        origin: Coordinates,
    ) -> Result<Vec<Value>, GatewayError> {
        Ok(vec![json!({
            "name": format!("Nearest {}", query.text),
            "formatted_address": "100 N First St",
            "place_id": format!("{}-1", query.text.replace(' ', "-")),
            "geometry": { "location": { "lat": origin.lat + 0.02, "lng": origin.lng } }
        })])
    }

    fn place_phone(&self, _place_id: &str) -> Result<Option<String>, GatewayError> {
        Ok(None)
    }
}

pub const PROFILE_REPLY: &str = r#"{
  "housing_status": "Unstable - staying with a friend",
  "has_id": false,
  "has_healthcare": true,
  "education_level": "in high school",
  "food_secure": false,
  "wellbeing_score": 2,
  "zip_code": "unknown",
  "state": "California",
  "legal_gaps": ["Birth certificate", "Social Security card"]
}
WELCOME_SUMMARY:
You're taking a big step by being here. We'll start with your ID and food, one thing at a time."#;

pub fn form() -> OnboardingForm {
    OnboardingForm {
        name: "Robin".into(),
        birthday: "07/04/2006".into(),
        zip_code: "95112".into(),
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
}
