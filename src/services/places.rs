//! Zip-code geocoding and nearby resource lookups (Google Geocoding + Places).
//!
//! The gateway returns raw JSON results; `PlacesService` owns the parsing,
//! distance math and category fan-out so they can be tested without a network.

use rayon::prelude::*;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::{truncate_for_preview, GatewayError};
use crate::workspace::PlacesSettings;

const SERVICE: &str = "google_maps";
const GOOGLE_MAPS_API_URL: &str = "https://maps.googleapis.com/maps/api";

/// Mean Earth radius in miles.
const EARTH_RADIUS_MI: f64 = 3959.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Result of geocoding a zip code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationFromZip {
    pub lat: f64,
    pub lng: f64,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub country: String,
    pub is_us: bool,
}

impl LocationFromZip {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// A nearby point of interest with a display distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResource {
    pub name: String,
    pub address: String,
    /// `"<0.1 mi"`, `"2.4 mi"`, or empty when the result had no coordinates.
    pub distance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceCategory {
    FoodBank,
    Shelter,
    HealthCenter,
    LegalAid,
    Clothing,
    MentalHealth,
}

/// Text search parameters for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceQuery {
    pub text: &'static str,
    pub place_type: Option<&'static str>,
}

impl PlaceCategory {
    pub fn query(&self) -> PlaceQuery {
        let (text, place_type) = match self {
            PlaceCategory::FoodBank => ("food bank", Some("food_bank")),
            PlaceCategory::Shelter => ("homeless shelter", Some("lodging")),
            PlaceCategory::HealthCenter => ("FQHC community health center", Some("health")),
            PlaceCategory::LegalAid => ("free legal aid", None),
            PlaceCategory::Clothing => ("free clothing bank community closet", None),
            PlaceCategory::MentalHealth => ("youth mental health counseling", Some("health")),
        };
        PlaceQuery { text, place_type }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NearbyResources {
    pub food_banks: Vec<PlaceResource>,
    pub shelters: Vec<PlaceResource>,
    pub health_centers: Vec<PlaceResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationResources {
    pub food_banks: Vec<PlaceResource>,
    pub shelters: Vec<PlaceResource>,
    pub health_centers: Vec<PlaceResource>,
    pub legal_aid: Vec<PlaceResource>,
    pub clothing: Vec<PlaceResource>,
}

/// Raw access to the geocoding and places endpoints.
pub trait PlacesGateway: Send + Sync {
    /// First geocoding result for a zip code, if any.
    fn geocode(&self, zip_code: &str) -> Result<Option<Value>, GatewayError>;

    /// Text search results biased towards `origin`.
    fn text_search(&self, query: &PlaceQuery, origin: Coordinates)
        -> Result<Vec<Value>, GatewayError>;

    fn place_phone(&self, place_id: &str) -> Result<Option<String>, GatewayError>;
}

impl<G: PlacesGateway + ?Sized> PlacesGateway for Box<G> {
    fn geocode(&self, zip_code: &str) -> Result<Option<Value>, GatewayError> {
        (**self).geocode(zip_code)
    }

    fn text_search(
        &self,
        query: &PlaceQuery,
        origin: Coordinates,
    ) -> Result<Vec<Value>, GatewayError> {
        (**self).text_search(query, origin)
    }

    fn place_phone(&self, place_id: &str) -> Result<Option<String>, GatewayError> {
        (**self).place_phone(place_id)
    }
}

pub struct PlacesService<G> {
    gateway: G,
    results_per_category: usize,
}

impl<G: PlacesGateway> PlacesService<G> {
    pub fn new(gateway: G, settings: &PlacesSettings) -> Self {
        Self {
            gateway,
            results_per_category: settings.results_per_category as usize,
        }
    }

    pub fn locate_zip(&self, zip_code: &str) -> Result<Option<LocationFromZip>, GatewayError> {
        let zip_code = zip_code.trim();
        if zip_code.is_empty() {
            return Ok(None);
        }
        Ok(self
            .gateway
            .geocode(zip_code)?
            .as_ref()
            .and_then(parse_geocode_result))
    }

    /// Food banks, shelters and health centers around a zip code.
    pub fn nearby_resources(&self, zip_code: &str) -> Result<NearbyResources, GatewayError> {
        let Some(location) = self.locate_zip(zip_code)? else {
            tracing::debug!(zip_code, "zip code did not geocode");
            return Ok(NearbyResources::default());
        };
        let mut found = self
            .search_categories(
                &[
                    PlaceCategory::FoodBank,
                    PlaceCategory::Shelter,
                    PlaceCategory::HealthCenter,
                ],
                location.coordinates(),
            )?
            .into_iter();
        Ok(NearbyResources {
            food_banks: found.next().unwrap_or_default(),
            shelters: found.next().unwrap_or_default(),
            health_centers: found.next().unwrap_or_default(),
        })
    }

    /// Every resource category for a geocoded location. US locations only.
    pub fn resources_for_location(
        &self,
        location: &LocationFromZip,
    ) -> Result<LocationResources, GatewayError> {
        if !location.is_us {
            return Ok(LocationResources::default());
        }
        let mut found = self
            .search_categories(
                &[
                    PlaceCategory::FoodBank,
                    PlaceCategory::Shelter,
                    PlaceCategory::HealthCenter,
                    PlaceCategory::LegalAid,
                    PlaceCategory::Clothing,
                ],
                location.coordinates(),
            )?
            .into_iter();
        Ok(LocationResources {
            food_banks: found.next().unwrap_or_default(),
            shelters: found.next().unwrap_or_default(),
            health_centers: found.next().unwrap_or_default(),
            legal_aid: found.next().unwrap_or_default(),
            clothing: found.next().unwrap_or_default(),
        })
    }

    pub fn mental_health_resources(
        &self,
        zip_code: &str,
    ) -> Result<Vec<PlaceResource>, GatewayError> {
        match self.locate_zip(zip_code)? {
            Some(location) if location.is_us => {
                self.search(PlaceCategory::MentalHealth, location.coordinates())
            }
            _ => Ok(Vec::new()),
        }
    }

    pub fn place_phone(&self, place_id: &str) -> Result<Option<String>, GatewayError> {
        self.gateway.place_phone(place_id)
    }

    pub fn search(
        &self,
        category: PlaceCategory,
        origin: Coordinates,
    ) -> Result<Vec<PlaceResource>, GatewayError> {
        let results = self.gateway.text_search(&category.query(), origin)?;
        Ok(results
            .iter()
            .take(self.results_per_category)
            .map(|raw| parse_place(raw, origin))
            .collect())
    }

    /// Searches several categories in parallel, preserving input order.
    fn search_categories(
        &self,
        categories: &[PlaceCategory],
        origin: Coordinates,
    ) -> Result<Vec<Vec<PlaceResource>>, GatewayError> {
        categories
            .par_iter()
            .map(|category| self.search(*category, origin))
            .collect()
    }
}

fn lat_lng(value: &Value) -> Option<Coordinates> {
    let location = value.get("geometry")?.get("location")?;
    Some(Coordinates {
        lat: location.get("lat")?.as_f64()?,
        lng: location.get("lng")?.as_f64()?,
    })
}

/// Parses one geocoding result. Returns `None` when it has no coordinates.
pub fn parse_geocode_result(result: &Value) -> Option<LocationFromZip> {
    let coordinates = lat_lng(result)?;
    let components = result
        .get("address_components")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let component = |kind: &str, key: &str| -> Option<String> {
        components
            .iter()
            .find(|c| {
                c.get("types")
                    .and_then(Value::as_array)
                    .is_some_and(|types| types.iter().any(|t| t.as_str() == Some(kind)))
            })
            .and_then(|c| c.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    let country = component("country", "short_name").unwrap_or_default();
    Some(LocationFromZip {
        lat: coordinates.lat,
        lng: coordinates.lng,
        city: component("locality", "long_name")
            .or_else(|| component("sublocality", "long_name"))
            .or_else(|| component("sublocality_level_1", "long_name")),
        county: component("administrative_area_level_2", "long_name"),
        state: component("administrative_area_level_1", "short_name")
            .or_else(|| component("administrative_area_level_1", "long_name")),
        is_us: country == "US",
        country,
    })
}

fn parse_place(raw: &Value, origin: Coordinates) -> PlaceResource {
    let distance = lat_lng(raw)
        .map(|to| format_distance(distance_miles(origin, to)))
        .unwrap_or_default();
    let text = |key: &str| raw.get(key).and_then(Value::as_str).map(str::to_string);
    PlaceResource {
        name: text("name").unwrap_or_else(|| "Unknown".into()),
        address: text("formatted_address").unwrap_or_default(),
        distance,
        phone: None,
        place_id: text("place_id"),
    }
}

/// Great-circle (haversine) distance in miles.
pub fn distance_miles(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MI * c
}

pub fn format_distance(miles: f64) -> String {
    if miles < 0.1 {
        "<0.1 mi".into()
    } else {
        format!("{miles:.1} mi")
    }
}

/// Blocking client for the Google Geocoding, Text Search and Place Details APIs.
pub struct GooglePlacesGateway {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GooglePlacesGateway {
    pub fn from_settings(settings: &PlacesSettings) -> Result<Self, GatewayError> {
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
            .unwrap_or(GOOGLE_MAPS_API_URL)
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    fn get(&self, path: &str, params: &[(&str, String)]) -> Result<MapsResponse, GatewayError> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(%url, "maps request");
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
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
        let parsed: MapsResponse =
            serde_json::from_str(&text).map_err(|e| GatewayError::InvalidResponse {
                service: SERVICE,
                reason: format!("{e}. Raw: {}", truncate_for_preview(&text)),
            })?;
        match parsed.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(parsed),
            other => Err(GatewayError::InvalidResponse {
                service: SERVICE,
                reason: format!(
                    "status {other}: {}",
                    parsed.error_message.as_deref().unwrap_or("no details")
                ),
            }),
        }
    }
}

impl PlacesGateway for GooglePlacesGateway {
    fn geocode(&self, zip_code: &str) -> Result<Option<Value>, GatewayError> {
        let response = self.get(
            "geocode/json",
            &[
                ("address", zip_code.to_string()),
                ("components", "country:US".to_string()),
            ],
        )?;
        Ok(response.results.into_iter().next())
    }

    fn text_search(
        &self,
        query: &PlaceQuery,
        origin: Coordinates,
    ) -> Result<Vec<Value>, GatewayError> {
        let mut params = vec![
            ("query", query.text.to_string()),
            ("location", format!("{},{}", origin.lat, origin.lng)),
        ];
        if let Some(place_type) = query.place_type {
            params.push(("type", place_type.to_string()));
        }
        Ok(self.get("place/textsearch/json", &params)?.results)
    }

    fn place_phone(&self, place_id: &str) -> Result<Option<String>, GatewayError> {
        let response = self.get(
            "place/details/json",
            &[
                ("place_id", place_id.to_string()),
                ("fields", "formatted_phone_number".to_string()),
            ],
        )?;
        Ok(response
            .result
            .as_ref()
            .and_then(|r| r.get("formatted_phone_number"))
            .and_then(Value::as_str)
            .map(str::to_string))
    }
}

#[derive(Debug, Deserialize)]
struct MapsResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    result: Option<Value>,
}
