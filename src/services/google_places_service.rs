//! Google Places / Geocoding client
//!
//! Implements [`PlaceSearch`] with the Places Text Search API
//! (`"<interest> in <city>"`) and the Geocoding API. Results are handed back as
//! raw JSON; typing happens in the normalizer.
//!
//! Requires `GOOGLE_MAPS_API_KEY` with Places and Geocoding enabled.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ItineraryError;
use crate::models::place::Coordinate;
use crate::services::interface::PlaceSearch;

const MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api";
const SERVICE: &str = "google places";

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<Value>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: GeocodeGeometry,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Clone)]
pub struct GooglePlacesService {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GooglePlacesService {
    pub fn new(api_key: String) -> Result<Self, ItineraryError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            base_url: MAPS_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn check_status(status: &str, error_message: Option<String>) -> Result<(), ItineraryError> {
        match status {
            "OK" | "ZERO_RESULTS" => Ok(()),
            other => Err(ItineraryError::collaborator(
                SERVICE,
                match error_message {
                    Some(msg) => format!("{}: {}", other, msg),
                    None => other.to_string(),
                },
            )),
        }
    }
}

#[async_trait]
impl PlaceSearch for GooglePlacesService {
    async fn search_places(&self, city: &str, interest: &str) -> Result<Value, ItineraryError> {
        let query = format!("{} in {}", interest, city);
        debug!("Places text search: {}", query);

        let response: TextSearchResponse = self
            .http_client
            .get(format!("{}/place/textsearch/json", self.base_url))
            .query(&[("query", query.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await?
            .json()
            .await?;

        Self::check_status(&response.status, response.error_message)?;
        Ok(Value::Array(response.results))
    }

    async fn city_center(&self, city: &str) -> Result<Option<Coordinate>, ItineraryError> {
        let response: GeocodeResponse = self
            .http_client
            .get(format!("{}/geocode/json", self.base_url))
            .query(&[("address", city), ("key", self.api_key.as_str())])
            .send()
            .await?
            .json()
            .await?;

        Self::check_status(&response.status, response.error_message)?;

        let center = response
            .results
            .first()
            .and_then(|r| Coordinate::new(r.geometry.location.lat, r.geometry.location.lng));
        if center.is_none() {
            warn!("Geocoding returned no usable location for '{}'", city);
        }
        Ok(center)
    }
}
