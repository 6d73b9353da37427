//! Google Routes API client
//!
//! Implements [`RouteCalculator`] with one `computeRoutes` call per itinerary.
//! The visiting order is fixed by the sequencer, so waypoint optimization is
//! left off: the first coordinate is the origin, the last the destination.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ItineraryError;
use crate::models::itinerary::RouteSummary;
use crate::models::place::Coordinate;
use crate::services::interface::RouteCalculator;

const ROUTES_URL: &str = "https://routes.googleapis.com/directions/v2:computeRoutes";
const FIELD_MASK: &str = "routes.duration,routes.distanceMeters,routes.polyline.encodedPolyline,routes.legs.distanceMeters,routes.legs.duration,routes.legs.polyline.encodedPolyline";
const SERVICE: &str = "google routes";

#[derive(Debug, Deserialize)]
struct ComputeRoutesResponse {
    #[serde(default)]
    routes: Vec<RouteBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteBody {
    distance_meters: Option<f64>,
    duration: Option<String>,
    polyline: Option<EncodedPolyline>,
    #[serde(default)]
    legs: Vec<LegBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegBody {
    #[serde(default)]
    distance_meters: f64,
    duration: Option<String>,
    polyline: Option<EncodedPolyline>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EncodedPolyline {
    #[serde(default)]
    encoded_polyline: String,
}

#[derive(Clone)]
pub struct GoogleRoutesService {
    http_client: reqwest::Client,
    api_key: String,
    url: String,
}

impl GoogleRoutesService {
    pub fn new(api_key: String) -> Result<Self, ItineraryError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            url: ROUTES_URL.to_string(),
        })
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    fn waypoint(c: &Coordinate) -> Value {
        json!({ "location": { "latLng": { "latitude": c.lat, "longitude": c.lng } } })
    }

    fn request_body(ordered: &[Coordinate]) -> Result<Value, ItineraryError> {
        let (origin, destination) = match ordered {
            [origin, .., destination] => (origin, destination),
            _ => {
                return Err(ItineraryError::invalid_input(
                    "a route needs at least two coordinates",
                ))
            }
        };

        let mut body = json!({
            "origin": Self::waypoint(origin),
            "destination": Self::waypoint(destination),
            "travelMode": "DRIVE",
            "routingPreference": "TRAFFIC_AWARE",
            "computeAlternativeRoutes": false,
            "optimizeWaypointOrder": false,
            "languageCode": "en-US",
            "units": "METRIC"
        });

        let intermediates: Vec<Value> = ordered[1..ordered.len() - 1]
            .iter()
            .map(Self::waypoint)
            .collect();
        if !intermediates.is_empty() {
            body["intermediates"] = Value::Array(intermediates);
        }

        Ok(body)
    }

    /// Routes API durations look like `"1234s"`.
    fn parse_duration(raw: &str) -> Option<f64> {
        raw.trim().trim_end_matches('s').parse::<f64>().ok()
    }

    fn summarize(response: ComputeRoutesResponse) -> Result<RouteSummary, ItineraryError> {
        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| ItineraryError::collaborator(SERVICE, "no routes found"))?;

        let (total_distance_m, total_duration_s) = if route.legs.is_empty() {
            let distance = route.distance_meters;
            let duration = route.duration.as_deref().and_then(Self::parse_duration);
            match (distance, duration) {
                (Some(d), Some(t)) => (d, t),
                _ => {
                    return Err(ItineraryError::collaborator(
                        SERVICE,
                        "route has no legs and no total distance or duration",
                    ))
                }
            }
        } else {
            let mut totals = (0.0, 0.0);
            for leg in &route.legs {
                let leg_duration = leg
                    .duration
                    .as_deref()
                    .and_then(Self::parse_duration)
                    .ok_or_else(|| {
                        ItineraryError::collaborator(SERVICE, "route leg is missing its duration")
                    })?;
                totals.0 += leg.distance_meters;
                totals.1 += leg_duration;
            }
            totals
        };

        let polyline = match route.polyline {
            Some(p) if !p.encoded_polyline.is_empty() => p.encoded_polyline,
            _ => route
                .legs
                .iter()
                .filter_map(|leg| leg.polyline.as_ref())
                .map(|p| p.encoded_polyline.as_str())
                .collect::<String>(),
        };

        Ok(RouteSummary {
            total_distance_m,
            total_duration_s,
            polyline,
        })
    }
}

#[async_trait]
impl RouteCalculator for GoogleRoutesService {
    async fn compute_route(&self, ordered: &[Coordinate]) -> Result<RouteSummary, ItineraryError> {
        let body = Self::request_body(ordered)?;
        debug!("Requesting route through {} stops", ordered.len());

        let response = self
            .http_client
            .post(&self.url)
            .header("X-Goog-Api-Key", self.api_key.as_str())
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload: Value = response.json().await?;
        if !status.is_success() {
            let message = payload
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(ItineraryError::collaborator(
                SERVICE,
                format!("{}: {}", status, message),
            ));
        }

        let parsed: ComputeRoutesResponse = serde_json::from_value(payload)
            .map_err(|e| ItineraryError::collaborator(SERVICE, e.to_string()))?;
        Self::summarize(parsed)
    }
}
