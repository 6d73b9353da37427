use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::place::{Coordinate, Place};

/// Result of the route collaborator for a fixed visiting order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub total_distance_m: f64,
    pub total_duration_s: f64,
    #[serde(default)]
    pub polyline: String,
}

impl RouteSummary {
    /// A route with a single stop travels nowhere.
    pub fn stationary() -> Self {
        Self {
            total_distance_m: 0.0,
            total_duration_s: 0.0,
            polyline: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetEstimate {
    pub breakdown: BTreeMap<String, f64>,
    pub total: f64,
    pub currency: String,
}

impl BudgetEstimate {
    /// The total is derived here and nowhere else.
    pub fn from_breakdown(breakdown: BTreeMap<String, f64>) -> Self {
        let total = breakdown.values().sum();
        Self {
            breakdown,
            total,
            currency: "USD".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub name: String,
    pub city: String,
    pub interests: Vec<String>,
    pub start: Coordinate,
    /// Visiting order.
    pub places: Vec<Place>,
    pub total_distance_m: f64,
    pub total_duration_s: f64,
    #[serde(default)]
    pub polyline: String,
    pub budget: BudgetEstimate,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Serialized form handed back to HTTP callers, with the id as a hex string.
#[derive(Debug, Clone, Serialize)]
pub struct ItineraryResponse {
    pub id: Option<String>,
    #[serde(flatten)]
    pub itinerary: Itinerary,
}

impl From<Itinerary> for ItineraryResponse {
    fn from(mut itinerary: Itinerary) -> Self {
        Self {
            id: itinerary.id.take().map(|id| id.to_hex()),
            itinerary,
        }
    }
}
