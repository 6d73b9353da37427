use async_trait::async_trait;
use serde_json::Value;

use crate::error::ItineraryError;
use crate::models::itinerary::{Itinerary, RouteSummary};
use crate::models::place::Coordinate;
use crate::models::search::TravelIntent;

/// Free text in, `{city, interests}` out.
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    async fn extract_intent(&self, text: &str) -> Result<TravelIntent, ItineraryError>;
}

#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Raw provider records for one interest. An empty array is a valid answer.
    async fn search_places(&self, city: &str, interest: &str) -> Result<Value, ItineraryError>;

    /// Geocoded city center, if the provider knows the city.
    async fn city_center(&self, city: &str) -> Result<Option<Coordinate>, ItineraryError>;
}

#[async_trait]
pub trait RouteCalculator: Send + Sync {
    /// Called once per assembled sequence, in visiting order.
    async fn compute_route(&self, ordered: &[Coordinate]) -> Result<RouteSummary, ItineraryError>;
}

#[async_trait]
pub trait ItineraryStore: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn save(&self, itinerary: &Itinerary) -> Result<String, ItineraryError>;
    async fn get(&self, id: &str) -> Result<Itinerary, ItineraryError>;
    async fn list(&self, user_id: &str, limit: i64) -> Result<Vec<Itinerary>, ItineraryError>;
    async fn delete(&self, id: &str) -> Result<(), ItineraryError>;
    async fn set_favorite(&self, id: &str, favorite: bool) -> Result<(), ItineraryError>;
    async fn set_tags(&self, id: &str, tags: Vec<String>) -> Result<(), ItineraryError>;
}
