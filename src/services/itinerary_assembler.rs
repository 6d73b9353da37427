use chrono::Utc;

use crate::error::ItineraryError;
use crate::models::itinerary::{BudgetEstimate, Itinerary, RouteSummary};
use crate::models::place::{Coordinate, Place};

pub struct ItineraryAssembler;

impl ItineraryAssembler {
    /// Travel metrics must be finite and non-negative.
    pub fn metrics_valid(distance_m: f64, duration_s: f64) -> bool {
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        valid(distance_m) && valid(duration_s)
    }

    /// Combine the sequenced places, route metrics and budget into an itinerary.
    ///
    /// An empty sequence is `NoPlacesFound`. Route metrics must be finite and
    /// non-negative.
    pub fn assemble(
        user_id: &str,
        city: &str,
        interests: &[String],
        start: Coordinate,
        places: Vec<Place>,
        route: RouteSummary,
        budget: BudgetEstimate,
    ) -> Result<Itinerary, ItineraryError> {
        if places.is_empty() {
            return Err(ItineraryError::NoPlacesFound {
                city: city.to_string(),
                interests: interests.to_vec(),
            });
        }

        if !Self::metrics_valid(route.total_distance_m, route.total_duration_s) {
            return Err(ItineraryError::collaborator(
                "route",
                format!(
                    "invalid route metrics: {} m, {} s",
                    route.total_distance_m, route.total_duration_s
                ),
            ));
        }

        let now = Utc::now();
        let city = city.trim();
        let name = if city.is_empty() {
            format!("Trip {}", now.format("%m/%d/%Y"))
        } else {
            format!("Trip in {}", city)
        };

        Ok(Itinerary {
            id: None,
            user_id: user_id.to_string(),
            name,
            city: city.to_string(),
            interests: interests.to_vec(),
            start,
            places,
            total_distance_m: route.total_distance_m,
            total_duration_s: route.total_duration_s,
            polyline: route.polyline,
            budget,
            favorite: false,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }
}
