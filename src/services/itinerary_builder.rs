//! Itinerary Builder
//!
//! Runs the whole pipeline for one request:
//! search -> normalize -> city filter -> cluster -> sequence -> route -> budget -> assemble.
//!
//! External calls go through the injected collaborator traits, so the builder
//! holds no global state and can be driven entirely by test doubles. Failures
//! from collaborators are passed through untouched; retries are their concern.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info};
use serde_json::Value;

use crate::config::PipelineConfig;
use crate::error::ItineraryError;
use crate::models::itinerary::{Itinerary, RouteSummary};
use crate::models::place::{Coordinate, Place};
use crate::models::search::TravelIntent;
use crate::services::budget_estimator::BudgetEstimator;
use crate::services::interface::{PlaceSearch, RouteCalculator};
use crate::services::itinerary_assembler::ItineraryAssembler;
use crate::services::place_normalizer::PlaceNormalizer;
use crate::services::route_sequencer::RouteSequencer;
use crate::services::spatial_clusterer::SpatialClusterer;

pub struct ItineraryBuilder {
    place_search: Arc<dyn PlaceSearch>,
    route_calculator: Arc<dyn RouteCalculator>,
    config: PipelineConfig,
}

impl ItineraryBuilder {
    pub fn new(
        place_search: Arc<dyn PlaceSearch>,
        route_calculator: Arc<dyn RouteCalculator>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            place_search,
            route_calculator,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Build an itinerary from an extracted intent, searching each interest.
    pub async fn plan(
        &self,
        user_id: &str,
        intent: &TravelIntent,
    ) -> Result<Itinerary, ItineraryError> {
        let city = intent.city.trim();
        if city.is_empty() {
            return Err(ItineraryError::invalid_input("city is required"));
        }
        let interests = clean_interests(&intent.interests);
        if interests.is_empty() {
            return Err(ItineraryError::invalid_input(
                "at least one interest is required",
            ));
        }

        let center = self.place_search.city_center(city).await?;
        if center.is_none() {
            info!("No geocode for '{}', starting from the first place", city);
        }

        let mut batches = Vec::with_capacity(interests.len());
        for interest in &interests {
            let raw = self.place_search.search_places(city, interest).await?;
            let places = PlaceNormalizer::normalize(
                &raw,
                Some(interest),
                self.config.max_places_per_interest,
            )
            .map_err(|e| ItineraryError::collaborator("place search", e.to_string()))?;
            info!("Found {} places for '{}' in {}", places.len(), interest, city);
            batches.push(places);
        }

        let candidates = PlaceNormalizer::merge(batches, self.config.max_total_places);
        self.finish(user_id, city, &interests, candidates, None, center)
            .await
    }

    /// Build from candidate records the caller already has, e.g. a subset
    /// picked from an earlier search.
    pub async fn build_from_candidates(
        &self,
        user_id: &str,
        city: &str,
        interests: &[String],
        raw_places: &Value,
        start: Option<Coordinate>,
    ) -> Result<Itinerary, ItineraryError> {
        let city = city.trim();
        let interests = clean_interests(interests);

        // Unlabelled records share one bucket, so it gets the allowance of
        // every requested interest.
        let cap = self.config.max_places_per_interest * interests.len().max(1);
        let normalized = PlaceNormalizer::normalize(raw_places, None, cap)?;
        let candidates = PlaceNormalizer::merge(vec![normalized], self.config.max_total_places);

        let center = if start.is_none() && !city.is_empty() {
            self.place_search.city_center(city).await?
        } else {
            None
        };

        self.finish(user_id, city, &interests, candidates, start, center)
            .await
    }

    async fn finish(
        &self,
        user_id: &str,
        city: &str,
        interests: &[String],
        candidates: Vec<Place>,
        start: Option<Coordinate>,
        city_center: Option<Coordinate>,
    ) -> Result<Itinerary, ItineraryError> {
        let places = match city_center {
            Some(center) => self.within_city(candidates, center),
            None => candidates,
        };

        let Some(first) = places.first() else {
            return Err(ItineraryError::NoPlacesFound {
                city: city.to_string(),
                interests: interests.to_vec(),
            });
        };
        let start = start.or(city_center).unwrap_or(first.location);

        let clusters = SpatialClusterer::cluster(places, self.config.cluster_radius_km);
        info!("Grouped candidates into {} clusters", clusters.len());

        let ordered = RouteSequencer::sequence(clusters, start);

        let route = if ordered.len() < 2 {
            RouteSummary::stationary()
        } else {
            let coords: Vec<Coordinate> = ordered.iter().map(|p| p.location).collect();
            self.route_calculator.compute_route(&coords).await?
        };
        info!(
            "Route through {} places: {:.0} m, {:.0} s",
            ordered.len(),
            route.total_distance_m,
            route.total_duration_s
        );

        let budget = BudgetEstimator::estimate(&ordered, &self.config.budget_table);

        ItineraryAssembler::assemble(user_id, city, interests, start, ordered, route, budget)
    }

    fn within_city(&self, places: Vec<Place>, center: Coordinate) -> Vec<Place> {
        let limit_m = self.config.city_radius_km * 1000.0;
        places
            .into_iter()
            .filter(|p| {
                let d = center.distance_m(&p.location);
                if d > limit_m {
                    debug!("Filtered out '{}' ({:.1} km from center)", p.name, d / 1000.0);
                }
                d <= limit_m
            })
            .collect()
    }
}

/// Trimmed, non-empty, case-insensitively unique interests in input order.
fn clean_interests(interests: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    interests
        .iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty() && seen.insert(i.to_lowercase()))
        .collect()
}
