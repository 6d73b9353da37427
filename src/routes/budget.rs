use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::ItineraryError;
use crate::models::place::Place;
use crate::models::search::PlacesPayload;
use crate::routes::AppState;
use crate::services::budget_estimator::BudgetEstimator;
use crate::services::maps_link::maps_link as build_maps_link;
use crate::services::place_normalizer::PlaceNormalizer;

fn places_from(state: &AppState, payload: PlacesPayload) -> Result<Vec<Place>, ItineraryError> {
    let max = state.builder.config().max_total_places;
    let places = PlaceNormalizer::normalize(&payload.places, None, max)?;
    Ok(PlaceNormalizer::merge(vec![places], max))
}

/*
    /api/budget/estimate
*/
pub async fn estimate(
    state: web::Data<AppState>,
    body: web::Json<PlacesPayload>,
) -> Result<HttpResponse, ItineraryError> {
    let places = places_from(&state, body.into_inner())?;
    let budget = BudgetEstimator::estimate(&places, &state.builder.config().budget_table);
    Ok(HttpResponse::Ok().json(budget))
}

/*
    /api/maps-link
*/
pub async fn maps_link(
    state: web::Data<AppState>,
    body: web::Json<PlacesPayload>,
) -> Result<HttpResponse, ItineraryError> {
    let places = places_from(&state, body.into_inner())?;
    let url = build_maps_link(&places)?;
    Ok(HttpResponse::Ok().json(json!({ "maps_url": url })))
}
