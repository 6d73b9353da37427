use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::info;
use serde_json::json;

use crate::error::ItineraryError;
use crate::models::itinerary::{Itinerary, ItineraryResponse};
use crate::models::search::{BuildRequest, FavoriteUpdate, ListQuery, PlanRequest, TagsUpdate};
use crate::routes::AppState;
use crate::services::budget_estimator::BudgetEstimator;
use crate::services::itinerary_assembler::ItineraryAssembler;

const DEFAULT_LIST_LIMIT: i64 = 20;
const MAX_LIST_LIMIT: i64 = 100;

async fn respond(
    state: &AppState,
    mut itinerary: Itinerary,
    save: bool,
) -> Result<HttpResponse, ItineraryError> {
    if save {
        let id = state.store.save(&itinerary).await?;
        itinerary = state.store.get(&id).await?;
    }
    Ok(HttpResponse::Ok().json(ItineraryResponse::from(itinerary)))
}

/*
    /api/itineraries/plan
*/
pub async fn plan(
    state: web::Data<AppState>,
    body: web::Json<PlanRequest>,
) -> Result<HttpResponse, ItineraryError> {
    let request = body.into_inner();
    let intent = state.intent.extract_intent(&request.prompt).await?;
    info!(
        "Planning trip in {} for {} ({} interests)",
        intent.city,
        request.user_id,
        intent.interests.len()
    );

    let itinerary = state.builder.plan(&request.user_id, &intent).await?;
    respond(&state, itinerary, request.save).await
}

/*
    /api/itineraries/build
*/
pub async fn build(
    state: web::Data<AppState>,
    body: web::Json<BuildRequest>,
) -> Result<HttpResponse, ItineraryError> {
    let request = body.into_inner();
    let itinerary = state
        .builder
        .build_from_candidates(
            &request.user_id,
            &request.city,
            &request.interests,
            &request.places,
            request.start,
        )
        .await?;
    respond(&state, itinerary, request.save).await
}

/*
    /api/itineraries (POST)
*/
pub async fn save(
    state: web::Data<AppState>,
    body: web::Json<Itinerary>,
) -> Result<HttpResponse, ItineraryError> {
    let mut itinerary = body.into_inner();
    if itinerary.places.is_empty() {
        return Err(ItineraryError::invalid_input(
            "an itinerary needs at least one place",
        ));
    }
    if !ItineraryAssembler::metrics_valid(itinerary.total_distance_m, itinerary.total_duration_s) {
        return Err(ItineraryError::invalid_input(
            "route distance and duration must be finite and non-negative",
        ));
    }
    // The budget is derived from the places, never taken from the client.
    itinerary.budget =
        BudgetEstimator::estimate(&itinerary.places, &state.builder.config().budget_table);
    itinerary.id = None;
    let now = Utc::now();
    itinerary.created_at = now;
    itinerary.updated_at = now;
    let id = state.store.save(&itinerary).await?;
    Ok(HttpResponse::Created().json(json!({ "id": id })))
}

/*
    /api/itineraries?user_id=&limit=
*/
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ItineraryError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);
    let itineraries = state.store.list(&query.user_id, limit).await?;
    let response: Vec<ItineraryResponse> =
        itineraries.into_iter().map(ItineraryResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/*
    /api/itineraries/{id}
*/
pub async fn get_by_id(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ItineraryError> {
    let itinerary = state.store.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ItineraryResponse::from(itinerary)))
}

pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ItineraryError> {
    state.store.delete(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/*
    /api/itineraries/{id}/favorite
*/
pub async fn set_favorite(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<FavoriteUpdate>,
) -> Result<HttpResponse, ItineraryError> {
    let id = path.into_inner();
    state.store.set_favorite(&id, body.favorite).await?;
    let itinerary = state.store.get(&id).await?;
    Ok(HttpResponse::Ok().json(ItineraryResponse::from(itinerary)))
}

/*
    /api/itineraries/{id}/tags
*/
pub async fn set_tags(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<TagsUpdate>,
) -> Result<HttpResponse, ItineraryError> {
    let id = path.into_inner();
    let mut tags: Vec<String> = Vec::new();
    for tag in body.into_inner().tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    state.store.set_tags(&id, tags).await?;
    let itinerary = state.store.get(&id).await?;
    Ok(HttpResponse::Ok().json(ItineraryResponse::from(itinerary)))
}
