use std::sync::Arc;

use actix_web::web;

use crate::services::interface::{IntentExtractor, ItineraryStore};
use crate::services::itinerary_builder::ItineraryBuilder;

pub mod budget;
pub mod health;
pub mod itinerary;

/// Shared per-process state handed to every handler.
pub struct AppState {
    pub builder: ItineraryBuilder,
    pub intent: Arc<dyn IntentExtractor>,
    pub store: Arc<dyn ItineraryStore>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/itineraries")
                        .route("/plan", web::post().to(itinerary::plan))
                        .route("/build", web::post().to(itinerary::build))
                        .route("", web::post().to(itinerary::save))
                        .route("", web::get().to(itinerary::list))
                        .route("/{id}", web::get().to(itinerary::get_by_id))
                        .route("/{id}", web::delete().to(itinerary::delete))
                        .route("/{id}/favorite", web::put().to(itinerary::set_favorite))
                        .route("/{id}/tags", web::put().to(itinerary::set_tags)),
                )
                .route("/budget/estimate", web::post().to(budget::estimate))
                .route("/maps-link", web::post().to(budget::maps_link)),
        );
}
