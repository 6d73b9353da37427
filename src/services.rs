pub mod budget_estimator;
pub mod google_places_service;
pub mod google_routes_service;
pub mod intent_service;
pub mod interface;
pub mod itinerary_assembler;
pub mod itinerary_builder;
pub mod maps_link;
pub mod place_normalizer;
pub mod route_sequencer;
pub mod spatial_clusterer;
