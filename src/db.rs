pub mod itinerary_store;
pub mod mongo;
