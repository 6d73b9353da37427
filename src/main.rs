use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info, warn};

use wanderwhiz_api::config::AppConfig;
use wanderwhiz_api::db::itinerary_store::{MemoryItineraryStore, MongoItineraryStore};
use wanderwhiz_api::db::mongo::create_mongo_client;
use wanderwhiz_api::routes::{self, AppState};
use wanderwhiz_api::services::google_places_service::GooglePlacesService;
use wanderwhiz_api::services::google_routes_service::GoogleRoutesService;
use wanderwhiz_api::services::intent_service::OpenAiIntentService;
use wanderwhiz_api::services::interface::ItineraryStore;
use wanderwhiz_api::services::itinerary_builder::ItineraryBuilder;

fn to_io(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        to_io(e)
    })?;

    let store: Arc<dyn ItineraryStore> = match &config.mongo_uri {
        Some(uri) => {
            let client = create_mongo_client(uri, &config.mongo_database)
                .await
                .map_err(to_io)?;
            Arc::new(MongoItineraryStore::new(client, &config.mongo_database))
        }
        None => {
            warn!("MONGODB_URI not set, itineraries are kept in memory");
            Arc::new(MemoryItineraryStore::new())
        }
    };

    let places = GooglePlacesService::new(config.google_maps_api_key.clone()).map_err(to_io)?;
    let router = GoogleRoutesService::new(config.google_maps_api_key.clone()).map_err(to_io)?;
    let intent = OpenAiIntentService::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    )
    .map_err(to_io)?;

    let state = web::Data::new(AppState {
        builder: ItineraryBuilder::new(Arc::new(places), Arc::new(router), config.pipeline.clone()),
        intent: Arc::new(intent),
        store,
    });

    info!("Starting HTTP server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind((config.host.clone(), config.port))?
    .run()
    .await
}
