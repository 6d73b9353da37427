use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use wanderwhiz_api::config::PipelineConfig;
use wanderwhiz_api::db::itinerary_store::MemoryItineraryStore;
use wanderwhiz_api::error::ItineraryError;
use wanderwhiz_api::models::itinerary::RouteSummary;
use wanderwhiz_api::models::place::Coordinate;
use wanderwhiz_api::models::search::TravelIntent;
use wanderwhiz_api::routes::{self, AppState};
use wanderwhiz_api::services::interface::{IntentExtractor, PlaceSearch, RouteCalculator};
use wanderwhiz_api::services::itinerary_builder::ItineraryBuilder;

pub const PARIS_CENTER: (f64, f64) = (48.8566, 2.3522);

pub fn coord(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).expect("valid test coordinate")
}

/// Google Places text-search shaped record.
pub fn google_place(id: &str, name: &str, lat: f64, lng: f64, types: &[&str]) -> Value {
    json!({
        "place_id": id,
        "name": name,
        "geometry": { "location": { "lat": lat, "lng": lng } },
        "types": types,
        "rating": 4.5,
        "formatted_address": format!("{}, France", name)
    })
}

pub fn paris_museums() -> Value {
    json!([
        google_place("louvre", "Musée du Louvre", 48.8606, 2.3376, &["museum", "tourist_attraction"]),
        google_place("arts-deco", "Musée des Arts Décoratifs", 48.8630, 2.3330, &["museum"]),
        google_place("orangerie", "Musée de l'Orangerie", 48.8638, 2.3226, &["museum", "art_gallery"]),
    ])
}

/// Cafés in Saint-Germain-en-Laye, ~19 km west of the center.
pub fn saint_germain_cafes() -> Value {
    json!([
        google_place("cafe-terrasse", "Café de la Terrasse", 48.8989, 2.0938, &["cafe", "food"]),
        google_place("cafe-chateau", "Café du Château", 48.8975, 2.0950, &["cafe", "restaurant"]),
        google_place("cafe-marche", "Café du Marché", 48.8982, 2.0925, &["cafe"]),
    ])
}

/// In-process place search keyed by lowercased interest.
pub struct MockPlaceSearch {
    results: HashMap<String, Value>,
    center: Option<Coordinate>,
    pub searches: Mutex<Vec<String>>,
}

impl MockPlaceSearch {
    pub fn new(center: Option<Coordinate>) -> Self {
        Self {
            results: HashMap::new(),
            center,
            searches: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, interest: &str, results: Value) -> Self {
        self.results.insert(interest.to_lowercase(), results);
        self
    }

    pub fn paris() -> Self {
        Self::new(Some(coord(PARIS_CENTER.0, PARIS_CENTER.1)))
            .with("museums", paris_museums())
            .with("cafes", saint_germain_cafes())
    }
}

#[async_trait]
impl PlaceSearch for MockPlaceSearch {
    async fn search_places(&self, city: &str, interest: &str) -> Result<Value, ItineraryError> {
        self.searches
            .lock()
            .unwrap()
            .push(format!("{} in {}", interest, city));
        Ok(self
            .results
            .get(&interest.to_lowercase())
            .cloned()
            .unwrap_or_else(|| json!([])))
    }

    async fn city_center(&self, _city: &str) -> Result<Option<Coordinate>, ItineraryError> {
        Ok(self.center)
    }
}

/// Straight-line route at a constant 10 m/s, recording every call.
#[derive(Default)]
pub struct MockRouteCalculator {
    pub calls: Mutex<Vec<Vec<Coordinate>>>,
}

#[async_trait]
impl RouteCalculator for MockRouteCalculator {
    async fn compute_route(&self, ordered: &[Coordinate]) -> Result<RouteSummary, ItineraryError> {
        self.calls.lock().unwrap().push(ordered.to_vec());
        let distance: f64 = ordered.windows(2).map(|w| w[0].distance_m(&w[1])).sum();
        Ok(RouteSummary {
            total_distance_m: distance,
            total_duration_s: distance / 10.0,
            polyline: "mock_polyline".to_string(),
        })
    }
}

pub struct FailingRouteCalculator;

#[async_trait]
impl RouteCalculator for FailingRouteCalculator {
    async fn compute_route(&self, _ordered: &[Coordinate]) -> Result<RouteSummary, ItineraryError> {
        Err(ItineraryError::collaborator("google routes", "quota exceeded"))
    }
}

pub struct MockIntent(pub TravelIntent);

impl MockIntent {
    pub fn new(city: &str, interests: &[&str]) -> Self {
        Self(TravelIntent {
            city: city.to_string(),
            interests: interests.iter().map(|i| i.to_string()).collect(),
        })
    }
}

#[async_trait]
impl IntentExtractor for MockIntent {
    async fn extract_intent(&self, text: &str) -> Result<TravelIntent, ItineraryError> {
        if text.trim().is_empty() {
            return Err(ItineraryError::invalid_input("prompt is empty"));
        }
        Ok(self.0.clone())
    }
}

pub fn builder(
    search: Arc<dyn PlaceSearch>,
    router: Arc<dyn RouteCalculator>,
) -> ItineraryBuilder {
    ItineraryBuilder::new(search, router, PipelineConfig::default())
}

pub struct TestApp {
    pub state: web::Data<AppState>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(
            Arc::new(MockPlaceSearch::paris()),
            Arc::new(MockRouteCalculator::default()),
            Arc::new(MockIntent::new("Paris", &["museums", "cafes"])),
        )
    }

    pub fn with(
        search: Arc<dyn PlaceSearch>,
        router: Arc<dyn RouteCalculator>,
        intent: Arc<dyn IntentExtractor>,
    ) -> Self {
        let state = web::Data::new(AppState {
            builder: builder(search, router),
            intent,
            store: Arc::new(MemoryItineraryStore::new()),
        });
        Self { state }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::configure)
    }
}

/// What a stub API server saw for one request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: String,
    pub headers: HashMap<String, String>,
    pub body: Value,
}

/// Start a local HTTP server answering each path with a canned status and
/// JSON body. Returns the base URL and the requests it received.
pub async fn serve_json(
    responses: Vec<(&'static str, u16, Value)>,
) -> (String, Arc<Mutex<Vec<RecordedRequest>>>) {
    let recorded: Arc<Mutex<Vec<RecordedRequest>>> = Arc::new(Mutex::new(Vec::new()));
    let responses = Arc::new(responses);

    let log = recorded.clone();
    let server = actix_web::HttpServer::new(move || {
        let responses = responses.clone();
        let log = log.clone();
        App::new().default_service(web::to(
            move |req: actix_web::HttpRequest, body: web::Bytes| {
                let responses = responses.clone();
                let log = log.clone();
                async move {
                    let headers = req
                        .headers()
                        .iter()
                        .filter_map(|(k, v)| {
                            v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string()))
                        })
                        .collect();
                    log.lock().unwrap().push(RecordedRequest {
                        path: req.path().to_string(),
                        query: req.query_string().to_string(),
                        headers,
                        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
                    });

                    match responses.iter().find(|(path, _, _)| *path == req.path()) {
                        Some((_, status, json)) => actix_web::HttpResponse::build(
                            actix_web::http::StatusCode::from_u16(*status).unwrap(),
                        )
                        .json(json),
                        None => actix_web::HttpResponse::NotFound().finish(),
                    }
                }
            },
        ))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind stub server");

    let addr = server.addrs()[0];
    actix_rt::spawn(server.run());
    (format!("http://{}", addr), recorded)
}
