mod common;

use serde_json::json;
use std::sync::Arc;

use wanderwhiz_api::config::PipelineConfig;
use wanderwhiz_api::error::ItineraryError;
use wanderwhiz_api::models::place::PlaceCategory;
use wanderwhiz_api::models::search::TravelIntent;
use wanderwhiz_api::services::place_normalizer::PlaceNormalizer;
use wanderwhiz_api::services::spatial_clusterer::SpatialClusterer;

use common::{
    builder, coord, google_place, paris_museums, saint_germain_cafes, FailingRouteCalculator,
    MockPlaceSearch, MockRouteCalculator, PARIS_CENTER,
};

fn paris_intent() -> TravelIntent {
    TravelIntent {
        city: "Paris".to_string(),
        interests: vec!["museums".to_string(), "cafes".to_string()],
    }
}

#[actix_rt::test]
async fn test_paris_museums_then_cafes() {
    let search = Arc::new(MockPlaceSearch::paris());
    let router = Arc::new(MockRouteCalculator::default());
    let builder = builder(search.clone(), router.clone());

    let itinerary = builder.plan("anonymous", &paris_intent()).await.unwrap();

    let ids: Vec<&str> = itinerary.places.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids.len(), 6);
    assert_eq!(&ids[..3], &["louvre", "arts-deco", "orangerie"]);
    for cafe in ["cafe-terrasse", "cafe-chateau", "cafe-marche"] {
        assert!(ids[3..].contains(&cafe));
    }

    assert_eq!(itinerary.name, "Trip in Paris");
    assert_eq!(itinerary.start, coord(PARIS_CENTER.0, PARIS_CENTER.1));
    assert!(itinerary.total_distance_m > 15_000.0);
    assert!(itinerary.total_duration_s > 0.0);
    assert_eq!(itinerary.polyline, "mock_polyline");

    assert_eq!(itinerary.budget.breakdown.get("museum"), Some(&60.0));
    assert_eq!(itinerary.budget.breakdown.get("food"), Some(&30.0));
    assert_eq!(itinerary.budget.total, 90.0);

    let searches = search.searches.lock().unwrap().clone();
    assert_eq!(searches, vec!["museums in Paris", "cafes in Paris"]);

    // One route call, in visiting order.
    let calls = router.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    let expected: Vec<_> = itinerary.places.iter().map(|p| p.location).collect();
    assert_eq!(calls[0], expected);
}

#[test]
fn test_paris_candidates_form_two_clusters() {
    let config = PipelineConfig::default();
    let museums =
        PlaceNormalizer::normalize(&paris_museums(), Some("museums"), config.max_places_per_interest)
            .unwrap();
    let cafes =
        PlaceNormalizer::normalize(&saint_germain_cafes(), Some("cafes"), config.max_places_per_interest)
            .unwrap();
    let places = PlaceNormalizer::merge(vec![museums, cafes], config.max_total_places);
    assert_eq!(places.len(), 6);

    let clusters = SpatialClusterer::cluster(places, config.cluster_radius_km);
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].len(), 3);
    assert_eq!(clusters[1].len(), 3);

    let center = coord(PARIS_CENTER.0, PARIS_CENTER.1);
    assert!(center.distance_m(&clusters[0].centroid) < center.distance_m(&clusters[1].centroid));
}

#[actix_rt::test]
async fn test_build_cap_scales_with_interests() {
    let raw: Vec<serde_json::Value> = (0..15)
        .map(|i| {
            google_place(
                &format!("spot-{}", i),
                &format!("Spot {}", i),
                48.85 + i as f64 * 0.001,
                2.35,
                &["museum"],
            )
        })
        .collect();
    let raw = serde_json::Value::Array(raw);
    let builder = builder(
        Arc::new(MockPlaceSearch::new(None)),
        Arc::new(MockRouteCalculator::default()),
    );

    let two_interests = vec!["museums".to_string(), "cafes".to_string()];
    let itinerary = builder
        .build_from_candidates("anonymous", "Paris", &two_interests, &raw, None)
        .await
        .unwrap();
    assert_eq!(itinerary.places.len(), 15);

    let itinerary = builder
        .build_from_candidates("anonymous", "Paris", &[], &raw, None)
        .await
        .unwrap();
    assert_eq!(itinerary.places.len(), 10);
}

#[actix_rt::test]
async fn test_no_results_is_no_places_found() {
    let search = Arc::new(MockPlaceSearch::new(Some(coord(60.0, 10.0))));
    let router = Arc::new(MockRouteCalculator::default());
    let builder = builder(search, router.clone());

    let intent = TravelIntent {
        city: "Smalltown".to_string(),
        interests: vec!["opera".to_string()],
    };
    let err = builder.plan("anonymous", &intent).await.unwrap_err();
    match err {
        ItineraryError::NoPlacesFound { city, interests } => {
            assert_eq!(city, "Smalltown");
            assert_eq!(interests, vec!["opera"]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(router.calls.lock().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_invalid_intent_is_rejected() {
    let builder = builder(
        Arc::new(MockPlaceSearch::paris()),
        Arc::new(MockRouteCalculator::default()),
    );

    let no_city = TravelIntent {
        city: "  ".to_string(),
        interests: vec!["museums".to_string()],
    };
    assert!(matches!(
        builder.plan("anonymous", &no_city).await,
        Err(ItineraryError::InvalidInput(_))
    ));

    let no_interests = TravelIntent {
        city: "Paris".to_string(),
        interests: vec![" ".to_string()],
    };
    assert!(matches!(
        builder.plan("anonymous", &no_interests).await,
        Err(ItineraryError::InvalidInput(_))
    ));
}

#[actix_rt::test]
async fn test_malformed_candidate_is_dropped() {
    let builder = builder(
        Arc::new(MockPlaceSearch::new(None)),
        Arc::new(MockRouteCalculator::default()),
    );

    let raw = json!([
        google_place("louvre", "Musée du Louvre", 48.8606, 2.3376, &["museum"]),
        google_place("broken", "Nowhere", 999.0, 2.3, &["museum"]),
        { "name": "No id", "lat": 48.86, "lng": 2.34 },
        google_place("orangerie", "Musée de l'Orangerie", 48.8638, 2.3226, &["museum"]),
    ]);

    let itinerary = builder
        .build_from_candidates("anonymous", "Paris", &[], &raw, None)
        .await
        .unwrap();

    let ids: Vec<&str> = itinerary.places.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["louvre", "orangerie"]);
    // No geocode: the first normalized place is the start.
    assert_eq!(itinerary.start, coord(48.8606, 2.3376));
}

#[actix_rt::test]
async fn test_unknown_category_uses_default_bucket() {
    let builder = builder(
        Arc::new(MockPlaceSearch::new(None)),
        Arc::new(MockRouteCalculator::default()),
    );

    let raw = json!([
        google_place("winery", "Domaine du Coteau", 47.2, -1.4, &["winery", "establishment"]),
        google_place("museum", "Musée d'Arts", 47.21, -1.41, &["museum"]),
    ]);
    let itinerary = builder
        .build_from_candidates("anonymous", "Nantes", &[], &raw, None)
        .await
        .unwrap();

    let winery = itinerary.places.iter().find(|p| p.id == "winery").unwrap();
    assert_eq!(winery.category, PlaceCategory::Other);
    assert_eq!(itinerary.budget.breakdown.get("other"), Some(&15.0));
    assert_eq!(itinerary.budget.breakdown.get("museum"), Some(&20.0));

    let sum: f64 = itinerary.budget.breakdown.values().sum();
    assert_eq!(itinerary.budget.total, sum);
}

#[actix_rt::test]
async fn test_route_failure_propagates() {
    let builder = builder(
        Arc::new(MockPlaceSearch::paris()),
        Arc::new(FailingRouteCalculator),
    );

    let err = builder.plan("anonymous", &paris_intent()).await.unwrap_err();
    assert!(matches!(err, ItineraryError::Collaborator { .. }));
    assert!(err.to_string().contains("quota exceeded"));
}

#[actix_rt::test]
async fn test_single_place_skips_routing() {
    let router = Arc::new(MockRouteCalculator::default());
    let builder = builder(Arc::new(MockPlaceSearch::new(None)), router.clone());

    let raw = json!([google_place("louvre", "Musée du Louvre", 48.8606, 2.3376, &["museum"])]);
    let itinerary = builder
        .build_from_candidates("anonymous", "Paris", &[], &raw, None)
        .await
        .unwrap();

    assert_eq!(itinerary.places.len(), 1);
    assert_eq!(itinerary.total_distance_m, 0.0);
    assert_eq!(itinerary.total_duration_s, 0.0);
    assert!(router.calls.lock().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_same_input_same_itinerary() {
    let builder = builder(
        Arc::new(MockPlaceSearch::paris()),
        Arc::new(MockRouteCalculator::default()),
    );

    let first = builder.plan("anonymous", &paris_intent()).await.unwrap();
    let second = builder.plan("anonymous", &paris_intent()).await.unwrap();

    let ids = |i: &wanderwhiz_api::models::itinerary::Itinerary| {
        i.places.iter().map(|p| p.id.clone()).collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first.total_distance_m, second.total_distance_m);
    assert_eq!(first.budget, second.budget);
}

#[actix_rt::test]
async fn test_far_candidates_filtered_by_city_radius() {
    let search = MockPlaceSearch::new(Some(coord(PARIS_CENTER.0, PARIS_CENTER.1))).with(
        "castles",
        json!([
            google_place("versailles", "Château de Versailles", 48.8049, 2.1204, &["tourist_attraction"]),
            google_place("chambord", "Château de Chambord", 47.6161, 1.5170, &["tourist_attraction"]),
        ]),
    );
    let builder = builder(Arc::new(search), Arc::new(MockRouteCalculator::default()));

    let intent = TravelIntent {
        city: "Paris".to_string(),
        interests: vec!["castles".to_string()],
    };
    let itinerary = builder.plan("anonymous", &intent).await.unwrap();

    let ids: Vec<&str> = itinerary.places.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["versailles"]);
}

#[actix_rt::test]
async fn test_duplicate_ids_across_interests() {
    let shared = google_place("louvre", "Musée du Louvre", 48.8606, 2.3376, &["museum"]);
    let search = MockPlaceSearch::new(Some(coord(PARIS_CENTER.0, PARIS_CENTER.1)))
        .with("museums", json!([shared.clone()]))
        .with("art", json!([shared]));
    let builder = builder(Arc::new(search), Arc::new(MockRouteCalculator::default()));

    let intent = TravelIntent {
        city: "Paris".to_string(),
        interests: vec!["museums".to_string(), "art".to_string()],
    };
    let itinerary = builder.plan("anonymous", &intent).await.unwrap();
    assert_eq!(itinerary.places.len(), 1);
    assert_eq!(itinerary.places[0].interest.as_deref(), Some("museums"));
}
