//! HTTP-level tests for the places and events clients against a mock server.

use lens_core::{Coordinates, Error};
use lens_places::{
    EventsConfig, EventsProvider, GooglePlacesClient, PlacesConfig, PlacesProvider,
    TicketmasterClient,
};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn places_client(server: &MockServer) -> GooglePlacesClient {
    GooglePlacesClient::new(PlacesConfig {
        base_url: format!("{}/maps/api/place/nearbysearch/json", server.uri()),
        api_key: Some("places-key".to_string()),
        timeout: Duration::from_secs(2),
    })
    .expect("Failed to create places client")
}

fn events_client(server: &MockServer) -> TicketmasterClient {
    TicketmasterClient::new(EventsConfig {
        base_url: format!("{}/discovery/v2/events.json", server.uri()),
        api_key: Some("events-key".to_string()),
        timeout: Duration::from_secs(2),
    })
    .expect("Failed to create events client")
}

#[tokio::test]
async fn test_places_request_parameters_and_parsing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/nearbysearch/json"))
        .and(query_param("key", "places-key"))
        .and(query_param("location", "48.8584,2.2945"))
        .and(query_param("radius", "1500"))
        .and(query_param("type", "museum"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "results": [{
                "name": "Musée Rodin",
                "place_id": "rodin",
                "geometry": {"location": {"lat": 48.8553, "lng": 2.3159}},
                "vicinity": "77 Rue de Varenne, Paris",
                "rating": 4.6,
                "types": ["museum"]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let places = places_client(&server)
        .nearby_search(Coordinates::new(48.8584, 2.2945), 1500, "museum")
        .await
        .expect("search should succeed");

    assert_eq!(places.len(), 1);
    assert_eq!(places[0].name, "Musée Rodin");
    assert_eq!(places[0].external_id.as_deref(), Some("rodin"));
}

#[tokio::test]
async fn test_places_non_success_status_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = places_client(&server)
        .nearby_search(Coordinates::new(0.0, 0.0), 1500, "park")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UpstreamStatus { status: 500, .. }));
    assert!(!err.is_fatal());
}

#[tokio::test]
async fn test_places_slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "OK", "results": []}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let result = places_client(&server)
        .nearby_search(Coordinates::new(0.0, 0.0), 1500, "park")
        .await;
    assert!(matches!(result, Err(Error::Request(_))));
}

#[tokio::test]
async fn test_events_request_parameters_and_parsing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/discovery/v2/events.json"))
        .and(query_param("apikey", "events-key"))
        .and(query_param("latlong", "41.8781,-87.6298"))
        .and(query_param("radius", "20"))
        .and(query_param("unit", "km"))
        .and(query_param("size", "20"))
        .and(query_param("sort", "date,asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_embedded": {"events": [{
                "name": "Blues Fest",
                "distance": 1.2,
                "dates": {"start": {"dateTime": "2026-06-06T18:00:00Z"}},
                "_embedded": {"venues": [{"name": "Millennium Park"}]}
            }]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let events = events_client(&server)
        .search_events(Coordinates::new(41.8781, -87.6298), 20, 20)
        .await
        .expect("search should succeed");

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].venue.as_deref(), Some("Millennium Park"));
    assert_eq!(events[0].distance_m, Some(1200));
}

#[tokio::test]
async fn test_events_non_success_status_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid ApiKey"))
        .mount(&server)
        .await;

    let err = events_client(&server)
        .search_events(Coordinates::new(0.0, 0.0), 20, 6)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UpstreamStatus { status: 401, .. }));
}
