//! Integration tests for `DirectionsClient` using wiremock HTTP mocks.

use campusnav_core::{Coordinate, DirectionsRequest, RequestWaypoint, TravelMode};
use campusnav_directions::{DirectionsClient, DirectionsError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> DirectionsClient {
    let base = format!("{}/maps/api/directions", server.uri());
    DirectionsClient::with_base_url(Some("test-key"), 30, &base)
        .expect("client construction should not fail")
}

fn gym_to_lab_via_library() -> DirectionsRequest {
    DirectionsRequest {
        origin: Coordinate::new(39.95, -75.19),
        destination: Coordinate::new(39.951, -75.195),
        waypoints: vec![RequestWaypoint {
            location: Coordinate::new(39.9525, -75.193),
            stopover: true,
        }],
        provide_route_alternatives: true,
        travel_mode: TravelMode::Walking,
    }
}

fn leg(start: (f64, f64), end: (f64, f64)) -> serde_json::Value {
    serde_json::json!({
        "start_location": { "lat": start.0, "lng": start.1 },
        "end_location": { "lat": end.0, "lng": end.1 },
        "start_address": "College Ave",
        "end_address": "Library Walk",
        "distance": { "text": "0.2 km", "value": 200 },
        "duration": { "text": "3 mins", "value": 180 },
        "steps": [{
            "html_instructions": "Head <b>north</b>",
            "distance": { "text": "0.2 km", "value": 200 },
            "duration": { "text": "3 mins", "value": 180 },
            "start_location": { "lat": start.0, "lng": start.1 },
            "end_location": { "lat": end.0, "lng": end.1 }
        }]
    })
}

#[tokio::test]
async fn route_returns_parsed_routes() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "routes": [{
            "summary": "College Walk",
            "legs": [
                leg((39.9501, -75.1901), (39.9524, -75.1929)),
                leg((39.9524, -75.1929), (39.9511, -75.1951))
            ],
            "warnings": ["Walking directions are in beta."],
            "copyrights": "Map data"
        }]
    });

    Mock::given(method("GET"))
        .and(path("/maps/api/directions/json"))
        .and(query_param("origin", "39.95,-75.19"))
        .and(query_param("destination", "39.951,-75.195"))
        .and(query_param("waypoints", "39.9525,-75.193"))
        .and(query_param("alternatives", "true"))
        .and(query_param("mode", "walking"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let routes = client
        .route(&gym_to_lab_via_library())
        .await
        .expect("should parse routes");

    assert_eq!(routes.len(), 1);
    let route = &routes[0];
    assert_eq!(route.summary, "College Walk");
    assert_eq!(route.legs.len(), 2);
    assert_eq!(route.legs[0].steps[0].html_instructions, "Head <b>north</b>");
    assert_eq!(route.total_distance_meters(), 400);

    let endpoints = route.leg_endpoints();
    assert_eq!(endpoints[0].start, Coordinate::new(39.9501, -75.1901));
    assert_eq!(endpoints[1].end, Coordinate::new(39.9511, -75.1951));
}

#[tokio::test]
async fn zero_results_is_reported_with_raw_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "ZERO_RESULTS", "routes": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server).with_retry(3, 0);
    let err = client
        .route(&gym_to_lab_via_library())
        .await
        .expect_err("ZERO_RESULTS should fail");

    assert!(
        matches!(err, DirectionsError::Upstream { ref status, .. } if status == "ZERO_RESULTS"),
        "got: {err:?}"
    );
    assert_eq!(
        err.to_string(),
        "Error getting directions, server returned: ZERO_RESULTS"
    );
}

#[tokio::test]
async fn unknown_error_status_is_sent_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "UNKNOWN_ERROR" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server).with_retry(2, 0);
    let err = client
        .route(&gym_to_lab_via_library())
        .await
        .expect_err("UNKNOWN_ERROR should fail");

    assert_eq!(
        err.to_string(),
        "Error getting directions, server returned: UNKNOWN_ERROR"
    );
}

#[tokio::test]
async fn server_error_is_surfaced_without_resending() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server).with_retry(2, 0);
    let err = client
        .route(&gym_to_lab_via_library())
        .await
        .expect_err("503 should fail");

    match err {
        DirectionsError::Http(e) => {
            assert_eq!(e.status(), Some(reqwest::StatusCode::SERVICE_UNAVAILABLE));
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server).with_retry(2, 0);
    let err = client.route(&gym_to_lab_via_library()).await.unwrap_err();
    assert!(matches!(err, DirectionsError::Http(_)));
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.route(&gym_to_lab_via_library()).await.unwrap_err();
    assert!(matches!(err, DirectionsError::Deserialize { .. }), "got: {err:?}");
}

#[tokio::test]
async fn too_many_waypoints_never_reaches_the_service() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut request = gym_to_lab_via_library();
    request.waypoints = vec![request.waypoints[0]; 26];

    let client = test_client(&server);
    let err = client.route(&request).await.unwrap_err();
    assert!(matches!(err, DirectionsError::InvalidRequest(_)));
}
