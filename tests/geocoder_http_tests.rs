//! Google geocoder against a local one-shot HTTP server.

mod support;

use serde_json::json;
use tempfile::TempDir;

use addresses::adapter::outbound::GoogleGeocoder;
use addresses::app::AddressService;
use addresses::domain::{Coordinates, Country, GeocodeOutcome, GeocodeQuery, QueryEncoding};
use addresses::error::Error;
use addresses::port::outbound::{Geocoder, Trashed};

use support::{attrs, config, UK};

const SPRINGFIELD: &str = r#"{
    "results": [
        { "geometry": { "location": { "lat": 39.7817, "lng": -89.6501 } } },
        { "geometry": { "location": { "lat": 42.1015, "lng": -72.5898 } } }
    ],
    "status": "OK"
}"#;

fn springfield_query() -> GeocodeQuery {
    GeocodeQuery::from_components([Some("1 Main St"), Some("Springfield"), Some("USA")])
}

#[tokio::test]
async fn returns_first_result_and_sends_plus_encoded_query() {
    let (endpoint, server) = support::serve_once("200 OK", SPRINGFIELD).await;
    let geocoder = GoogleGeocoder::new(endpoint, QueryEncoding::Plus);

    let found = geocoder.locate(&springfield_query()).await.unwrap();
    let request_line = server.await.unwrap();

    assert_eq!(found, Some(Coordinates::new(39.7817, -89.6501)));
    assert!(request_line.starts_with("GET /maps/api/geocode/json?"));
    assert!(
        request_line.contains("address=1+Main+St,Springfield,USA&sensor=false"),
        "unexpected request: {request_line}"
    );
    assert!(!request_line.contains("key="));
}

#[tokio::test]
async fn sends_api_key_when_configured() {
    let (endpoint, server) = support::serve_once("200 OK", SPRINGFIELD).await;
    let geocoder = GoogleGeocoder::new(endpoint, QueryEncoding::Percent).with_api_key("abc123");

    geocoder.locate(&springfield_query()).await.unwrap();
    let request_line = server.await.unwrap();

    assert!(request_line.contains("address=1+Main+St%2CSpringfield%2CUSA&sensor=false&key=abc123"));
}

#[tokio::test]
async fn zero_results_is_no_match() {
    let (endpoint, server) =
        support::serve_once("200 OK", r#"{"results": [], "status": "ZERO_RESULTS"}"#).await;
    let geocoder = GoogleGeocoder::new(endpoint, QueryEncoding::Plus);

    assert_eq!(geocoder.locate(&springfield_query()).await.unwrap(), None);
    server.await.unwrap();
}

#[tokio::test]
async fn empty_body_is_an_error() {
    let (endpoint, server) = support::serve_once("200 OK", "").await;
    let geocoder = GoogleGeocoder::new(endpoint, QueryEncoding::Plus);

    let result = geocoder.locate(&springfield_query()).await;
    assert!(matches!(result, Err(Error::Geocode(_))));
    server.await.unwrap();
}

#[tokio::test]
async fn server_error_status_is_an_error() {
    let (endpoint, server) = support::serve_once("500 Internal Server Error", "{}").await;
    let geocoder = GoogleGeocoder::new(endpoint, QueryEncoding::Plus);

    let result = geocoder.locate(&springfield_query()).await;
    assert!(matches!(result, Err(Error::Http(_))));
    server.await.unwrap();
}

#[tokio::test]
async fn denied_request_is_an_error() {
    let (endpoint, server) = support::serve_once(
        "200 OK",
        r#"{"results": [], "status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."}"#,
    )
    .await;
    let geocoder = GoogleGeocoder::new(endpoint, QueryEncoding::Plus);

    match geocoder.locate(&springfield_query()).await {
        Err(Error::Geocode(message)) => assert!(message.starts_with("REQUEST_DENIED")),
        other => panic!("expected provider error, got {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn sqlite_service_persists_geocoded_coordinates() {
    let (endpoint, server) = support::serve_once(
        "200 OK",
        r#"{"results": [{"geometry": {"location": {"lat": 51.5237, "lng": -0.1585}}}], "status": "OK"}"#,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let mut config = config(true);
    config.geocode.endpoint = endpoint;
    config.database.url = dir.path().join("addresses.db").to_string_lossy().into_owned();

    let service = AddressService::sqlite(&config).unwrap();
    service
        .countries()
        .upsert(&Country::new(UK, "UK").with_code("GB"))
        .unwrap();

    let mut address = addresses::domain::Address::default();
    address
        .fill(
            &attrs(json!({
                "line_1": "221B Baker St",
                "city": "London",
                "post_code": "NW16XE",
                "country_id": UK.get(),
                "addressable_type": "customer",
                "addressable_id": 7,
            })),
            service.flags(),
        )
        .unwrap();
    let report = service.save(&mut address).await.unwrap();
    let request_line = server.await.unwrap();

    assert!(request_line.contains("address=221B+Baker+St,London,NW16XE,UK&sensor=false"));
    assert!(report.created);
    assert_eq!(
        report.geocode,
        GeocodeOutcome::Located(Coordinates::new(51.5237, -0.1585))
    );

    let stored = service
        .find(report.id, Trashed::Exclude)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.coordinates(), Some(Coordinates::new(51.5237, -0.1585)));
    assert_eq!(
        service.line(&stored).await.unwrap(),
        "221B Baker St, NW16XE London, UK"
    );
}

#[tokio::test]
async fn sqlite_service_saves_when_provider_is_down() {
    let dir = TempDir::new().unwrap();
    let mut config = config(true);
    config.geocode.endpoint = "http://127.0.0.1:1/maps/api/geocode/json".into();
    config.database.url = dir.path().join("addresses.db").to_string_lossy().into_owned();

    let service = AddressService::sqlite(&config).unwrap();
    let address = service
        .create(&attrs(json!({
            "line_1": "1 Main St",
            "city": "Springfield",
            "post_code": "62701",
            "country_id": 840,
        })))
        .await
        .unwrap();

    assert!(address.is_persisted());
    assert!(address.coordinates().is_none());
}

#[tokio::test]
async fn sqlite_service_keeps_trashed_row_on_stale_save() {
    let dir = TempDir::new().unwrap();
    let mut config = config(false);
    config.database.url = dir.path().join("addresses.db").to_string_lossy().into_owned();

    let service = AddressService::sqlite(&config).unwrap();
    let mut stale = service
        .create(&attrs(json!({
            "line_1": "1 Main St",
            "city": "Springfield",
            "post_code": "62701",
            "country_id": 840,
        })))
        .await
        .unwrap();
    let id = stale.id.unwrap();

    assert!(service.delete(id).await.unwrap());
    stale.city = Some("Shelbyville".into());
    service.save(&mut stale).await.unwrap();

    assert!(service.find(id, Trashed::Exclude).await.unwrap().is_none());
    let trashed = service.find(id, Trashed::Only).await.unwrap().unwrap();
    assert_eq!(trashed.city.as_deref(), Some("Shelbyville"));
}
