//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use addresses::adapter::outbound::{MemoryAddressStore, MemoryCountries};
use addresses::app::AddressService;
use addresses::config::Config;
use addresses::domain::{Coordinates, Country, CountryId, GeocodeQuery};
use addresses::error::{Error, Result};
use addresses::port::outbound::Geocoder;

pub const UK: CountryId = CountryId::new(826);
pub const USA: CountryId = CountryId::new(840);

/// Unwrap a JSON object literal into an attribute map.
pub fn attrs(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub fn countries() -> MemoryCountries {
    [
        Country::new(UK, "UK").with_code("GB"),
        Country::new(USA, "USA").with_code("US"),
    ]
    .into_iter()
    .collect()
}

pub fn config(geocode_enabled: bool) -> Config {
    let mut config = Config::default();
    config.geocode.enabled = geocode_enabled;
    config
}

pub type MemoryService = AddressService<MemoryAddressStore, MemoryCountries>;

pub fn memory_service(geocode_enabled: bool, geocoder: Arc<StubGeocoder>) -> MemoryService {
    AddressService::new(
        &config(geocode_enabled),
        MemoryAddressStore::new(),
        countries(),
        geocoder,
    )
}

/// Scripted geocoder that records every query it receives.
#[derive(Debug)]
pub struct StubGeocoder {
    answer: Mutex<Option<std::result::Result<Option<Coordinates>, String>>>,
    queries: Mutex<Vec<String>>,
}

impl StubGeocoder {
    pub fn locating(lat: f64, lng: f64) -> Arc<Self> {
        Self::with_answer(Ok(Some(Coordinates::new(lat, lng))))
    }

    pub fn finding_nothing() -> Arc<Self> {
        Self::with_answer(Ok(None))
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Self::with_answer(Err(reason.to_string()))
    }

    fn with_answer(answer: std::result::Result<Option<Coordinates>, String>) -> Arc<Self> {
        Arc::new(Self {
            answer: Mutex::new(Some(answer)),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().len()
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn locate(&self, query: &GeocodeQuery) -> Result<Option<Coordinates>> {
        self.queries.lock().push(query.as_str().to_string());
        match self.answer.lock().clone() {
            Some(Ok(found)) => Ok(found),
            Some(Err(reason)) => Err(Error::Connection(reason)),
            None => Ok(None),
        }
    }
}

/// Serve a single HTTP response on a local port.
///
/// Returns the endpoint URL and a handle resolving to the request line the
/// server received.
pub async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.expect("read request");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        socket
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        let _ = socket.shutdown().await;

        String::from_utf8_lossy(&request)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    });

    (format!("http://{addr}/maps/api/geocode/json"), handle)
}
