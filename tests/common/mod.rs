//! Shared setup for tests against a mock Songclip API.

#![allow(dead_code)]

use serde_json::{Value, json};
use songclip::{ClientConfig, SongclipClient};
use std::collections::HashMap;
use wiremock::{MockServer, Request};

pub const API_KEY: &str = "test-key";
pub const AUTHORIZATION: &str = "bearer test-token";

/// Start a mock server and a client pointed at it.
pub async fn setup() -> (MockServer, SongclipClient) {
    let server = MockServer::start().await;
    let client = client_for(&server, ClientConfig::new(API_KEY, AUTHORIZATION));
    (server, client)
}

/// Client for `server`, with the page size pinned so `SNGCLP_DEFAULT_LIMIT`
/// cannot leak into assertions.
pub fn client_for(server: &MockServer, config: ClientConfig) -> SongclipClient {
    SongclipClient::new(ClientConfig {
        base_url: Some(server.uri()),
        default_limit: Some(20),
        ..config
    })
    .unwrap()
}

/// `{"status": "success", "data": data}`
pub fn success(data: Value) -> Value {
    json!({"status": "success", "data": data})
}

pub fn clip(id: u64) -> Value {
    json!({
        "id": id,
        "artist": format!("Artist {id}"),
        "title": format!("Title {id}"),
        "coverUrl": format!("https://cdn.test/{id}.jpg"),
        "audioUrl": format!("https://cdn.test/{id}.mp3"),
        "duration": 6.0
    })
}

pub async fn requests(server: &MockServer) -> Vec<Request> {
    server.received_requests().await.unwrap()
}

pub fn query(request: &Request) -> HashMap<String, String> {
    request.url.query_pairs().into_owned().collect()
}

/// The `context` query parameter of a GET request, decoded.
pub fn query_context(request: &Request) -> Value {
    serde_json::from_str(&query(request)["context"]).unwrap()
}

/// The `context` member of a POST body.
pub fn body_context(request: &Request) -> Value {
    request.body_json::<Value>().unwrap()["context"].clone()
}

pub fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).map(|v| v.to_str().unwrap())
}
