/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for keymaster-sdk tests

use keymaster_sdk::{ClientConfig, KeymasterClient};
use serde_json::{Value, json};
use wiremock::{MockServer, ResponseTemplate};

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server
pub fn client_for(server: &MockServer) -> KeymasterClient {
    KeymasterClient::with_config(ClientConfig::default().with_base_url(server.uri()))
        .expect("client should build against mock server")
}

pub fn ok_json(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

/// Minimal resolved DID document
pub fn mock_did_document(did: &str) -> Value {
    json!({
        "didDocument": { "id": did },
        "didDocumentMetadata": { "created": "2024-01-01T00:00:00Z", "version": 1 },
        "didResolutionMetadata": {}
    })
}
