#![allow(dead_code)]

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use sberqr::{Credentials, SberQr};

pub const CLIENT_ID: &str = "6e7254e2-6de8-4074-b458-b7238689772b";
pub const ACCESS_TOKEN: &str = "test-token";

/// Terminal with a dynamic QR (`tid != id_qr`).
pub fn dynamic_credentials() -> Credentials {
    Credentials::new("00000105", "1000301234", "24601234", CLIENT_ID, "secret")
}

/// Terminal that is itself the QR sticker (`tid == id_qr`).
pub fn static_qr_credentials() -> Credentials {
    Credentials::new("00000105", "24601234", "24601234", CLIENT_ID, "secret")
}

pub fn client(server: &MockServer, creds: Credentials) -> SberQr {
    SberQr::builder(creds)
        .base_url(server.uri())
        .timeout(Duration::from_secs(5))
        .build()
        .expect("build client")
}

/// Mount a token endpoint issuing `ACCESS_TOKEN` with a one-hour lifetime.
pub async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/tokens/v2/oauth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": ACCESS_TOKEN,
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .mount(server)
        .await;
}

pub async fn mount_ok(server: &MockServer, endpoint: &str, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// The first request the server received on `endpoint`.
pub async fn request_to(server: &MockServer, endpoint: &str) -> Request {
    server
        .received_requests()
        .await
        .expect("request recording enabled")
        .into_iter()
        .find(|req| req.url.path() == endpoint)
        .unwrap_or_else(|| panic!("no request to {endpoint}"))
}

/// The JSON body sent to `endpoint`.
pub async fn body_sent_to(server: &MockServer, endpoint: &str) -> serde_json::Value {
    let request = request_to(server, endpoint).await;
    request
        .body_json::<serde_json::Value>()
        .expect("request body should be valid JSON")
}
