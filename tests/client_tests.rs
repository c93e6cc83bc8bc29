//! End-to-end tests for the five order operations against a mock server.

mod common;

use chrono::{TimeZone, Utc};
use common::{
    body_sent_to, client, dynamic_credentials, mount_ok, mount_token, request_to,
    static_qr_credentials, ACCESS_TOKEN, CLIENT_ID,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sberqr::{CancelType, Position, SberQrError};

fn coffee() -> Position {
    Position::new("Coffee", 1, 150, "Coffee")
}

#[tokio::test]
async fn create_includes_sbp_member_id_for_static_qr() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_ok(&server, "/qr/order/v3/creation", json!({"order_id": "o-1"})).await;

    let client = client(&server, static_qr_credentials());
    client.create("Coffee", 150, Some("X1"), coffee()).await.unwrap();

    let body = body_sent_to(&server, "/qr/order/v3/creation").await;
    assert_eq!(body["sbp_member_id"], "100000000111");
    assert_eq!(body["member_id"], "00000105");
    assert_eq!(body["id_qr"], "24601234");
}

#[tokio::test]
async fn create_omits_sbp_member_id_for_dynamic_qr() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_ok(&server, "/qr/order/v3/creation", json!({"order_id": "o-1"})).await;

    let client = client(&server, dynamic_credentials());
    client.create("Coffee", 150, Some("X1"), coffee()).await.unwrap();

    let body = body_sent_to(&server, "/qr/order/v3/creation").await;
    assert!(body.get("sbp_member_id").is_none());
}

#[tokio::test]
async fn create_wraps_single_position_and_fixes_currency() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_ok(&server, "/qr/order/v3/creation", json!({"order_id": "o-1"})).await;

    let client = client(&server, dynamic_credentials());
    client.create("Coffee", 150, Some("X1"), coffee()).await.unwrap();

    let body = body_sent_to(&server, "/qr/order/v3/creation").await;
    assert_eq!(body["currency"], "643");
    assert_eq!(body["order_sum"], 150);
    assert_eq!(body["order_number"], "X1");
    assert_eq!(
        body["order_params_type"],
        json!([{
            "position_name": "Coffee",
            "position_count": 1,
            "position_sum": 150,
            "position_description": "Coffee"
        }])
    );
    assert_eq!(body["order_create_date"], body["rq_tm"]);
}

#[tokio::test]
async fn create_generates_order_number_when_absent() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_ok(&server, "/qr/order/v3/creation", json!({"order_id": "o-1"})).await;

    let client = client(&server, dynamic_credentials());
    client.create("Coffee", 150, None, coffee()).await.unwrap();

    let body = body_sent_to(&server, "/qr/order/v3/creation").await;
    let number = body["order_number"].as_str().unwrap();
    assert_eq!(number.len(), 17);
    assert!(number.chars().all(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn order_calls_carry_the_header_contract() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_ok(&server, "/qr/order/v3/status", json!({"order_state": "PAID"})).await;

    let client = client(&server, dynamic_credentials());
    client.status("o-1", "X1").await.unwrap();

    let request = request_to(&server, "/qr/order/v3/status").await;
    let header = |name: &str| {
        request
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    assert_eq!(header("authorization"), format!("Bearer {ACCESS_TOKEN}"));
    assert_eq!(header("accept"), "application/json");
    assert_eq!(header("x-ibm-client-id"), CLIENT_ID);

    let rq_uid = header("rquid");
    assert_eq!(rq_uid.len(), 32);
    assert!(rq_uid.chars().all(|c| c.is_ascii_hexdigit()));

    // The correlation id in the body matches the header.
    let body = body_sent_to(&server, "/qr/order/v3/status").await;
    assert_eq!(body["rq_uid"], rq_uid.as_str());
    assert_eq!(body["order_id"], "o-1");
    assert_eq!(body["partner_order_number"], "X1");
    assert_eq!(body["tid"], "24601234");
}

#[tokio::test]
async fn revoke_sends_only_order_fields() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_ok(&server, "/qr/order/v3/revocation", json!({"order_state": "REVOKED"})).await;

    let client = client(&server, dynamic_credentials());
    client.revoke("o-1").await.unwrap();

    let body = body_sent_to(&server, "/qr/order/v3/revocation").await;
    let mut keys: Vec<_> = body.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, ["order_id", "rq_tm", "rq_uid"]);
    assert_eq!(body["order_id"], "o-1");
}

#[tokio::test]
async fn cancel_defaults_to_reverse_and_omits_payer() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_ok(&server, "/qr/order/v3/cancel", json!({"operation_state": "DONE"})).await;

    let client = client(&server, dynamic_credentials());
    client
        .cancel("o-1", "op-1", 150, "123456", None, None)
        .await
        .unwrap();

    let body = body_sent_to(&server, "/qr/order/v3/cancel").await;
    assert_eq!(body["operation_type"], "REVERSE");
    assert_eq!(body["operation_currency"], "643");
    assert_eq!(body["cancel_operation_sum"], 150);
    assert_eq!(body["auth_code"], "123456");
    assert_eq!(body["id_qr"], "1000301234");
    assert_eq!(body["tid"], "24601234");
    assert!(body.get("sbp_payer_id").is_none());
}

#[tokio::test]
async fn cancel_refund_can_route_over_sbp() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_ok(&server, "/qr/order/v3/cancel", json!({"operation_state": "DONE"})).await;

    let client = client(&server, dynamic_credentials());
    client
        .cancel(
            "o-1",
            "op-1",
            150,
            "123456",
            Some(CancelType::Refund),
            Some("+79991234567"),
        )
        .await
        .unwrap();

    let body = body_sent_to(&server, "/qr/order/v3/cancel").await;
    assert_eq!(body["operation_type"], "REFUND");
    assert_eq!(body["sbp_payer_id"], "+79991234567");
}

#[tokio::test]
async fn registry_speaks_camel_case_with_zulu_timestamps() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_ok(&server, "/qr/order/v3/registry", json!({"registry": []})).await;

    let client = client(&server, dynamic_credentials());
    let start = Utc.with_ymd_and_hms(2022, 4, 13, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2022, 4, 14, 0, 0, 0).unwrap();
    client.registry(start, end, None).await.unwrap();

    let body = body_sent_to(&server, "/qr/order/v3/registry").await;
    assert_eq!(body["startPeriod"], "2022-04-13T00:00:00Z");
    assert_eq!(body["endPeriod"], "2022-04-14T00:00:00Z");
    assert_eq!(body["registryType"], "REGISTRY");
    assert_eq!(body["idQR"], "1000301234");
    assert!(body["rqUid"].is_string());
    assert!(body["rqTm"].is_string());
    // No snake_case leakage on this endpoint.
    assert!(body.get("rq_uid").is_none());
}

#[tokio::test]
async fn conflict_surfaces_as_api_error_with_body() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/qr/order/v3/creation"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"errorCode": "DUPLICATE"})))
        .mount(&server)
        .await;

    let client = client(&server, dynamic_credentials());
    let err = client
        .create("Coffee", 150, Some("X1"), coffee())
        .await
        .unwrap_err();

    match err {
        SberQrError::Api { status, body } => {
            assert_eq!(status, 409);
            assert_eq!(body, json!({"errorCode": "DUPLICATE"}));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn html_gateway_page_is_a_network_error() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/qr/order/v3/status"))
        .respond_with(ResponseTemplate::new(502).set_body_raw("<html>Bad Gateway</html>", "text/html"))
        .mount(&server)
        .await;

    let client = client(&server, dynamic_credentials());
    let err = client.status("o-1", "X1").await.unwrap_err();
    assert!(err.is_network(), "{err:?}");
}

#[tokio::test]
async fn unlisted_status_fails_closed() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/qr/order/v3/status"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({"retry": true})))
        .mount(&server)
        .await;

    let client = client(&server, dynamic_credentials());
    let err = client.status("o-1", "X1").await.unwrap_err();
    match err {
        SberQrError::UnexpectedStatus { status, .. } => assert_eq!(status, 429),
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}
