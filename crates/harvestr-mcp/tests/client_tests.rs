//! HTTP-level tests for the Harvestr client.
//!
//! A wiremock server stands in for the Harvestr REST API so the tests can
//! check what goes over the wire as well as how responses are classified.

use harvestr_mcp::client::{ClientConfig, HarvestrClient, HarvestrError, QueryParams};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "t1";

/// Client pointed at the mock server.
fn client_for(server: &MockServer) -> HarvestrClient {
    let config = ClientConfig::with_token(TOKEN).base_url(server.uri());
    HarvestrClient::with_config(config).unwrap()
}

fn params(value: serde_json::Value) -> QueryParams {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn test_get_sends_token_and_decodes_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/company/c-1"))
        .and(header("x-harvestr-private-app-token", TOKEN))
        .and(header("accept", "application/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "c-1", "name": "Acme"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.get("/company/c-1", None).await.unwrap();

    assert_eq!(result, Some(json!({"id": "c-1", "name": "Acme"})));
    assert!(client.is_connected());
}

#[tokio::test]
async fn test_list_payload_passes_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "u-1", "email": "a@example.com"},
            {"id": "u-2", "email": "b@example.com", "extra": true}
        ])))
        .mount(&server)
        .await;

    let result = client_for(&server).get("/user", None).await.unwrap().unwrap();

    assert_eq!(result.as_array().unwrap().len(), 2);
    assert_eq!(result[1]["extra"], true);
}

#[tokio::test]
async fn test_api_error_uses_json_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/discovery/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get("/discovery/missing", None)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert!(err.is_not_found());
    assert!(matches!(err, HarvestrError::Api { ref message, .. } if message == "not found"));
}

#[tokio::test]
async fn test_api_error_falls_back_to_raw_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/message"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = client_for(&server).get("/message", None).await.unwrap_err();

    match err {
        HarvestrError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_no_content_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/company/c-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .patch("/company/c-1", Some(&json!({"name": "Acme"})))
        .await
        .unwrap();

    assert_eq!(result, None);
}

#[tokio::test]
async fn test_invalid_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).get("/user", None).await.unwrap_err();

    assert!(matches!(err, HarvestrError::InvalidResponse(_)));
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn test_all_null_params_send_no_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/discovery"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    client_for(&server)
        .get(
            "/discovery",
            Some(params(json!({"parentId": null, "select": null}))),
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_null_params_are_dropped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feedback"))
        .and(query_param("messageId", "m-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .get(
            "/feedback",
            Some(params(json!({"messageId": "m-1", "discoveryId": null}))),
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("messageId=m-1"));
}

#[tokio::test]
async fn test_post_sends_body_as_is() {
    let server = MockServer::start().await;
    let body = json!({"name": "Acme", "externalUid": "ext-1"});

    Mock::given(method("POST"))
        .and(path("/company"))
        .and(header("content-type", "application/json"))
        .and(body_json(&body))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": "c-9", "name": "Acme"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .post("/company", Some(&body))
        .await
        .unwrap();

    assert_eq!(result.unwrap()["id"], "c-9");
}

#[tokio::test]
async fn test_patch_sends_array_body() {
    let server = MockServer::start().await;
    let body = json!([{"attributeId": "a-1", "value": "enterprise"}]);

    Mock::given(method("PATCH"))
        .and(path("/user/u-1/attribute-values"))
        .and(body_json(&body))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .patch("/user/u-1/attribute-values", Some(&body))
        .await
        .unwrap();

    assert_eq!(result, Some(body));
}

#[tokio::test]
async fn test_timeout_is_classified() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig::with_token(TOKEN)
        .base_url(server.uri())
        .timeout(Duration::from_secs(1));
    let client = HarvestrClient::with_config(config).unwrap();

    let err = client.get("/user", None).await.unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let config = ClientConfig::with_token(TOKEN).base_url(uri);
    let client = HarvestrClient::with_config(config).unwrap();

    let err = client.get("/user", None).await.unwrap_err();

    assert!(matches!(err, HarvestrError::Transport(_)));
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn test_close_and_reuse() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(!client.close());

    client.get("/user", None).await.unwrap();
    assert!(client.close());
    assert!(!client.close());
    assert!(!client.is_connected());

    // A closed client reconnects on the next request.
    client.get("/user", None).await.unwrap();
    assert!(client.is_connected());
}

#[tokio::test]
async fn test_concurrent_requests_share_connection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/component"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (a, b, c) = tokio::join!(
        client.get("/component", None),
        client.get("/component", None),
        client.get("/component", None),
    );

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert!(client.close());
    assert!(!client.close());
}
