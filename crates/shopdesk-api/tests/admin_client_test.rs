// Integration tests for `AdminClient` using wiremock.
#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopdesk_api::{AdminClient, Error, Method, TransportConfig, routes};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AdminClient) {
    let server = MockServer::start().await;
    let client = AdminClient::new(
        server.uri().parse().unwrap(),
        &SecretString::from("tok-123".to_string()),
        &TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_get_list_sends_bearer_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(routes::ORDERS))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "o-1", "customer": "Ayesha", "total": 1200.0, "status": "Pending" },
            { "id": "o-2", "customer": "Bilal", "total": 640.0, "status": "Shipped" },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let items = client.get_list(routes::ORDERS).await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], "o-1");
    assert_eq!(items[1]["status"], "Shipped");
}

#[tokio::test]
async fn test_get_list_unwraps_data_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(routes::BANNERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "_id": "b-1", "title": "Eid sale", "active": true }]
        })))
        .mount(&server)
        .await;

    let items = client.get_list(routes::BANNERS).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["_id"], "b-1");
}

#[tokio::test]
async fn test_send_put_with_body() {
    let (server, client) = setup().await;
    let route = routes::customer_status("c-9");

    Mock::given(method("PUT"))
        .and(path(route.as_str()))
        .and(body_json(json!({ "userId": "c-9", "status": "inactive" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "c-9", "status": "inactive"
        })))
        .mount(&server)
        .await;

    let resp = client
        .send(
            Method::PUT,
            &route,
            Some(&json!({ "userId": "c-9", "status": "inactive" })),
        )
        .await
        .unwrap();

    assert_eq!(resp.unwrap()["status"], "inactive");
}

#[tokio::test]
async fn test_delete_with_empty_body() {
    let (server, client) = setup().await;
    let route = routes::banner("b-1");

    Mock::given(method("DELETE"))
        .and(path(route.as_str()))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let resp = client.send(Method::DELETE, &route, None).await.unwrap();
    assert!(resp.is_none());
}

#[tokio::test]
async fn test_login_returns_token() {
    let server = MockServer::start().await;
    let client =
        AdminClient::anonymous(server.uri().parse().unwrap(), &TransportConfig::default()).unwrap();

    Mock::given(method("POST"))
        .and(path(routes::LOGIN))
        .and(body_json(json!({ "email": "admin@shop.pk", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-abc",
            "user": { "role": "admin" }
        })))
        .mount(&server)
        .await;

    let resp = client
        .login("admin@shop.pk", &SecretString::from("hunter2".to_string()))
        .await
        .unwrap();
    assert_eq!(resp.token, "jwt-abc");
    assert_eq!(resp.user.unwrap()["role"], "admin");
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_maps_to_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(routes::CUSTOMERS))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.get_list(routes::CUSTOMERS).await.unwrap_err();
    assert!(matches!(err, Error::SessionExpired), "got {err:?}");
}

#[tokio::test]
async fn test_error_body_message_is_extracted() {
    let (server, client) = setup().await;
    let route = routes::banner_toggle("b-404");

    Mock::given(method("PATCH"))
        .and(path(route.as_str()))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "Banner not found" })),
        )
        .mount(&server)
        .await;

    let err = client.send(Method::PATCH, &route, None).await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Banner not found");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_array_collection_is_a_decode_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(routes::ORDERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "orders": 3 })))
        .mount(&server)
        .await;

    let err = client.get_list(routes::ORDERS).await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start().await;
    let client =
        AdminClient::anonymous(server.uri().parse().unwrap(), &TransportConfig::default()).unwrap();

    Mock::given(method("POST"))
        .and(path(routes::LOGIN))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Wrong password" })),
        )
        .mount(&server)
        .await;

    let err = client
        .login("admin@shop.pk", &SecretString::from("nope".to_string()))
        .await
        .unwrap_err();
    match err {
        Error::Authentication { message } => assert_eq!(message, "Wrong password"),
        other => panic!("expected Authentication error, got {other:?}"),
    }
}
