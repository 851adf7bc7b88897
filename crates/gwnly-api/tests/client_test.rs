#![allow(clippy::unwrap_used)]
// Integration tests for `GwnClient` using wiremock.

use std::collections::HashMap;

use chrono::{TimeDelta, Utc};
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gwnly_api::endpoints::{AP_LIST_PATH, CLIENT_LIST_PATH, NETWORK_LIST_PATH};
use gwnly_api::signature::{self, SigningParams};
use gwnly_api::{AuthError, Credentials, Error, GwnClient, NetworkId, Token};

// ── Helpers ─────────────────────────────────────────────────────────

const APP_ID: &str = "app-1";
const SECRET: &str = "s3cret";

fn credentials(base: &str) -> Credentials {
    Credentials::new(
        APP_ID,
        SecretString::from(SECRET.to_owned()),
        Url::parse(base).unwrap(),
    )
}

async fn setup() -> (MockServer, GwnClient) {
    let server = MockServer::start().await;
    let client = GwnClient::with_client(reqwest::Client::new(), credentials(&server.uri())).unwrap();
    (server, client)
}

async fn mount_token(server: &MockServer, token: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=app-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": token, "expires_in": 7200 })),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn ok_list(items: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "retCode": 0, "data": { "result": items } }))
}

// ── Token lifecycle ─────────────────────────────────────────────────

#[tokio::test]
async fn test_first_call_authenticates_once() {
    let (server, client) = setup().await;
    mount_token(&server, "tok-1", 1).await;

    Mock::given(method("POST"))
        .and(path(NETWORK_LIST_PATH))
        .and(query_param("access_token", "tok-1"))
        .respond_with(ok_list(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    client.list_networks().await.unwrap();
    client.list_networks().await.unwrap();
    assert!(client.tokens().expires_at().await.unwrap() > Utc::now());
}

#[tokio::test]
async fn test_stale_token_is_refreshed() {
    let (server, client) = setup().await;
    mount_token(&server, "tok-new", 1).await;

    client
        .tokens()
        .set_token(Token::new("tok-old", Utc::now() - TimeDelta::seconds(5)))
        .await;

    Mock::given(method("POST"))
        .and(path(AP_LIST_PATH))
        .and(query_param("access_token", "tok-new"))
        .respond_with(ok_list(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client.list_access_points(None).await.unwrap();
}

#[tokio::test]
async fn test_valid_token_skips_exchange() {
    let (server, client) = setup().await;
    mount_token(&server, "unused", 0).await;

    client
        .tokens()
        .set_token(Token::new("tok-cached", Utc::now() + TimeDelta::hours(1)))
        .await;

    Mock::given(method("POST"))
        .and(path(CLIENT_LIST_PATH))
        .and(query_param("access_token", "tok-cached"))
        .respond_with(ok_list(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client.list_clients(None).await.unwrap();
}

#[tokio::test]
async fn test_token_rejection_maps_to_auth_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_client" })))
        .mount(&server)
        .await;

    let result = client.list_networks().await;
    match result {
        Err(Error::Auth(ref e @ AuthError::Rejected { status: 400, .. })) => {
            assert!(e.is_invalid_credentials());
        }
        other => panic!("expected Auth(Rejected), got: {other:?}"),
    }
}

#[tokio::test]
async fn test_token_response_without_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "expires_in": 3600 })))
        .mount(&server)
        .await;

    let result = client.tokens().authenticate().await;
    assert!(
        matches!(result, Err(AuthError::MissingToken)),
        "expected MissingToken, got: {result:?}"
    );
}

#[tokio::test]
async fn test_missing_expiry_defaults_to_one_hour() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "t" })))
        .mount(&server)
        .await;

    let before = Utc::now();
    client.tokens().authenticate().await.unwrap();
    let expires_at = client.tokens().expires_at().await.unwrap();
    let lifetime = expires_at - before;
    assert!(lifetime >= TimeDelta::seconds(3600));
    assert!(lifetime < TimeDelta::seconds(3610));
}

// ── Signing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_signed_query_matches_sent_body() {
    let (server, client) = setup().await;
    mount_token(&server, "tok-1", 1).await;

    Mock::given(method("POST"))
        .and(path(AP_LIST_PATH))
        .and(body_json(json!({ "pageNum": 1, "pageSize": 100, "networkId": 42 })))
        .respond_with(ok_list(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client
        .list_access_points(Some(&NetworkId::Numeric(42)))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let signed = requests
        .iter()
        .find(|r| r.url.path() == AP_LIST_PATH)
        .unwrap();
    let query: HashMap<String, String> = signed.url.query_pairs().into_owned().collect();

    assert_eq!(query["access_token"], "tok-1");
    assert_eq!(query["appID"], APP_ID);
    let timestamp: i64 = query["timestamp"].parse().unwrap();
    assert!((Utc::now().timestamp_millis() - timestamp).abs() < 60_000);

    let body = String::from_utf8(signed.body.clone()).unwrap();
    let expected = signature::sign(
        &SigningParams {
            access_token: "tok-1",
            app_id: APP_ID,
            secret: SECRET,
            timestamp,
        },
        Some(&body),
    );
    assert_eq!(query["signature"], expected);
    assert_eq!(
        signed.headers.get("content-type").unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn test_extra_query_cannot_override_signed_fields() {
    let (server, client) = setup().await;
    mount_token(&server, "tok-1", 1).await;

    Mock::given(method("GET"))
        .and(path("/oapi/v1.0.0/custom"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let value = client
        .get(
            "/oapi/v1.0.0/custom",
            &[
                ("access_token", "forged".to_owned()),
                ("lang", "en".to_owned()),
            ],
        )
        .await
        .unwrap();
    assert_eq!(value["ok"], json!(true));

    let requests = server.received_requests().await.unwrap();
    let signed = requests
        .iter()
        .find(|r| r.url.path() == "/oapi/v1.0.0/custom")
        .unwrap();
    let tokens: Vec<_> = signed
        .url
        .query_pairs()
        .filter(|(k, _)| k == "access_token")
        .map(|(_, v)| v.into_owned())
        .collect();
    assert_eq!(tokens, vec!["tok-1".to_owned()]);
    assert!(signed.url.query_pairs().any(|(k, v)| k == "lang" && v == "en"));
}

// ── Failures ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let (server, client) = setup().await;
    mount_token(&server, "tok-1", 1).await;

    Mock::given(method("POST"))
        .and(path(NETWORK_LIST_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.list_networks().await;
    match result {
        Err(ref e @ Error::Http { status: 401, ref body }) => {
            assert_eq!(body, "token expired");
            assert!(e.is_auth());
        }
        other => panic!("expected Http 401, got: {other:?}"),
    }
    assert!(client.tokens().expires_at().await.is_none());
}

#[tokio::test]
async fn test_server_error_carries_status() {
    let (server, client) = setup().await;
    mount_token(&server, "tok-1", 1).await;

    Mock::given(method("POST"))
        .and(path(CLIENT_LIST_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let result = client.list_clients(None).await;
    assert!(
        matches!(result, Err(Error::Http { status: 502, .. })),
        "expected Http 502, got: {result:?}"
    );
}

#[tokio::test]
async fn test_non_json_body_is_deserialization_error() {
    let (server, client) = setup().await;
    mount_token(&server, "tok-1", 1).await;

    Mock::given(method("POST"))
        .and(path(NETWORK_LIST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = client.list_networks().await;
    match result {
        Err(Error::Deserialization { body, .. }) => assert!(body.contains("maintenance")),
        other => panic!("expected Deserialization, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = GwnClient::with_client(
        reqwest::Client::new(),
        credentials(&format!("http://127.0.0.1:{port}")),
    )
    .unwrap();

    let result = client.list_networks().await;
    match result {
        Err(ref e @ Error::Auth(ref auth)) => {
            assert!(auth.is_unreachable());
            assert!(e.is_transport());
        }
        other => panic!("expected Auth(Transport), got: {other:?}"),
    }
}
