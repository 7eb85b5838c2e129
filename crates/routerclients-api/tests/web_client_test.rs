#![allow(clippy::unwrap_used)]
// Integration tests for `AsusWebClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use routerclients_api::{AsusWebClient, Error, SessionToken};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AsusWebClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = AsusWebClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn password(raw: &str) -> SecretString {
    SecretString::from(raw.to_owned())
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_returns_token_from_cookie() {
    let (server, client) = setup().await;

    // base64("admin:secret")
    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .and(body_string("login_authorization=YWRtaW46c2VjcmV0"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "asus_token=tok123; HttpOnly;")
                .set_body_json(json!({})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/appGet.cgi"))
        .and(header("cookie", "asus_token=tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "get_clientlist": {} })))
        .mount(&server)
        .await;

    let token = client.login("admin", &password("secret")).await.unwrap();
    let clients = client.client_list(&token).await.unwrap();
    assert!(clients.is_empty());
}

#[tokio::test]
async fn test_login_without_cookie_is_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error_status": "3" })))
        .mount(&server)
        .await;

    let result = client.login("admin", &password("wrong")).await;

    assert!(
        matches!(result, Err(Error::MissingSessionCookie { .. })),
        "expected MissingSessionCookie, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_http_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = client.login("admin", &password("secret")).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

// ── Client list tests ───────────────────────────────────────────────

#[tokio::test]
async fn test_client_list_skips_metadata_entries() {
    let (server, client) = setup().await;

    let body = json!({
        "get_clientlist": {
            "AA:BB:CC:DD:EE:01": {
                "mac": "AA:BB:CC:DD:EE:01",
                "ip": "192.168.1.10",
                "name": "Laptop",
                "nickName": "",
                "isWL": "1",
                "isGN": "",
                "isOnline": "1"
            },
            "maclist": ["AA:BB:CC:DD:EE:01", "AA:BB:CC:DD:EE:02"],
            "ClientAPILevel": "2",
            "AA:BB:CC:DD:EE:02": {
                "mac": "AA:BB:CC:DD:EE:02",
                "ip": "192.168.1.11",
                "isWL": "0",
                "isOnline": "0"
            }
        }
    });

    Mock::given(method("GET"))
        .and(path("/appGet.cgi"))
        .and(query_param("hook", "get_clientlist()"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let clients = client
        .client_list(&SessionToken::new("tok"))
        .await
        .unwrap();

    assert_eq!(clients.len(), 2);
    assert_eq!(clients[0].mac, "AA:BB:CC:DD:EE:01");
    assert_eq!(clients[0].name, "Laptop");
    assert!(clients[0].is_online());
    assert_eq!(clients[1].is_wl, "0");
    assert!(!clients[1].is_online());
}

#[tokio::test]
async fn test_client_list_http_error_carries_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/appGet.cgi"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.client_list(&SessionToken::new("tok")).await;

    match result {
        Err(Error::Http { status, ref endpoint }) => {
            assert_eq!(status, 500);
            assert_eq!(endpoint, "get_clientlist");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

// ── nvram tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_nvram_batches_keys_into_one_hook() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/appGet.cgi"))
        .and(query_param(
            "hook",
            "nvram_char_to_ascii(wl0_ssid,wl0_ssid);nvram_char_to_ascii(wl0_bss_enabled,wl0_bss_enabled)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "wl0_ssid": "Home%20Net",
            "wl0_bss_enabled": 1
        })))
        .mount(&server)
        .await;

    let keys = vec!["wl0_ssid".to_owned(), "wl0_bss_enabled".to_owned()];
    let values = client.nvram(&SessionToken::new("tok"), &keys).await.unwrap();

    assert_eq!(values["wl0_ssid"], "Home%20Net");
    assert_eq!(values["wl0_bss_enabled"], "1");
}

#[tokio::test]
async fn test_logout() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/Logout.asp"))
        .and(header("cookie", "asus_token=tok"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.logout(&SessionToken::new("tok")).await.unwrap();
}
