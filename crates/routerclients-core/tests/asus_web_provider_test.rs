#![allow(clippy::unwrap_used)]
// End-to-end tests for the web API strategy against a wiremock router.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use routerclients_core::{
    Client, CoreError, Interface, InterfaceType, MacAddress, RouterConfig, SnapshotSource,
    Transport, select_provider,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn config_for(server: &MockServer) -> RouterConfig {
    RouterConfig {
        transport: Transport::Http,
        host: Some(server.address().ip().to_string()),
        port: Some(server.address().port()),
        username: Some("admin".into()),
        password: Some(SecretString::from("secret".to_owned())),
        ..RouterConfig::default()
    }
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "asus_token=tok123; HttpOnly;")
                .set_body_json(json!({})),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Logout.asp"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

async fn mount_data(server: &MockServer, clients: Value, nvram: Value) {
    Mock::given(method("GET"))
        .and(path("/appGet.cgi"))
        .and(query_param("hook", "get_clientlist()"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "get_clientlist": clients })))
        .mount(server)
        .await;

    // Anything else on the hook endpoint is the batched nvram read.
    Mock::given(method("GET"))
        .and(path("/appGet.cgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(nvram))
        .with_priority(10)
        .mount(server)
        .await;
}

fn client_entry(mac: &str, name: &str, nick: &str, is_wl: &str, is_gn: &str, online: &str) -> Value {
    json!({
        "mac": mac,
        "ip": "192.168.1.50",
        "name": name,
        "nickName": nick,
        "isWL": is_wl,
        "isGN": is_gn,
        "isOnline": online,
    })
}

fn mac(raw: &str) -> MacAddress {
    MacAddress::parse(raw).unwrap()
}

fn home_nvram() -> Value {
    json!({
        "wl0_ssid": "Home%20Net",
        "wl0_auth_mode_x": "psk2",
        "wl0_bss_enabled": "1",
        "wl1_ssid": "Home5",
        "wl1_auth_mode_x": "psk2",
        "wl1_bss_enabled": "1",
        "wl0.1_ssid": "Guest",
        "wl0.1_auth_mode_x": "open",
        "wl0.1_bss_enabled": "1",
        "wl0.2_bss_enabled": "0",
        "wl0.3_bss_enabled": "0",
        "wl1.1_bss_enabled": "0",
        "wl1.2_bss_enabled": "0",
        "wl1.3_bss_enabled": "0",
    })
}

// ── Snapshot tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_snapshot_partitions_by_radio_tags() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_data(
        &server,
        json!({
            "AA:00:00:00:00:04": client_entry("AA:00:00:00:00:04", "NAS", "", "0", "", "1"),
            "AA:00:00:00:00:01": client_entry("AA:00:00:00:00:01", "Bob", "Al", "1", "", "1"),
            "AA:00:00:00:00:02": client_entry("AA:00:00:00:00:02", "Laptop", "", "2", "", "1"),
            "AA:00:00:00:00:03": client_entry("AA:00:00:00:00:03", "", "", "1", "1", "1"),
            "AA:00:00:00:00:05": client_entry("AA:00:00:00:00:05", "Old", "", "0", "", "0"),
            "maclist": ["AA:00:00:00:00:01"],
            "ClientAPILevel": "2",
        }),
        home_nvram(),
    )
    .await;

    let provider = select_provider(&config_for(&server)).unwrap();
    let interfaces = provider.snapshot().await.unwrap();

    assert_eq!(
        interfaces,
        vec![
            Interface::new(
                InterfaceType::Wifi24Ghz,
                true,
                Some("Home Net".into()),
                vec![Client::new(mac("aa:00:00:00:00:01"), Some("al".into()))],
            ),
            Interface::new(
                InterfaceType::Wifi5Ghz,
                true,
                Some("Home5".into()),
                vec![Client::new(mac("aa:00:00:00:00:02"), Some("laptop".into()))],
            ),
            Interface::new(
                InterfaceType::GuestWifi24Ghz,
                false,
                Some("Guest".into()),
                vec![Client::new(mac("aa:00:00:00:00:03"), Some(String::new()))],
            ),
            Interface::wired(vec![Client::new(mac("aa:00:00:00:00:04"), Some("nas".into()))]),
        ]
    );
}

#[tokio::test]
async fn test_disabled_radio_leaves_interface_without_ssid() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_data(
        &server,
        json!({
            "AA:00:00:00:00:02": client_entry("AA:00:00:00:00:02", "Laptop", "", "2", "", "1"),
        }),
        json!({ "wl1_ssid": "Home5", "wl1_bss_enabled": "0" }),
    )
    .await;

    let provider = select_provider(&config_for(&server)).unwrap();
    let interfaces = provider.snapshot().await.unwrap();

    assert_eq!(interfaces.len(), 1);
    assert_eq!(interfaces[0].interface_type, InterfaceType::Wifi5Ghz);
    assert_eq!(interfaces[0].ssid, None);
    assert!(!interfaces[0].is_protected);
}

// ── Failure tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_login_without_cookie_is_connection_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error_status": "3" })))
        .mount(&server)
        .await;

    let provider = select_provider(&config_for(&server)).unwrap();
    let result = provider.snapshot().await;

    assert!(
        matches!(result, Err(CoreError::Connection { .. })),
        "expected Connection error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_hook_failure_is_acquisition_error_with_status() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/appGet.cgi"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = select_provider(&config_for(&server)).unwrap();
    let result = provider.snapshot().await;

    match result {
        Err(CoreError::Acquisition { reason, .. }) => {
            assert!(reason.contains("500"), "reason should carry the status: {reason}");
        }
        other => panic!("expected Acquisition error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_logout_failure_does_not_fail_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "asus_token=tok123; HttpOnly;"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Logout.asp"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_data(
        &server,
        json!({
            "AA:00:00:00:00:04": client_entry("AA:00:00:00:00:04", "NAS", "", "0", "", "1"),
        }),
        json!({}),
    )
    .await;

    let provider = select_provider(&config_for(&server)).unwrap();
    let interfaces = provider.snapshot().await.unwrap();

    assert_eq!(interfaces.len(), 1);
}
