// ── ASUS over the web management API ──
//
// Logs in the way the router's own UI does, then reads the client list and
// the radio configuration in parallel. Clients carry their own band/guest
// tags, so partitioning is a lookup rather than a merge.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use futures_util::{TryFutureExt, try_join};
use secrecy::SecretString;
use strum::IntoEnumIterator;
use tracing::{debug, info};
use url::Url;

use routerclients_api::{AsusWebClient, ClientRecord, SessionToken, TlsMode, TransportConfig};

use crate::config::{RouterConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{Client, Interface, InterfaceType, MacAddress, drop_empty};
use crate::provider::{RouterProvider, require};

const STRATEGY: &str = "asus-web";

/// nvram value meaning "this radio/BSS is on".
const ENABLED: &str = "1";

/// `auth_mode_x` value for an open network.
const OPEN_AUTH: &str = "open";

/// One broadcastable network: a primary radio or a guest slot.
struct RadioSlot {
    /// nvram prefix after `wl`: `0`, `1`, `0.1`, ...
    id: &'static str,
    /// Band tag as used by the client list (`1` = 2.4 GHz, `2` = 5 GHz).
    band: &'static str,
    /// Guest tag as used by the client list.
    guest: &'static str,
}

const RADIO_SLOTS: [RadioSlot; 8] = [
    RadioSlot { id: "0", band: "1", guest: "" },
    RadioSlot { id: "1", band: "2", guest: "" },
    RadioSlot { id: "0.1", band: "1", guest: "1" },
    RadioSlot { id: "0.2", band: "1", guest: "1" },
    RadioSlot { id: "0.3", band: "1", guest: "1" },
    RadioSlot { id: "1.1", band: "2", guest: "1" },
    RadioSlot { id: "1.2", band: "2", guest: "1" },
    RadioSlot { id: "1.3", band: "2", guest: "1" },
];

const SLOT_FIELDS: [&str; 3] = ["ssid", "auth_mode_x", "bss_enabled"];

/// `(isWL, isGN)` tag pair a client carries on each interface.
fn client_tags(interface_type: InterfaceType) -> (&'static str, &'static str) {
    match interface_type {
        InterfaceType::Wifi24Ghz => ("1", ""),
        InterfaceType::Wifi5Ghz => ("2", ""),
        InterfaceType::GuestWifi24Ghz => ("1", "1"),
        InterfaceType::GuestWifi5Ghz => ("2", "1"),
        InterfaceType::Wired => ("0", ""),
    }
}

/// An enabled slot with its decoded settings.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RadioSettings {
    band: &'static str,
    guest: &'static str,
    ssid: String,
    protected: bool,
}

// ── Provider ────────────────────────────────────────────────────────

/// Web API strategy for ASUSWRT routers.
#[derive(Debug)]
pub struct AsusWebProvider {
    client: AsusWebClient,
    host: String,
    username: String,
    password: SecretString,
}

impl AsusWebProvider {
    /// Validate `config` for web use. Requires host, username and password;
    /// the port defaults to the scheme's.
    pub fn new(config: &RouterConfig) -> Result<Self, CoreError> {
        let host = require(
            STRATEGY,
            "host",
            config.host.as_deref().filter(|h| !h.is_empty()),
        )?;
        let username = require(
            STRATEGY,
            "username",
            config.username.as_deref().filter(|u| !u.is_empty()),
        )?;
        let password = require(STRATEGY, "password", config.password.as_ref())?;
        let scheme = config.transport.scheme().ok_or_else(|| CoreError::Configuration {
            strategy: STRATEGY,
            field: "transport",
            reason: format!("`{}` is not a web transport", config.transport),
        })?;

        let authority = match config.port {
            Some(port) => format!("{host}:{port}"),
            None => host.to_owned(),
        };
        let base_url =
            Url::parse(&format!("{scheme}://{authority}")).map_err(|e| CoreError::Configuration {
                strategy: STRATEGY,
                field: "host",
                reason: format!("does not form a valid URL: {e}"),
            })?;

        let transport = TransportConfig {
            tls: tls_mode(&config.tls),
            timeout: config.timeout,
        };
        let client =
            AsusWebClient::new(base_url, &transport).map_err(|e| CoreError::Configuration {
                strategy: STRATEGY,
                field: "tls",
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            host: host.to_owned(),
            username: username.to_owned(),
            password: password.clone(),
        })
    }
}

fn tls_mode(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

#[async_trait]
impl RouterProvider for AsusWebProvider {
    type Session = SessionToken;

    fn name(&self) -> &'static str {
        STRATEGY
    }

    async fn connect(&self) -> Result<SessionToken, CoreError> {
        self.client
            .login(&self.username, &self.password)
            .await
            .map_err(|e| CoreError::connection(&self.host, &e))
    }

    async fn fetch_interfaces(&self, token: &SessionToken) -> Result<Vec<Interface>, CoreError> {
        let keys = nvram_keys();
        let (clients, nvram) = try_join!(
            self.client
                .client_list(token)
                .map_err(|e| CoreError::acquisition("get_clientlist", e)),
            self.client
                .nvram(token, &keys)
                .map_err(|e| CoreError::acquisition("nvram", e)),
        )?;

        let radios = enabled_radios(&nvram)?;
        debug!(
            clients = clients.len(),
            radios = radios.len(),
            "router datasets collected"
        );

        let interfaces = build_interfaces(&clients, &radios);
        info!(
            interfaces = interfaces.len(),
            "snapshot collected over web API"
        );
        Ok(interfaces)
    }

    async fn disconnect(&self, token: SessionToken) -> Result<(), CoreError> {
        self.client
            .logout(&token)
            .await
            .map_err(|e| CoreError::connection(&self.host, &e))
    }
}

// ── Normalization ───────────────────────────────────────────────────

fn nvram_keys() -> Vec<String> {
    RADIO_SLOTS
        .iter()
        .flat_map(|slot| {
            SLOT_FIELDS
                .iter()
                .map(move |field| format!("wl{}_{field}", slot.id))
        })
        .collect()
}

/// Settings of every slot whose `bss_enabled` is on, in slot order.
///
/// SSIDs arrive percent-encoded. A missing auth mode counts as protected.
fn enabled_radios(nvram: &HashMap<String, String>) -> Result<Vec<RadioSettings>, CoreError> {
    let lookup = |slot: &RadioSlot, field: &str| nvram.get(&format!("wl{}_{field}", slot.id));

    RADIO_SLOTS
        .iter()
        .filter(|slot| lookup(slot, "bss_enabled").is_some_and(|v| v == ENABLED))
        .map(|slot| -> Result<RadioSettings, CoreError> {
            let raw_ssid = lookup(slot, "ssid").map_or("", String::as_str);
            let ssid = urlencoding::decode(raw_ssid)
                .map_err(|e| {
                    CoreError::acquisition(
                        format!("wl{}_ssid", slot.id),
                        format!("undecodable SSID: {e}"),
                    )
                })?
                .into_owned();
            let protected = lookup(slot, "auth_mode_x").is_none_or(|mode| mode != OPEN_AUTH);
            Ok(RadioSettings {
                band: slot.band,
                guest: slot.guest,
                ssid,
                protected,
            })
        })
        .collect()
}

/// One interface per type, in enumeration order, empties dropped.
///
/// Only online clients count. Interface settings come from the first
/// enabled slot with the matching tags; none means no SSID, unprotected.
fn build_interfaces(clients: &[ClientRecord], radios: &[RadioSettings]) -> Vec<Interface> {
    let online: Vec<&ClientRecord> = clients.iter().filter(|c| c.is_online()).collect();

    let interfaces = InterfaceType::iter()
        .map(|interface_type| {
            let (band, guest) = client_tags(interface_type);
            let radio = radios.iter().find(|r| r.band == band && r.guest == guest);

            let mut seen = HashSet::new();
            let members = online
                .iter()
                .filter(|c| c.is_wl == band && c.is_gn == guest)
                .filter_map(|c| match MacAddress::parse(&c.mac) {
                    Ok(mac) => Some((mac, *c)),
                    Err(e) => {
                        debug!(error = %e, "skipping client with unreadable MAC");
                        None
                    }
                })
                .filter(|(mac, _)| seen.insert(mac.clone()))
                .map(|(mac, c)| Client::new(mac, Some(preferred_name(&c.name, &c.nick_name))))
                .collect();

            Interface::new(
                interface_type,
                radio.is_some_and(|r| r.protected),
                radio.map(|r| r.ssid.clone()),
                members,
            )
        })
        .collect();

    drop_empty(interfaces)
}

/// The shorter non-empty of the two names, lowercased; empty when neither
/// is set. Equal lengths favor the device name.
fn preferred_name(name: &str, nickname: &str) -> String {
    let chosen = match (name.is_empty(), nickname.is_empty()) {
        (false, false) if nickname.chars().count() < name.chars().count() => nickname,
        (false, _) => name,
        (true, _) => nickname,
    };
    chosen.to_lowercase()
}
