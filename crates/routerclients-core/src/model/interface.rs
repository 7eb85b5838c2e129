// ── Interface / Client domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::mac::MacAddress;

/// The fixed set of network segments a client can be attached to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum InterfaceType {
    #[serde(rename = "WIFI_2_4G")]
    #[strum(serialize = "WIFI_2_4G")]
    Wifi24Ghz,
    #[serde(rename = "WIFI_5G")]
    #[strum(serialize = "WIFI_5G")]
    Wifi5Ghz,
    #[serde(rename = "GUEST_WIFI_2_4G")]
    #[strum(serialize = "GUEST_WIFI_2_4G")]
    GuestWifi24Ghz,
    #[serde(rename = "GUEST_WIFI_5G")]
    #[strum(serialize = "GUEST_WIFI_5G")]
    GuestWifi5Ghz,
    #[serde(rename = "WIRED")]
    #[strum(serialize = "WIRED")]
    Wired,
}

/// A device attached to one interface during one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub mac: MacAddress,
    /// Human name, when the router knows one.
    pub name: Option<String>,
}

impl Client {
    pub fn new(mac: MacAddress, name: Option<String>) -> Self {
        Self { mac, name }
    }
}

/// One network segment and the clients on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    #[serde(rename = "type")]
    pub interface_type: InterfaceType,
    pub is_protected: bool,
    /// `None` for wired, and for radios whose SSID is unknown.
    pub ssid: Option<String>,
    pub clients: Vec<Client>,
}

impl Interface {
    pub fn new(
        interface_type: InterfaceType,
        is_protected: bool,
        ssid: Option<String>,
        clients: Vec<Client>,
    ) -> Self {
        Self {
            interface_type,
            is_protected,
            ssid,
            clients,
        }
    }

    /// The wired segment: no SSID, never protected.
    pub fn wired(clients: Vec<Client>) -> Self {
        Self::new(InterfaceType::Wired, false, None, clients)
    }
}

/// Remove interfaces that ended up with no clients, keeping order.
pub fn drop_empty(interfaces: Vec<Interface>) -> Vec<Interface> {
    interfaces
        .into_iter()
        .filter(|iface| !iface.clients.is_empty())
        .collect()
}
