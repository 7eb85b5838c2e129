// Web API response shapes
//
// The firmware is loose about types: the same flag shows up as "1", 1 or
// missing depending on version, so every field is read leniently into a
// string and compared as text by the caller.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Envelope for `appGet.cgi?hook=get_clientlist()`.
///
/// The inner map is keyed by MAC but also carries bookkeeping entries
/// (`maclist`, `ClientAPILevel`, ...) that are not client objects.
#[derive(Debug, Deserialize)]
pub(crate) struct ClientListEnvelope {
    pub get_clientlist: IndexMap<String, Value>,
}

/// One entry of the router's client list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub mac: String,
    #[serde(deserialize_with = "lenient_string")]
    pub ip: String,
    /// DHCP / mDNS derived device name.
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    /// User-assigned nickname.
    #[serde(rename = "nickName", deserialize_with = "lenient_string")]
    pub nick_name: String,
    /// Radio the client is attached to: "0" wired, "1" 2.4 GHz, "2" 5 GHz.
    #[serde(rename = "isWL", deserialize_with = "lenient_string")]
    pub is_wl: String,
    /// Guest network slot: "" primary, "1" guest.
    #[serde(rename = "isGN", deserialize_with = "lenient_string")]
    pub is_gn: String,
    #[serde(rename = "isOnline", deserialize_with = "lenient_string")]
    pub is_online: String,
}

impl ClientRecord {
    pub fn is_online(&self) -> bool {
        self.is_online == "1"
    }
}

/// Whether a `get_clientlist` map value is a client object rather than metadata.
pub(crate) fn is_client_entry(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| obj.contains_key("ip"))
}

/// Render any scalar JSON value as a string; `null` becomes empty.
pub(crate) fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(value_to_string)
}
