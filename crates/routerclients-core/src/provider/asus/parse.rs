// ── Command output parsers (SSH strategy) ──
//
// Router diagnostics are free text. Every parser here is tolerant: a line
// that doesn't have the expected shape is skipped, never fatal. Values the
// merge can't do without (SSID, frequency) are returned as `Option` so the
// caller decides how loudly to fail.

use std::collections::HashMap;
use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;

use crate::model::MacAddress;

/// Bridge interface carrying LAN traffic.
const LAN_BRIDGE: &str = "br0";

/// DHCP lease placeholder for "no hostname".
const LEASE_NO_NAME: &str = "*";

/// Guest virtual interfaces are named `wl<radio>.<slot>`.
const GUEST_PREFIX: &str = "wl";

static ARP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\(([0-9.]+)\) at ([0-9a-fA-F:]+).*on {LAN_BRIDGE}"
    ))
    .expect("ARP pattern is valid")
});

static NICKNAME_RECORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)>(.*?)>").expect("nickname pattern is valid"));

static ASSOCLIST_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"assoclist (\S+)").expect("assoclist pattern is valid"));

static SSID_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"SSID: "(.*)""#).expect("SSID pattern is valid"));

static CHANSPEC_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Chanspec: (.*?)GHz").expect("chanspec pattern is valid"));

static IFNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("ifname pattern is valid"));

/// MACs with a live ARP entry on the LAN bridge, in table order, deduplicated.
pub(super) fn arp_table(output: &str) -> IndexSet<MacAddress> {
    output
        .lines()
        .filter_map(|line| ARP_LINE.captures(line))
        .filter_map(|caps| MacAddress::parse(&caps[2]).ok())
        .collect()
}

/// dnsmasq lease file: `<expiry> <mac> <ip> <hostname> <client-id>`.
///
/// The first lease for a MAC wins.
pub(super) fn leases(output: &str) -> HashMap<MacAddress, Option<String>> {
    let mut names = HashMap::new();
    for line in output.lines() {
        let cols: Vec<&str> = line.split_whitespace().collect();
        let (Some(mac), Some(name)) = (cols.get(1), cols.get(3)) else {
            continue;
        };
        let Ok(mac) = MacAddress::parse(mac) else {
            continue;
        };
        let name = (*name != LEASE_NO_NAME).then(|| (*name).to_owned());
        names.entry(mac).or_insert(name);
    }
    names
}

/// `custom_clientlist` nvram value: `<name>mac>...<name>mac>...`.
pub(super) fn nicknames(output: &str) -> HashMap<MacAddress, String> {
    let mut names = HashMap::new();
    for record in output.trim().split('<') {
        let Some(caps) = NICKNAME_RECORD.captures(record) else {
            continue;
        };
        let Ok(mac) = MacAddress::parse(&caps[2]) else {
            continue;
        };
        let name = caps[1].trim();
        if !name.is_empty() {
            names.entry(mac).or_insert_with(|| name.to_owned());
        }
    }
    names
}

/// Primary interface name plus the space-separated guest list for one radio.
pub(super) fn interface_names(primary: &str, guests: &str) -> Vec<String> {
    std::iter::once(primary.trim())
        .chain(guests.split_whitespace())
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

/// `wl assoclist`: one `assoclist <MAC>` line per associated station.
pub(super) fn assoclist(output: &str) -> Vec<MacAddress> {
    output
        .lines()
        .filter_map(|line| ASSOCLIST_LINE.captures(line))
        .filter_map(|caps| MacAddress::parse(&caps[1]).ok())
        .collect()
}

/// SSID from a `wl assoc` status block.
pub(super) fn ssid(status: &str) -> Option<String> {
    SSID_LINE.captures(status).map(|caps| caps[1].to_owned())
}

/// The number in front of `GHz` on the `Chanspec:` line.
pub(super) fn chanspec_ghz(status: &str) -> Option<&str> {
    CHANSPEC_LINE
        .captures(status)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// `wl wpa_auth` prints `0x0 Disabled` for open networks.
pub(super) fn is_protected(wpa_auth: &str) -> bool {
    !wpa_auth
        .split_whitespace()
        .any(|token| token.eq_ignore_ascii_case("disabled"))
}

/// Interface names are interpolated into `wl -i` commands unquoted.
pub(super) fn is_safe_ifname(ifname: &str) -> bool {
    IFNAME.is_match(ifname)
}

pub(super) fn is_guest_interface(ifname: &str) -> bool {
    ifname.starts_with(GUEST_PREFIX)
}
