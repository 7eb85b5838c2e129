// ── ASUS over SSH ──
//
// Runs diagnostic commands on the router and merges four datasets: the
// ARP table (who is connected at all), DHCP leases and the admin's
// nickname list (what they are called), and per-radio association lists
// (which radio they are on). Whatever is connected but on no radio is
// wired.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use futures_util::future::try_join_all;
use futures_util::try_join;
use indexmap::IndexSet;
use tracing::{debug, info};

use routerclients_api::{CommandShell, SshAuth, SshSession, SshTarget};

use super::parse;
use crate::config::RouterConfig;
use crate::error::CoreError;
use crate::model::{Client, Interface, InterfaceType, MacAddress, drop_empty};
use crate::provider::{RouterProvider, require};

const STRATEGY: &str = "asus-ssh";

const ARP_COMMAND: &str = "/sbin/arp -n";
const LEASES_COMMAND: &str = "/bin/cat /var/lib/misc/dnsmasq.leases";
const NICKNAMES_COMMAND: &str = "/bin/nvram get custom_clientlist";

/// Radio indices probed for interface names (2.4 GHz and 5 GHz).
const RADIOS: [u8; 2] = [0, 1];

/// Band as reported on a radio's `Chanspec:` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Band {
    Ghz24,
    Ghz5,
}

impl Band {
    fn from_ghz(token: &str) -> Option<Self> {
        match token {
            "2.4" => Some(Self::Ghz24),
            "5" => Some(Self::Ghz5),
            _ => None,
        }
    }

    fn interface_type(self, guest: bool) -> InterfaceType {
        match (self, guest) {
            (Self::Ghz24, false) => InterfaceType::Wifi24Ghz,
            (Self::Ghz5, false) => InterfaceType::Wifi5Ghz,
            (Self::Ghz24, true) => InterfaceType::GuestWifi24Ghz,
            (Self::Ghz5, true) => InterfaceType::GuestWifi5Ghz,
        }
    }
}

/// Everything learned about one wireless interface.
#[derive(Debug)]
struct RadioStatus {
    interface_type: InterfaceType,
    ssid: String,
    protected: bool,
    associated: Vec<MacAddress>,
}

/// Name sources, by precedence: admin nickname, then DHCP hostname.
#[derive(Debug, Default)]
struct NameBook {
    nicknames: HashMap<MacAddress, String>,
    device_names: HashMap<MacAddress, Option<String>>,
}

impl NameBook {
    fn resolve(&self, mac: &MacAddress) -> Option<String> {
        self.nicknames
            .get(mac)
            .cloned()
            .or_else(|| self.device_names.get(mac).cloned().flatten())
            .filter(|name| !name.is_empty())
            .map(|name| name.to_lowercase())
    }

    fn client(&self, mac: MacAddress) -> Client {
        let name = self.resolve(&mac);
        Client::new(mac, name)
    }
}

// ── Provider ────────────────────────────────────────────────────────

/// SSH strategy for ASUSWRT routers.
#[derive(Debug)]
pub struct AsusSshProvider {
    target: SshTarget,
    auth: SshAuth,
}

impl AsusSshProvider {
    /// Validate `config` for SSH use.
    ///
    /// Requires host, port, username and one credential. An in-memory key
    /// wins over a key file, which wins over a password.
    pub fn new(config: &RouterConfig) -> Result<Self, CoreError> {
        let host = require(
            STRATEGY,
            "host",
            config.host.as_deref().filter(|h| !h.is_empty()),
        )?;
        let port = *require(STRATEGY, "port", config.port.as_ref())?;
        let username = require(
            STRATEGY,
            "username",
            config.username.as_deref().filter(|u| !u.is_empty()),
        )?;

        let auth = if let Some(key) = &config.private_key {
            SshAuth::PrivateKey(key.clone())
        } else if let Some(path) = &config.private_key_path {
            SshAuth::PrivateKeyFile(path.clone())
        } else if let Some(password) = &config.password {
            SshAuth::Password(password.clone())
        } else {
            return Err(CoreError::Configuration {
                strategy: STRATEGY,
                field: "password",
                reason: "is required when no private key is configured".into(),
            });
        };

        Ok(Self {
            target: SshTarget {
                host: host.to_owned(),
                port,
                username: username.to_owned(),
                timeout: config.timeout,
            },
            auth,
        })
    }
}

#[async_trait]
impl RouterProvider for AsusSshProvider {
    type Session = SshSession;

    fn name(&self) -> &'static str {
        STRATEGY
    }

    async fn connect(&self) -> Result<SshSession, CoreError> {
        SshSession::connect(&self.target, &self.auth)
            .await
            .map_err(|e| CoreError::connection(&self.target.host, &e))
    }

    async fn fetch_interfaces(&self, session: &SshSession) -> Result<Vec<Interface>, CoreError> {
        collect_interfaces(session).await
    }

    async fn disconnect(&self, session: SshSession) -> Result<(), CoreError> {
        session
            .close()
            .await
            .map_err(|e| CoreError::connection(&self.target.host, &e))
    }
}

// ── Acquisition ─────────────────────────────────────────────────────

/// Build a snapshot from any shell on an ASUSWRT router.
///
/// Independent commands run concurrently. Any failed command or
/// unreadable radio status fails the whole snapshot.
pub async fn collect_interfaces<S: CommandShell + ?Sized>(
    shell: &S,
) -> Result<Vec<Interface>, CoreError> {
    let (arp, leases, nicknames, radios) = try_join!(
        run(shell, ARP_COMMAND),
        run(shell, LEASES_COMMAND),
        run(shell, NICKNAMES_COMMAND),
        wireless_radios(shell),
    )?;

    let connected = parse::arp_table(&arp);
    let names = NameBook {
        nicknames: parse::nicknames(&nicknames),
        device_names: parse::leases(&leases),
    };
    debug!(
        connected = connected.len(),
        named = names.nicknames.len() + names.device_names.len(),
        radios = radios.len(),
        "router datasets collected"
    );

    let interfaces = merge(&connected, &names, radios);
    info!(
        interfaces = interfaces.len(),
        clients = connected.len(),
        "snapshot collected over SSH"
    );
    Ok(interfaces)
}

async fn run<S: CommandShell + ?Sized>(shell: &S, command: &str) -> Result<String, CoreError> {
    shell
        .exec_checked(command)
        .await
        .map_err(|e| CoreError::acquisition(command, e))
}

/// Discover every wireless interface, then probe each one.
async fn wireless_radios<S: CommandShell + ?Sized>(
    shell: &S,
) -> Result<Vec<RadioStatus>, CoreError> {
    let per_radio = try_join_all(RADIOS.iter().map(|radio| radio_interfaces(shell, *radio))).await?;
    let ifnames: Vec<String> = per_radio.into_iter().flatten().collect();
    debug!(?ifnames, "wireless interfaces discovered");

    try_join_all(ifnames.iter().map(|ifname| probe_radio(shell, ifname))).await
}

async fn radio_interfaces<S: CommandShell + ?Sized>(
    shell: &S,
    radio: u8,
) -> Result<Vec<String>, CoreError> {
    let primary_cmd = format!("/bin/nvram get wl{radio}_ifname");
    let guests_cmd = format!("/bin/nvram get wl{radio}_vifs");
    let (primary, guests) = try_join!(run(shell, &primary_cmd), run(shell, &guests_cmd))?;
    let ifnames = parse::interface_names(&primary, &guests);
    if let Some(bad) = ifnames.iter().find(|name| !parse::is_safe_ifname(name)) {
        let step = if *bad == primary.trim() { primary_cmd } else { guests_cmd };
        return Err(CoreError::acquisition(
            step,
            format!("refusing unsafe interface name {bad:?}"),
        ));
    }
    Ok(ifnames)
}

async fn probe_radio<S: CommandShell + ?Sized>(
    shell: &S,
    ifname: &str,
) -> Result<RadioStatus, CoreError> {
    let assoclist_cmd = format!("/usr/sbin/wl -i {ifname} assoclist");
    let status_cmd = format!("/usr/sbin/wl -i {ifname} assoc");
    let auth_cmd = format!("/usr/sbin/wl -i {ifname} wpa_auth");

    let (assoclist, status, auth) = try_join!(
        run(shell, &assoclist_cmd),
        run(shell, &status_cmd),
        run(shell, &auth_cmd),
    )?;

    let ssid = parse::ssid(&status)
        .ok_or_else(|| CoreError::acquisition(status_cmd.as_str(), "no SSID in radio status"))?;
    let ghz = parse::chanspec_ghz(&status)
        .ok_or_else(|| CoreError::acquisition(status_cmd.as_str(), "no Chanspec in radio status"))?;
    let band = Band::from_ghz(ghz).ok_or_else(|| {
        CoreError::acquisition(
            status_cmd.as_str(),
            format!("unrecognized frequency {ghz:?} GHz"),
        )
    })?;

    Ok(RadioStatus {
        interface_type: band.interface_type(parse::is_guest_interface(ifname)),
        ssid,
        protected: parse::is_protected(&auth),
        associated: parse::assoclist(&assoclist),
    })
}

// ── Merge ───────────────────────────────────────────────────────────

/// Wireless interfaces in discovery order, then wired, empties dropped.
///
/// A station only counts if it is also in the ARP table. A MAC that shows
/// up on two radios stays with the first.
fn merge(
    connected: &IndexSet<MacAddress>,
    names: &NameBook,
    radios: Vec<RadioStatus>,
) -> Vec<Interface> {
    let mut claimed: HashSet<MacAddress> = HashSet::new();
    let mut interfaces = Vec::with_capacity(radios.len() + 1);

    for radio in radios {
        let clients = radio
            .associated
            .into_iter()
            .filter(|mac| connected.contains(mac))
            .filter(|mac| claimed.insert(mac.clone()))
            .map(|mac| names.client(mac))
            .collect();
        interfaces.push(Interface::new(
            radio.interface_type,
            radio.protected,
            Some(radio.ssid),
            clients,
        ));
    }

    let wired = connected
        .iter()
        .filter(|mac| !claimed.contains(*mac))
        .map(|mac| names.client(mac.clone()))
        .collect();
    interfaces.push(Interface::wired(wired));

    drop_empty(interfaces)
}
