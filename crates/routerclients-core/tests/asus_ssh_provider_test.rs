#![allow(clippy::unwrap_used)]
// Tests for the SSH strategy's acquisition and merge, driven through a
// scripted in-memory shell instead of a live router.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use routerclients_api::{CommandOutput, CommandShell, Error};
use routerclients_core::provider::asus::collect_interfaces;
use routerclients_core::{Client, CoreError, Interface, InterfaceType, MacAddress};

// ── Scripted shell ──────────────────────────────────────────────────

#[derive(Default)]
struct ScriptedShell {
    replies: HashMap<String, CommandOutput>,
    log: Mutex<Vec<String>>,
}

impl ScriptedShell {
    fn reply(mut self, command: &str, stdout: &str) -> Self {
        self.replies.insert(
            command.to_owned(),
            CommandOutput {
                exit_status: 0,
                stdout: stdout.to_owned(),
                stderr: String::new(),
            },
        );
        self
    }

    fn fail(mut self, command: &str, status: u32, stderr: &str) -> Self {
        self.replies.insert(
            command.to_owned(),
            CommandOutput {
                exit_status: status,
                stdout: String::new(),
                stderr: stderr.to_owned(),
            },
        );
        self
    }

    fn ran(&self, command: &str) -> bool {
        self.log.lock().unwrap().iter().any(|c| c == command)
    }
}

#[async_trait]
impl CommandShell for ScriptedShell {
    async fn exec(&self, command: &str) -> Result<CommandOutput, Error> {
        self.log.lock().unwrap().push(command.to_owned());
        Ok(self.replies.get(command).cloned().unwrap_or_else(|| CommandOutput {
            exit_status: 127,
            stdout: String::new(),
            stderr: format!("sh: {command}: not found"),
        }))
    }
}

// ── Fixtures ────────────────────────────────────────────────────────

const ARP: &str = "\
? (192.168.1.10) at AA:00:00:00:00:01 [ether]  on br0
? (192.168.1.11) at aa:00:00:00:00:02 [ether]  on br0
? (192.168.1.12) at aa:00:00:00:00:03 [ether]  on br0
? (10.0.0.1) at aa:00:00:00:00:09 [ether]  on eth0
";

const LEASES: &str = "\
1700000000 aa:00:00:00:00:01 192.168.1.10 android-123 01:aa:00:00:00:00:01
1700000000 aa:00:00:00:00:02 192.168.1.11 * *
1700000000 aa:00:00:00:00:03 192.168.1.12 DESKTOP-9 01:aa:00:00:00:00:03
";

const NICKNAMES: &str = "<Alice Phone>AA:00:00:00:00:01>0>4>>\n";

fn status(ssid: &str, chanspec: &str) -> String {
    format!(
        "SSID: \"{ssid}\"\nMode: Managed\tRSSI: 0 dBm\tChannel: 6\nChanspec: {chanspec} channel 6 20MHz (0x1006)\n"
    )
}

fn radio(shell: ScriptedShell, ifname: &str, assoc: &[&str], chanspec: &str, auth: &str) -> ScriptedShell {
    let assoclist: String = assoc.iter().map(|m| format!("assoclist {m}\n")).collect();
    shell
        .reply(&format!("/usr/sbin/wl -i {ifname} assoclist"), &assoclist)
        .reply(&format!("/usr/sbin/wl -i {ifname} assoc"), &status("HomeNet", chanspec))
        .reply(&format!("/usr/sbin/wl -i {ifname} wpa_auth"), auth)
}

/// A router with a 2.4 GHz radio (plus one guest slot) and a 5 GHz radio.
fn home_router() -> ScriptedShell {
    let shell = ScriptedShell::default()
        .reply("/sbin/arp -n", ARP)
        .reply("/bin/cat /var/lib/misc/dnsmasq.leases", LEASES)
        .reply("/bin/nvram get custom_clientlist", NICKNAMES)
        .reply("/bin/nvram get wl0_ifname", "eth6\n")
        .reply("/bin/nvram get wl0_vifs", "wl0.1\n")
        .reply("/bin/nvram get wl1_ifname", "eth7\n")
        .reply("/bin/nvram get wl1_vifs", "\n");
    let shell = radio(
        shell,
        "eth6",
        &["AA:00:00:00:00:01", "AA:00:00:00:00:77"],
        "2.4GHz",
        "0x80 WPA2-PSK\n",
    );
    let shell = radio(shell, "wl0.1", &[], "2.4GHz", "0x0 Disabled\n");
    radio(shell, "eth7", &["AA:00:00:00:00:02"], "5GHz", "0x80 WPA2-PSK\n")
}

fn mac(raw: &str) -> MacAddress {
    MacAddress::parse(raw).unwrap()
}

// ── Snapshot tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_full_snapshot() {
    let shell = home_router();

    let interfaces = collect_interfaces(&shell).await.unwrap();

    assert_eq!(
        interfaces,
        vec![
            Interface::new(
                InterfaceType::Wifi24Ghz,
                true,
                Some("HomeNet".into()),
                vec![Client::new(mac("aa:00:00:00:00:01"), Some("alice phone".into()))],
            ),
            Interface::new(
                InterfaceType::Wifi5Ghz,
                true,
                Some("HomeNet".into()),
                vec![Client::new(mac("aa:00:00:00:00:02"), None)],
            ),
            Interface::wired(vec![Client::new(
                mac("aa:00:00:00:00:03"),
                Some("desktop-9".into()),
            )]),
        ]
    );
    assert!(shell.ran("/usr/sbin/wl -i wl0.1 assoclist"));
}

#[tokio::test]
async fn test_guest_interface_is_classified_by_name() {
    let shell = home_router().reply(
        "/usr/sbin/wl -i wl0.1 assoclist",
        "assoclist aa:00:00:00:00:03\n",
    );

    let interfaces = collect_interfaces(&shell).await.unwrap();

    let guest = interfaces
        .iter()
        .find(|i| i.interface_type == InterfaceType::GuestWifi24Ghz)
        .unwrap();
    assert!(!guest.is_protected);
    assert_eq!(guest.clients[0].mac, mac("aa:00:00:00:00:03"));
    assert!(interfaces.iter().all(|i| i.interface_type != InterfaceType::Wired));
}

#[tokio::test]
async fn test_unknown_frequency_fails_whole_fetch() {
    let shell = home_router().reply("/usr/sbin/wl -i eth7 assoc", &status("HomeNet", "6GHz"));

    let result = collect_interfaces(&shell).await;

    match result {
        Err(CoreError::Acquisition { step, reason }) => {
            assert_eq!(step, "/usr/sbin/wl -i eth7 assoc");
            assert!(reason.contains("\"6\""), "{reason}");
        }
        other => panic!("expected Acquisition error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_shell_metacharacters_in_interface_name_are_refused() {
    let shell = home_router().reply("/bin/nvram get wl0_vifs", "wl0.1 wl0.2;reboot\n");

    let result = collect_interfaces(&shell).await;

    match result {
        Err(CoreError::Acquisition { step, reason }) => {
            assert_eq!(step, "/bin/nvram get wl0_vifs");
            assert!(reason.contains("wl0.2;reboot"), "{reason}");
        }
        other => panic!("expected Acquisition error, got: {other:?}"),
    }
    assert!(!shell.ran("/usr/sbin/wl -i wl0.2;reboot assoclist"));
    assert!(!shell.ran("/usr/sbin/wl -i eth6 assoclist"));
}

#[tokio::test]
async fn test_failed_command_names_command_and_stderr() {
    let shell = home_router().fail(
        "/bin/cat /var/lib/misc/dnsmasq.leases",
        1,
        "cat: can't open '/var/lib/misc/dnsmasq.leases': No such file or directory",
    );

    let result = collect_interfaces(&shell).await;

    match result {
        Err(CoreError::Acquisition { step, reason }) => {
            assert_eq!(step, "/bin/cat /var/lib/misc/dnsmasq.leases");
            assert!(reason.contains("No such file or directory"), "{reason}");
        }
        other => panic!("expected Acquisition error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_mac_appears_in_at_most_one_interface() {
    let shell = home_router().reply(
        "/usr/sbin/wl -i eth7 assoclist",
        "assoclist AA:00:00:00:00:01\nassoclist AA:00:00:00:00:02\n",
    );

    let interfaces = collect_interfaces(&shell).await.unwrap();

    let mut all: Vec<&MacAddress> = interfaces
        .iter()
        .flat_map(|i| i.clients.iter().map(|c| &c.mac))
        .collect();
    let total = all.len();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), total);
    assert_eq!(total, 3);
}
