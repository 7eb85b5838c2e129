//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders a tracked snapshot in the format selected by `--output`. Table
//! uses `tabled` with one row per client, structured formats serialize the
//! same view the exchange messages carry, plain emits one MAC per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use routerclients_core::TrackedInterface;

use crate::cli::{ColorMode, OutputFormat};

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "Interface")]
    interface: String,
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Secured")]
    secured: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "New")]
    new: String,
}

fn rows(interfaces: &[TrackedInterface], color: bool) -> Vec<ClientRow> {
    interfaces
        .iter()
        .flat_map(|iface| {
            iface.clients.iter().map(move |client| ClientRow {
                interface: iface.interface_type.to_string(),
                ssid: iface.ssid.clone().unwrap_or_else(|| "-".into()),
                secured: if iface.protected { "yes" } else { "no" }.into(),
                mac: client.mac.to_string(),
                name: client
                    .name
                    .clone()
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| "-".into()),
                new: match (client.new, color) {
                    (true, true) => "NEW".green().bold().to_string(),
                    (true, false) => "NEW".into(),
                    (false, _) => String::new(),
                },
            })
        })
        .collect()
}

// ── Render dispatcher ───────────────────────────────────────────────

/// Render a snapshot in the chosen format.
pub fn render_snapshot(
    format: &OutputFormat,
    interfaces: &[TrackedInterface],
    color: bool,
) -> String {
    match format {
        OutputFormat::Table => {
            if interfaces.is_empty() {
                return "No clients connected.".into();
            }
            Table::new(rows(interfaces, color))
                .with(Style::rounded())
                .to_string()
        }
        OutputFormat::Json => render_json_pretty(interfaces),
        OutputFormat::JsonCompact => render_json_compact(interfaces),
        OutputFormat::Yaml => render_yaml(interfaces),
        OutputFormat::Plain => interfaces
            .iter()
            .flat_map(|iface| &iface.clients)
            .map(|client| client.mac.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Keep only clients flagged new, dropping interfaces left empty.
pub fn only_new(interfaces: Vec<TrackedInterface>) -> Vec<TrackedInterface> {
    interfaces
        .into_iter()
        .filter_map(|mut iface| {
            iface.clients.retain(|c| c.new);
            (!iface.clients.is_empty()).then_some(iface)
        })
        .collect()
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub(crate) fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

pub(crate) fn render_json_compact<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).expect("serialization should not fail")
}

pub(crate) fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}
