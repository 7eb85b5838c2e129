// ── Domain model ──
//
// Canonical, protocol-agnostic records every strategy produces.

pub mod interface;
pub mod mac;

pub use interface::{Client, Interface, InterfaceType, drop_empty};
pub use mac::MacAddress;
