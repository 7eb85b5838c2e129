// ── ASUSWRT router family ──
//
// Two independent strategies for the same firmware: one drives the
// router's shell over SSH (`ssh`), the other its web UI's JSON hooks
// (`web`). They share nothing but the domain model.

mod parse;
pub mod ssh;
pub mod web;

pub use ssh::{AsusSshProvider, collect_interfaces};
pub use web::AsusWebProvider;
