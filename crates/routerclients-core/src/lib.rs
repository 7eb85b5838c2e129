//! Router client snapshots on top of `routerclients-api`.
//!
//! This crate turns what a home router knows about its attached devices
//! into one normalized shape, whatever the transport:
//!
//! - **Domain model** ([`model`]) - [`Interface`], [`Client`] and the closed
//!   [`InterfaceType`] set. Empty interfaces never leave this crate.
//!
//! - **Providers** ([`provider`]) - the [`RouterProvider`] contract
//!   (connect, fetch, disconnect) and its ASUSWRT strategies, one over
//!   SSH and one over the web management API.
//!   [`select_provider`] picks and validates one from a [`RouterConfig`].
//!
//! - **New-client tracking** - [`NewClientTracker`] flags devices first
//!   seen within a recency window, backed by a [`FirstSeenStore`].
//!
//! - **[`RouterMonitor`]** - the request/response exchange used by
//!   front ends: one [`FetchRequest`] in, one [`FetchResponse`] out.

pub mod config;
pub mod error;
pub mod model;
pub mod monitor;
pub mod provider;
pub mod store;
pub mod tracker;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{RouterConfig, RouterFamily, TlsVerification, Transport};
pub use error::CoreError;
pub use model::{Client, Interface, InterfaceType, MacAddress};
pub use monitor::{FetchRequest, FetchResponse, RouterMonitor};
pub use provider::{RouterProvider, SnapshotSource, select_provider};
pub use store::FirstSeenStore;
pub use tracker::{NewClientTracker, TrackedClient, TrackedInterface};
