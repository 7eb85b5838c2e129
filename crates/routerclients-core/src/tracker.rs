// ── New-client tracking ──
//
// Annotates a snapshot with a `new` flag per client. Every fetched MAC is
// recorded in the store whether or not persistence is on; persistence
// only decides whether the store is flushed afterwards.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{Interface, InterfaceType, MacAddress};
use crate::store::FirstSeenStore;

/// A client as presented to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedClient {
    pub name: Option<String>,
    pub mac: MacAddress,
    pub new: bool,
}

/// An interface as presented to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedInterface {
    #[serde(rename = "type")]
    pub interface_type: InterfaceType,
    pub protected: bool,
    pub ssid: Option<String>,
    pub clients: Vec<TrackedClient>,
}

/// Classifies clients as new or known against a [`FirstSeenStore`].
#[derive(Debug, Default)]
pub struct NewClientTracker {
    store: FirstSeenStore,
}

impl NewClientTracker {
    pub fn new(store: FirstSeenStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &FirstSeenStore {
        &self.store
    }

    /// Record every MAC in `interfaces` and flag those first seen less than
    /// `recency_window` before `now`.
    ///
    /// With `persist`, the store is flushed afterwards; a failed flush is
    /// logged and does not affect the result.
    pub fn track(
        &mut self,
        interfaces: Vec<Interface>,
        now: DateTime<Utc>,
        recency_window: Duration,
        persist: bool,
    ) -> Vec<TrackedInterface> {
        let now_ms = now.timestamp_millis();
        let window_ms = i64::try_from(recency_window.as_millis()).unwrap_or(i64::MAX);
        let before = self.store.len();

        let tracked = interfaces
            .into_iter()
            .map(|iface| TrackedInterface {
                interface_type: iface.interface_type,
                protected: iface.is_protected,
                ssid: iface.ssid,
                clients: iface
                    .clients
                    .into_iter()
                    .map(|client| {
                        let unseen = self.store.first_seen(&client.mac).is_none();
                        let first_seen = self.store.observe(&client.mac, now_ms);
                        TrackedClient {
                            new: unseen || now_ms.saturating_sub(first_seen) < window_ms,
                            name: client.name,
                            mac: client.mac,
                        }
                    })
                    .collect(),
            })
            .collect();

        debug!(
            recorded = self.store.len() - before,
            known = self.store.len(),
            "first-seen store updated"
        );

        if persist {
            if let Err(e) = self.store.flush() {
                warn!(error = %e, "failed to persist first-seen store");
            }
        }

        tracked
    }
}
