// ── Request/response exchange ──
//
// The presentation side sends a `FetchRequest` and gets back one
// `FetchResponse`. `RouterMonitor` owns the process-wide tracker and
// serializes fetches through it, so the first-seen store only ever has
// one writer.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::RouterConfig;
use crate::error::CoreError;
use crate::provider::{SnapshotSource, select_provider};
use crate::store::FirstSeenStore;
use crate::tracker::{NewClientTracker, TrackedInterface};

/// Ask for one snapshot of the router described by `config`.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub config: RouterConfig,
}

/// Outcome of a [`FetchRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchResponse {
    RouterData { interfaces: Vec<TrackedInterface> },
    RouterDataError { message: String },
}

/// Runs fetches and tracks new clients across them.
#[derive(Debug)]
pub struct RouterMonitor {
    tracker: Mutex<NewClientTracker>,
}

impl RouterMonitor {
    pub fn new(store: FirstSeenStore) -> Self {
        Self {
            tracker: Mutex::new(NewClientTracker::new(store)),
        }
    }

    /// Select a strategy for `config`, take one snapshot and classify its
    /// clients.
    pub async fn fetch(&self, config: &RouterConfig) -> Result<Vec<TrackedInterface>, CoreError> {
        let source = select_provider(config)?;
        self.fetch_from(source.as_ref(), config).await
    }

    /// Like [`fetch`](Self::fetch) with an already constructed source.
    pub async fn fetch_from(
        &self,
        source: &dyn SnapshotSource,
        config: &RouterConfig,
    ) -> Result<Vec<TrackedInterface>, CoreError> {
        // Held across the whole fetch: one session per router at a time.
        let mut tracker = self.tracker.lock().await;

        let interfaces = source.snapshot().await?;
        let tracked = tracker.track(interfaces, Utc::now(), config.recency_window, config.persist);

        info!(
            provider = source.name(),
            interfaces = tracked.len(),
            new = tracked
                .iter()
                .flat_map(|i| &i.clients)
                .filter(|c| c.new)
                .count(),
            "fetch complete"
        );
        Ok(tracked)
    }

    /// Answer a request, turning any failure into an error response.
    pub async fn handle(&self, request: FetchRequest) -> FetchResponse {
        match self.fetch(&request.config).await {
            Ok(interfaces) => FetchResponse::RouterData { interfaces },
            Err(e) => {
                warn!(error = %e, "fetch failed");
                FetchResponse::RouterDataError {
                    message: e.to_string(),
                }
            }
        }
    }
}
