// ── FirstSeenStore ──
//
// MAC → first-seen epoch milliseconds. Entries are only ever added. The
// on-disk form is a flat JSON object; a missing or unreadable file loads
// as an empty store so a corrupt file never blocks fetching.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::MacAddress;

/// Persistable record of when each device was first observed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FirstSeenStore {
    path: Option<PathBuf>,
    entries: BTreeMap<String, i64>,
}

impl FirstSeenStore {
    /// A store with no backing file. [`flush`](Self::flush) is a no-op.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the store backed by `path`.
    ///
    /// Best-effort: an absent file is an empty store, an unreadable one is
    /// logged and also treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<BTreeMap<String, i64>>(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "first-seen store is corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no first-seen store yet");
                BTreeMap::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read first-seen store, starting empty");
                BTreeMap::new()
            }
        };
        debug!(path = %path.display(), entries = entries.len(), "first-seen store loaded");
        Self {
            path: Some(path),
            entries,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn first_seen(&self, mac: &MacAddress) -> Option<i64> {
        self.entries.get(mac.as_str()).copied()
    }

    /// Return the first-seen time for `mac`, recording `now_ms` if the MAC
    /// has never been observed. Existing entries are never changed.
    pub fn observe(&mut self, mac: &MacAddress, now_ms: i64) -> i64 {
        *self.entries.entry(mac.as_str().to_owned()).or_insert(now_ms)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the whole mapping to the backing file, creating parent
    /// directories as needed.
    pub fn flush(&self) -> Result<(), CoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let store_err = |reason: String| CoreError::Store {
            path: path.display().to_string(),
            reason,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| store_err(e.to_string()))?;
        }
        let json = serde_json::to_string(&self.entries).map_err(|e| store_err(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| store_err(e.to_string()))?;

        debug!(path = %path.display(), entries = self.entries.len(), "first-seen store flushed");
        Ok(())
    }
}
