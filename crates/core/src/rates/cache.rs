//! The single-slot snapshot cache.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use log::debug;

use realdash_market_data::RateSnapshot;

/// Holds at most one snapshot, shared by reference with all readers.
///
/// `replace` swaps the whole `Arc` at once, so readers never observe a
/// partially updated snapshot, and exposure is monotonic in `captured_at`:
/// once a snapshot is visible, no older one ever becomes visible again.
#[derive(Default)]
pub struct RateCache {
    slot: RwLock<Option<Arc<RateSnapshot>>>,
}

impl RateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest snapshot, or `None` before the first fetch completes.
    pub fn current(&self) -> Option<Arc<RateSnapshot>> {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// `captured_at` of the latest snapshot, if any.
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        self.current().map(|snapshot| snapshot.captured_at)
    }

    /// Installs a new snapshot. Returns `false` when the candidate is older
    /// than the cached one and was ignored.
    pub fn replace(&self, snapshot: Arc<RateSnapshot>) -> bool {
        let mut slot = self
            .slot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(existing) = slot.as_ref() {
            if snapshot.captured_at < existing.captured_at {
                debug!(
                    "Ignoring stale snapshot captured at {} (cache holds {})",
                    snapshot.captured_at, existing.captured_at
                );
                return false;
            }
        }

        *slot = Some(snapshot);
        true
    }
}
