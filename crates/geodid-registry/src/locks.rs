//! Per-identifier write serialization.
//!
//! Pinning a document is a read-modify-write against the registry that spans
//! several backend round trips. [`IdentifierLocks`] hands out one async mutex
//! per identifier so that concurrent pins of the same GeoDID are applied one
//! after another, while pins of different GeoDIDs never contend.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use geodid_types::GeoDid;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::trace;

/// Keyed async lock table.
///
/// Slots are created on demand and pruned once nobody holds or waits on
/// them, so the table only grows with the number of identifiers in flight.
#[derive(Debug, Default)]
pub struct IdentifierLocks {
    slots: Mutex<HashMap<GeoDid, Arc<AsyncMutex<()>>>>,
}

/// Exclusive write access to one identifier. Released on drop.
pub struct IdentifierGuard {
    geodid: GeoDid,
    _guard: OwnedMutexGuard<()>,
}

impl IdentifierGuard {
    pub fn geodid(&self) -> &GeoDid {
        &self.geodid
    }
}

impl fmt::Debug for IdentifierGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentifierGuard")
            .field("geodid", &self.geodid)
            .finish()
    }
}

impl IdentifierLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `geodid`.
    pub async fn acquire(&self, geodid: &GeoDid) -> IdentifierGuard {
        let slot = {
            let mut slots = self.slots.lock().expect("lock table poisoned");
            // Only the table itself references an idle slot.
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            Arc::clone(slots.entry(geodid.clone()).or_default())
        };
        let guard = slot.lock_owned().await;
        trace!(%geodid, "identifier lock acquired");
        IdentifierGuard {
            geodid: geodid.clone(),
            _guard: guard,
        }
    }

    /// Number of identifiers currently locked or awaited.
    pub fn active(&self) -> usize {
        self.slots
            .lock()
            .expect("lock table poisoned")
            .values()
            .filter(|slot| Arc::strong_count(slot) > 1)
            .count()
    }
}
