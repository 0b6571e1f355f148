//! In-memory pin registry.
//!
//! [`InMemoryPinRegistry`] stores all records in a `HashMap` protected by a
//! `RwLock`. Mappings are process-scoped and lost when the registry is
//! dropped.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use geodid_types::{Cid, Credential, GeoDid, PinRecord};
use tracing::debug;

use crate::error::{RegistryError, Result};
use crate::traits::PinRegistry;

/// An in-memory implementation of [`PinRegistry`].
#[derive(Debug, Default)]
pub struct InMemoryPinRegistry {
    records: RwLock<HashMap<GeoDid, PinRecord>>,
}

impl InMemoryPinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared write path. Caller holds the write lock.
    fn write(
        records: &mut HashMap<GeoDid, PinRecord>,
        geodid: &GeoDid,
        cid: &Cid,
        credential: &Credential,
    ) -> PinRecord {
        let now = Utc::now();
        let record = records
            .entry(geodid.clone())
            .and_modify(|r| {
                r.cid = cid.clone();
                r.pinned_at = now;
                r.revision += 1;
            })
            .or_insert_with(|| PinRecord {
                geodid: geodid.clone(),
                cid: cid.clone(),
                credential: credential.clone(),
                pinned_at: now,
                revision: 1,
            });
        debug!(%geodid, cid = cid.short(), revision = record.revision, "registry updated");
        record.clone()
    }
}

impl PinRegistry for InMemoryPinRegistry {
    fn lookup(&self, geodid: &GeoDid) -> Option<PinRecord> {
        self.records
            .read()
            .expect("registry lock poisoned")
            .get(geodid)
            .cloned()
    }

    fn record_or_update(&self, geodid: &GeoDid, cid: &Cid, credential: &Credential) -> PinRecord {
        let mut records = self.records.write().expect("registry lock poisoned");
        Self::write(&mut records, geodid, cid, credential)
    }

    fn update_if_current(
        &self,
        geodid: &GeoDid,
        expected: Option<&Cid>,
        cid: &Cid,
        credential: &Credential,
    ) -> Result<PinRecord> {
        let mut records = self.records.write().expect("registry lock poisoned");
        let found = records.get(geodid).map(|r| &r.cid);
        if found != expected {
            return Err(RegistryError::Conflict {
                geodid: geodid.clone(),
                expected: expected.cloned(),
                found: found.cloned(),
            });
        }
        Ok(Self::write(&mut records, geodid, cid, credential))
    }

    fn list(&self) -> Vec<PinRecord> {
        let records = self.records.read().expect("registry lock poisoned");
        let mut list: Vec<PinRecord> = records.values().cloned().collect();
        list.sort_by(|a, b| a.geodid.cmp(&b.geodid));
        list
    }

    fn len(&self) -> usize {
        self.records.read().expect("registry lock poisoned").len()
    }
}
