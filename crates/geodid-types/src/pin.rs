use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cid::Cid;
use crate::credential::Credential;
use crate::geodid::GeoDid;

/// Registry entry: the content hash currently representing an identifier.
///
/// There is at most one record per identifier. `revision` counts the writes
/// made to this record (1 on creation) so concurrent writers can be ordered
/// after the fact; no earlier hashes are retained.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinRecord {
    pub geodid: GeoDid,
    pub cid: Cid,
    /// Credential of the first write. Never rotated by updates.
    pub credential: Credential,
    pub pinned_at: DateTime<Utc>,
    pub revision: u64,
}

/// Result of pinning a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinInfo {
    pub geodid: GeoDid,
    pub cid: Cid,
    pub pin_date: DateTime<Utc>,
    /// The session credential; pass it to later load and attach calls.
    pub credential: Credential,
    /// Registry revision written by this pin.
    pub revision: u64,
}

impl PinInfo {
    pub fn from_record(record: &PinRecord, credential: Credential) -> Self {
        Self {
            geodid: record.geodid.clone(),
            cid: record.cid.clone(),
            pin_date: record.pinned_at,
            credential,
            revision: record.revision,
        }
    }
}
