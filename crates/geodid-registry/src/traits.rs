//! The [`PinRegistry`] trait defining the identifier registry interface.
//!
//! Any backend (in-memory, database) implements this trait to track which
//! content hash currently represents each GeoDID.

use geodid_types::{Cid, Credential, GeoDid, PinRecord};

use crate::error::Result;

/// Storage backend for identifier → content hash mappings.
///
/// Implementations must be thread-safe and keep at most one record per
/// identifier. Writers of the same identifier are expected to hold that
/// identifier's [`IdentifierLocks`](crate::IdentifierLocks) guard; readers
/// need no coordination.
pub trait PinRegistry: Send + Sync {
    /// The current record for `geodid`, if it was ever pinned.
    fn lookup(&self, geodid: &GeoDid) -> Option<PinRecord>;

    /// Create the record, or point an existing one at `cid`.
    ///
    /// On update the stored credential is kept as-is and `revision` is
    /// incremented. Never fails.
    fn record_or_update(&self, geodid: &GeoDid, cid: &Cid, credential: &Credential) -> PinRecord;

    /// Like [`record_or_update`](Self::record_or_update), but only if the
    /// current hash equals `expected` (`None` meaning "no record yet").
    ///
    /// Returns [`RegistryError::Conflict`](crate::RegistryError::Conflict)
    /// otherwise and leaves the record untouched.
    fn update_if_current(
        &self,
        geodid: &GeoDid,
        expected: Option<&Cid>,
        cid: &Cid,
        credential: &Credential,
    ) -> Result<PinRecord>;

    /// All records, sorted by identifier.
    fn list(&self) -> Vec<PinRecord>;

    /// The current content hash for `geodid`.
    fn current_cid(&self, geodid: &GeoDid) -> Option<Cid> {
        self.lookup(geodid).map(|r| r.cid)
    }

    fn len(&self) -> usize {
        self.list().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
