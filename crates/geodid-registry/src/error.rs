//! Error types for registry operations.

use geodid_types::{Cid, GeoDid};
use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A compare-and-swap write found a different current hash than the
    /// caller expected: another writer got there first.
    #[error("registry conflict for {geodid}: expected {expected:?}, found {found:?}")]
    Conflict {
        geodid: GeoDid,
        expected: Option<Cid>,
        found: Option<Cid>,
    },
}

/// Convenience type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
