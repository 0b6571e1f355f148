use geodid_store::StoreError;
use geodid_types::{GeoDid, TypeError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No driver is registered for the identifier's method.
    #[error("unsupported method {method:?} for {geodid}")]
    UnsupportedMethod { method: String, geodid: GeoDid },

    /// The identifier has never been pinned in this registry.
    #[error("no pinned content for {0}")]
    NotPinned(GeoDid),

    /// The fetched bytes do not decode to a document for this identifier.
    #[error("malformed document for {geodid}: {reason}")]
    MalformedDocument { geodid: GeoDid, reason: String },

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] TypeError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type ResolveResult<T> = Result<T, ResolveError>;
