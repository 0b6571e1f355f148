use geodid_resolver::ResolveError;
use geodid_store::StoreError;
use geodid_types::{GeoDid, GeoDidKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachError {
    /// Only items carry assets.
    #[error("cannot attach assets to {geodid}: {kind} documents are not attachable")]
    InvalidAttachmentTarget { geodid: GeoDid, kind: GeoDidKind },

    /// The name collides with another asset in the batch or an existing
    /// service reference.
    #[error("duplicate asset {name:?} on {geodid}")]
    DuplicateAsset { geodid: GeoDid, name: String },

    /// At least one asset pin failed; the document was not modified.
    #[error("{} asset pin(s) failed for {geodid}", .failed.len())]
    BatchFailed {
        geodid: GeoDid,
        failed: Vec<(String, StoreError)>,
        pinned: Vec<String>,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl AttachError {
    /// Names of the assets whose pins failed, in input order.
    pub fn failed_names(&self) -> Vec<&str> {
        match self {
            Self::BatchFailed { failed, .. } => failed.iter().map(|(n, _)| n.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AttachError>;
