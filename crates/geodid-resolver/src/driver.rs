use async_trait::async_trait;
use geodid_types::{Cid, GeoDid, GeoDidDocument};

use crate::error::ResolveResult;

/// A resolved document and the content hash it was read from.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub document: GeoDidDocument,
    pub cid: Cid,
}

/// Resolution plugin for one identifier method.
///
/// Drivers are read-only: resolving never writes to the registry or pins
/// anything.
#[async_trait]
pub trait Driver: Send + Sync {
    /// The method this driver handles (`"geo"` for `did:geo:*`).
    fn method(&self) -> &str;

    /// Rebuild the current document for `geodid`.
    async fn resolve(&self, geodid: &GeoDid) -> ResolveResult<Resolution>;
}
