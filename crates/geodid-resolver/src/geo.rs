use std::sync::Arc;

use async_trait::async_trait;
use geodid_registry::PinRegistry;
use geodid_store::ContentStore;
use geodid_types::{GeoDid, GeoDidDocument};
use tracing::debug;

use crate::driver::{Driver, Resolution};
use crate::error::{ResolveError, ResolveResult};

/// Driver for `did:geo` identifiers.
///
/// Looks the identifier up in the registry, fetches the pinned bytes through
/// a session-bound [`ContentStore`], and decodes them as a document.
pub struct GeoDidDriver {
    registry: Arc<dyn PinRegistry>,
    store: ContentStore,
}

impl GeoDidDriver {
    pub const METHOD: &'static str = "geo";

    pub fn new(registry: Arc<dyn PinRegistry>, store: ContentStore) -> Self {
        Self { registry, store }
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }
}

#[async_trait]
impl Driver for GeoDidDriver {
    fn method(&self) -> &str {
        Self::METHOD
    }

    async fn resolve(&self, geodid: &GeoDid) -> ResolveResult<Resolution> {
        let record = self
            .registry
            .lookup(geodid)
            .ok_or_else(|| ResolveError::NotPinned(geodid.clone()))?;
        let bytes = self.store.fetch(&record.cid).await?;
        let document =
            GeoDidDocument::from_json_bytes(&bytes).map_err(|e| ResolveError::MalformedDocument {
                geodid: geodid.clone(),
                reason: e.to_string(),
            })?;
        if document.id != *geodid {
            return Err(ResolveError::MalformedDocument {
                geodid: geodid.clone(),
                reason: format!("content describes {}", document.id),
            });
        }
        debug!(%geodid, cid = record.cid.short(), kind = %document.kind(), "resolved");
        Ok(Resolution {
            document,
            cid: record.cid,
        })
    }
}
