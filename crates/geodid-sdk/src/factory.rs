//! Hierarchy collaborator seam.

use async_trait::async_trait;
use chrono::Utc;
use geodid_types::{DocumentInfo, GeoDid, GeoDidDocument, GeoDidKind};
use uuid::Uuid;

use crate::error::{SdkError, SdkResult};

/// Produces new documents for the hierarchy.
///
/// The client never builds documents itself; it asks a factory and pins what
/// comes back.
#[async_trait]
pub trait DocumentFactory: Send + Sync {
    async fn create_genesis(&self, kind: GeoDidKind) -> SdkResult<DocumentInfo>;

    async fn create_child(
        &self,
        kind: GeoDidKind,
        parent: &GeoDid,
        path: &str,
    ) -> SdkResult<DocumentInfo>;
}

/// Minimal factory keyed by a controller address.
///
/// Genesis identifiers are `did:geo:<hex>` where `<hex>` is the BLAKE3 digest
/// of the controller and a fresh UUIDv7; children live at `<parent>/<path>`.
#[derive(Clone, Debug)]
pub struct DefaultDocumentFactory {
    controller: String,
}

impl DefaultDocumentFactory {
    pub fn new(controller: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
        }
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    fn genesis_id(&self) -> SdkResult<GeoDid> {
        if self.controller.is_empty() {
            return Err(SdkError::Hierarchy("controller address is empty".into()));
        }
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.controller.as_bytes());
        hasher.update(Uuid::now_v7().as_bytes());
        Ok(GeoDid::parse(format!(
            "did:geo:{}",
            hex::encode(hasher.finalize().as_bytes())
        ))?)
    }
}

#[async_trait]
impl DocumentFactory for DefaultDocumentFactory {
    async fn create_genesis(&self, kind: GeoDidKind) -> SdkResult<DocumentInfo> {
        let id = self.genesis_id()?;
        Ok(DocumentInfo::new(GeoDidDocument::genesis(id, kind, Utc::now())))
    }

    async fn create_child(
        &self,
        kind: GeoDidKind,
        parent: &GeoDid,
        path: &str,
    ) -> SdkResult<DocumentInfo> {
        let id = parent.child(path)?;
        let path = path.trim_matches('/');
        Ok(DocumentInfo::new(GeoDidDocument::child(
            id,
            kind,
            parent.clone(),
            path,
            Utc::now(),
        )))
    }
}
