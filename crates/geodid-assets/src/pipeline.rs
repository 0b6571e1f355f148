//! Attach assets to an item document.
//!
//! Every asset is staged and pinned independently, at most
//! `max_concurrent_pins` at a time. The document changes only once all pins
//! have settled, and only if every one of them succeeded.

use std::collections::HashSet;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use geodid_resolver::{Resolution, ResolutionProtocol};
use geodid_store::{ContentStore, StoreResult};
use geodid_types::{Asset, Cid, DocumentInfo, GeoDid, GeoDidDocument, ServiceReference};
use tracing::{debug, info, warn};

use crate::error::{AttachError, Result};

/// Default bound on in-flight asset pins.
pub const DEFAULT_MAX_CONCURRENT_PINS: usize = 8;

#[derive(Clone, Debug)]
pub struct AttachmentPipeline {
    protocol: ResolutionProtocol,
    store: ContentStore,
    max_concurrent_pins: usize,
}

impl AttachmentPipeline {
    pub fn new(protocol: ResolutionProtocol, store: ContentStore) -> Self {
        Self {
            protocol,
            store,
            max_concurrent_pins: DEFAULT_MAX_CONCURRENT_PINS,
        }
    }

    /// Bound concurrent pins. Zero is treated as one.
    pub fn with_max_concurrent_pins(mut self, limit: usize) -> Self {
        self.max_concurrent_pins = limit.max(1);
        self
    }

    pub fn max_concurrent_pins(&self) -> usize {
        self.max_concurrent_pins
    }

    /// Resolve `geodid`, pin `assets` and return the document with one
    /// service reference appended per asset, in input order.
    ///
    /// The returned document is not re-pinned.
    pub async fn attach(&self, geodid: &GeoDid, assets: Vec<Asset>) -> Result<DocumentInfo> {
        let Resolution { mut document, .. } = self.protocol.resolve(geodid).await?;
        Self::check_target(geodid, &document, &assets)?;
        if assets.is_empty() {
            return Ok(DocumentInfo::new(document));
        }

        let outcomes: Vec<StoreResult<Cid>> = stream::iter(&assets)
            .map(|asset| self.store.stage_and_pin(asset.data.clone()))
            .buffered(self.max_concurrent_pins)
            .collect()
            .await;

        let mut references = Vec::with_capacity(assets.len());
        let mut pinned = Vec::new();
        let mut failed = Vec::new();
        for (asset, outcome) in assets.iter().zip(outcomes) {
            match outcome {
                Ok(cid) => {
                    debug!(%geodid, asset = %asset.name, cid = cid.short(), "asset pinned");
                    pinned.push(asset.name.clone());
                    references.push(ServiceReference::for_asset(geodid, asset, cid));
                }
                Err(e) => {
                    warn!(%geodid, asset = %asset.name, error = %e, "asset pin failed");
                    failed.push((asset.name.clone(), e));
                }
            }
        }
        if !failed.is_empty() {
            return Err(AttachError::BatchFailed {
                geodid: geodid.clone(),
                failed,
                pinned,
            });
        }

        document.append_services(references, Utc::now());
        info!(%geodid, assets = pinned.len(), "assets attached");
        Ok(DocumentInfo::new(document))
    }

    /// Type gate and name collision checks. Runs before any store write.
    fn check_target(geodid: &GeoDid, document: &GeoDidDocument, assets: &[Asset]) -> Result<()> {
        let kind = document.kind();
        if !kind.is_attachable() {
            return Err(AttachError::InvalidAttachmentTarget {
                geodid: geodid.clone(),
                kind,
            });
        }
        let mut seen = HashSet::with_capacity(assets.len());
        for asset in assets {
            let taken = document.has_service(&geodid.join(&asset.name));
            if !seen.insert(asset.name.as_str()) || taken {
                return Err(AttachError::DuplicateAsset {
                    geodid: geodid.clone(),
                    name: asset.name.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use geodid_registry::{InMemoryPinRegistry, PinRegistry};
    use geodid_resolver::{Driver, GeoDidDriver};
    use geodid_store::{ContentHasher, InMemoryBackend, StoreConfig, StoreError};
    use geodid_types::GeoDidKind;

    use super::*;

    struct Fixture {
        backend: Arc<InMemoryBackend>,
        registry: Arc<InMemoryPinRegistry>,
        store: ContentStore,
        pipeline: AttachmentPipeline,
    }

    async fn fixture() -> Fixture {
        let backend = Arc::new(InMemoryBackend::new());
        let store = ContentStore::connect(backend.clone(), None, StoreConfig::default())
            .await
            .unwrap();
        let registry = Arc::new(InMemoryPinRegistry::new());
        let driver: Arc<dyn Driver> = Arc::new(GeoDidDriver::new(registry.clone(), store.clone()));
        let pipeline = AttachmentPipeline::new(ResolutionProtocol::new([driver]), store.clone());
        Fixture {
            backend,
            registry,
            store,
            pipeline,
        }
    }

    impl Fixture {
        async fn publish(&self, id: &str, kind: GeoDidKind) -> GeoDid {
            let geodid = GeoDid::parse(id).unwrap();
            let doc = GeoDidDocument::genesis(geodid.clone(), kind, Utc::now());
            let cid = self.store.stage(doc.to_json_bytes().unwrap()).await.unwrap();
            self.registry
                .record_or_update(&geodid, &cid, self.store.credential());
            geodid
        }
    }

    fn asset(name: &str) -> Asset {
        Asset::new(name, "image/png", format!("{name}-bytes").into_bytes())
    }

    // ---- Success ----

    #[tokio::test]
    async fn references_follow_input_order() {
        let fx = fixture().await;
        let item = fx.publish("did:geo:item", GeoDidKind::Item).await;
        let info = fx
            .pipeline
            .attach(&item, vec![asset("a1"), asset("a2"), asset("a3")])
            .await
            .unwrap();

        let ids: Vec<&str> = info.document.service.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["did:geo:itema1", "did:geo:itema2", "did:geo:itema3"]);
        for reference in &info.document.service {
            let name = reference.id.trim_start_matches("did:geo:item");
            let expected = ContentHasher::BLOB.hash(format!("{name}-bytes").as_bytes());
            assert_eq!(reference.service_endpoint, expected);
            assert!(fx.backend.is_pinned(fx.store.credential(), &expected));
        }
    }

    #[tokio::test]
    async fn ordering_holds_with_serial_pins() {
        let fx = fixture().await;
        let item = fx.publish("did:geo:serial", GeoDidKind::Item).await;
        let pipeline = fx.pipeline.clone().with_max_concurrent_pins(0);
        assert_eq!(pipeline.max_concurrent_pins(), 1);
        let info = pipeline
            .attach(&item, vec![asset("z"), asset("y")])
            .await
            .unwrap();
        let ids: Vec<&str> = info.document.service.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["did:geo:serialz", "did:geo:serialy"]);
    }

    #[tokio::test]
    async fn attach_touches_updated_but_does_not_repin() {
        let fx = fixture().await;
        let item = fx.publish("did:geo:touch", GeoDidKind::Item).await;
        let before = fx.registry.lookup(&item).unwrap();
        let original = fx.pipeline.protocol.resolve(&item).await.unwrap().document;

        let info = fx.pipeline.attach(&item, vec![asset("pic")]).await.unwrap();
        assert!(info.document.metadata.updated >= original.metadata.updated);
        assert_eq!(info.document.metadata.created, original.metadata.created);
        assert_eq!(fx.registry.lookup(&item).unwrap(), before);
    }

    #[tokio::test]
    async fn empty_batch_returns_document_unchanged() {
        let fx = fixture().await;
        let item = fx.publish("did:geo:empty", GeoDidKind::Item).await;
        let stages = fx.backend.stage_calls();
        let info = fx.pipeline.attach(&item, Vec::new()).await.unwrap();
        assert!(info.document.service.is_empty());
        assert_eq!(fx.backend.stage_calls(), stages);
    }

    // ---- Rejections ----

    #[tokio::test]
    async fn collection_is_not_attachable() {
        let fx = fixture().await;
        let collection = fx.publish("did:geo:coll", GeoDidKind::Collection).await;
        let (stages, pins) = (fx.backend.stage_calls(), fx.backend.pin_calls());

        let err = fx
            .pipeline
            .attach(&collection, vec![asset("a1")])
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AttachError::InvalidAttachmentTarget {
                geodid: collection,
                kind: GeoDidKind::Collection,
            }
        );
        assert_eq!(fx.backend.stage_calls(), stages);
        assert_eq!(fx.backend.pin_calls(), pins);
    }

    #[tokio::test]
    async fn type_gate_applies_to_empty_batch() {
        let fx = fixture().await;
        let doc = fx.publish("did:geo:plain", GeoDidKind::Document).await;
        assert!(matches!(
            fx.pipeline.attach(&doc, Vec::new()).await,
            Err(AttachError::InvalidAttachmentTarget { .. })
        ));
    }

    #[tokio::test]
    async fn duplicate_names_in_batch_are_rejected() {
        let fx = fixture().await;
        let item = fx.publish("did:geo:dup", GeoDidKind::Item).await;
        let stages = fx.backend.stage_calls();
        let err = fx
            .pipeline
            .attach(&item, vec![asset("a"), asset("b"), asset("a")])
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AttachError::DuplicateAsset {
                geodid: item,
                name: "a".into(),
            }
        );
        assert_eq!(fx.backend.stage_calls(), stages);
    }

    #[tokio::test]
    async fn name_already_in_service_list_is_rejected() {
        let fx = fixture().await;
        let item = fx.publish("did:geo:again", GeoDidKind::Item).await;
        let info = fx.pipeline.attach(&item, vec![asset("a")]).await.unwrap();

        // Publish the mutated document so the next resolve sees the reference.
        let cid = fx
            .store
            .stage_and_pin(info.document.to_json_bytes().unwrap())
            .await
            .unwrap();
        fx.registry.record_or_update(&item, &cid, fx.store.credential());

        assert!(matches!(
            fx.pipeline.attach(&item, vec![asset("a")]).await,
            Err(AttachError::DuplicateAsset { .. })
        ));
    }

    #[tokio::test]
    async fn partial_failure_leaves_document_untouched() {
        let fx = fixture().await;
        let item = fx.publish("did:geo:partial", GeoDidKind::Item).await;
        let original = fx.pipeline.protocol.resolve(&item).await.unwrap();
        fx.backend
            .reject_pins_for(ContentHasher::BLOB.hash(b"a2-bytes"));

        let err = fx
            .pipeline
            .attach(&item, vec![asset("a1"), asset("a2"), asset("a3")])
            .await
            .unwrap_err();
        match &err {
            AttachError::BatchFailed { failed, pinned, .. } => {
                assert_eq!(pinned, &vec!["a1".to_string(), "a3".to_string()]);
                assert_eq!(failed.len(), 1);
                assert!(matches!(failed[0].1, StoreError::PinFailed { .. }));
            }
            other => panic!("expected BatchFailed, got {other:?}"),
        }
        assert_eq!(err.failed_names(), vec!["a2"]);

        let after = fx.pipeline.protocol.resolve(&item).await.unwrap();
        assert_eq!(after, original);
    }

    #[tokio::test]
    async fn unknown_identifier_surfaces_resolve_error() {
        let fx = fixture().await;
        let ghost = GeoDid::parse("did:geo:ghost").unwrap();
        assert!(matches!(
            fx.pipeline.attach(&ghost, vec![asset("a")]).await,
            Err(AttachError::Resolve(geodid_resolver::ResolveError::NotPinned(_)))
        ));
    }
}
