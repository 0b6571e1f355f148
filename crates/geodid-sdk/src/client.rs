use std::sync::Arc;

use geodid_assets::AttachmentPipeline;
use geodid_registry::{IdentifierLocks, InMemoryPinRegistry, PinRegistry};
use geodid_resolver::{Driver, GeoDidDriver, ResolutionProtocol, ResolveError};
use geodid_store::{ContentBackend, ContentStore};
use geodid_types::{
    Asset, Cid, Credential, DocumentInfo, GeoDid, GeoDidKind, PinInfo, PinRecord,
};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{SdkError, SdkResult};
use crate::factory::{DefaultDocumentFactory, DocumentFactory};

/// A loaded document and the session it was read through.
#[derive(Clone, Debug)]
pub struct LoadInfo {
    pub document: DocumentInfo,
    /// Content hash the document was read from.
    pub cid: Cid,
    /// Session bound to the credential used for the load.
    pub store: ContentStore,
}

/// High-level GeoDID client.
///
/// Owns the identifier registry for the process and composes the hierarchy
/// factory, the content backend and the resolution drivers. Pins of the same
/// identifier are serialized; everything else runs concurrently.
pub struct AstralClient {
    factory: Arc<dyn DocumentFactory>,
    backend: Arc<dyn ContentBackend>,
    registry: Arc<dyn PinRegistry>,
    locks: IdentifierLocks,
    drivers: Vec<Arc<dyn Driver>>,
    config: ClientConfig,
}

impl AstralClient {
    /// Client with the default factory and an in-memory registry.
    pub fn new(backend: Arc<dyn ContentBackend>, config: ClientConfig) -> Self {
        Self::builder(backend).config(config).build()
    }

    pub fn builder(backend: Arc<dyn ContentBackend>) -> AstralClientBuilder {
        AstralClientBuilder {
            backend,
            factory: None,
            registry: None,
            drivers: Vec::new(),
            config: ClientConfig::default(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<dyn PinRegistry> {
        &self.registry
    }

    // ---- Hierarchy ----

    pub async fn create_genesis_geodid(&self, kind: GeoDidKind) -> SdkResult<DocumentInfo> {
        let info = self.factory.create_genesis(kind).await?;
        debug!(geodid = %info.geodid, %kind, "genesis document created");
        Ok(info)
    }

    pub async fn create_child_geodid(
        &self,
        kind: GeoDidKind,
        parent: &GeoDid,
        path: &str,
    ) -> SdkResult<DocumentInfo> {
        let info = self.factory.create_child(kind, parent, path).await?;
        debug!(geodid = %info.geodid, %parent, %kind, "child document created");
        Ok(info)
    }

    // ---- Sessions ----

    /// Open a store session, provisioning a credential if none is given.
    pub async fn connect(&self, credential: Option<Credential>) -> SdkResult<ContentStore> {
        let store = ContentStore::connect(
            Arc::clone(&self.backend),
            credential,
            self.config.store.clone(),
        )
        .await?;
        Ok(store)
    }

    /// Session for work on `geodid`: the given credential, else the one
    /// recorded for the identifier.
    ///
    /// A fresh credential is provisioned only when a client-registered driver
    /// handles the method. Identifiers that cannot resolve fail here, before
    /// any backend call.
    async fn session_for(
        &self,
        geodid: &GeoDid,
        credential: Option<Credential>,
    ) -> SdkResult<ContentStore> {
        let credential = credential.or_else(|| self.registry.lookup(geodid).map(|r| r.credential));
        if credential.is_none() && !self.has_extra_driver(geodid.method()) {
            let err = if geodid.method() == GeoDidDriver::METHOD {
                ResolveError::NotPinned(geodid.clone())
            } else {
                ResolveError::UnsupportedMethod {
                    method: geodid.method().to_string(),
                    geodid: geodid.clone(),
                }
            };
            return Err(err.into());
        }
        self.connect(credential).await
    }

    fn has_extra_driver(&self, method: &str) -> bool {
        self.drivers.iter().any(|d| d.method() == method)
    }

    fn protocol_for(&self, store: &ContentStore) -> ResolutionProtocol {
        let geo: Arc<dyn Driver> = Arc::new(GeoDidDriver::new(
            Arc::clone(&self.registry),
            store.clone(),
        ));
        // Client-registered drivers win over the built-in one.
        ResolutionProtocol::new(std::iter::once(geo).chain(self.drivers.iter().cloned()))
    }

    // ---- Pinning ----

    /// Stage and pin a document and point its identifier at the result.
    pub async fn pin_document(
        &self,
        info: &DocumentInfo,
        credential: Option<Credential>,
    ) -> SdkResult<PinInfo> {
        let _guard = self.locks.acquire(&info.geodid).await;
        self.pin_locked(info, credential).await
    }

    /// Body of [`pin_document`](Self::pin_document). Caller holds the
    /// identifier lock.
    async fn pin_locked(
        &self,
        info: &DocumentInfo,
        credential: Option<Credential>,
    ) -> SdkResult<PinInfo> {
        if info.geodid != info.document.id {
            return Err(SdkError::IdentifierMismatch {
                geodid: info.geodid.clone(),
                document: info.document.id.clone(),
            });
        }
        let prior = self.registry.lookup(&info.geodid);
        let credential = credential.or_else(|| prior.as_ref().map(|r| r.credential.clone()));
        let store = self.connect(credential).await?;

        let cid = store.stage_and_pin(info.document.to_json_bytes()?).await?;
        let record = self.registry.update_if_current(
            &info.geodid,
            prior.as_ref().map(|r| &r.cid),
            &cid,
            store.credential(),
        )?;
        info!(
            geodid = %info.geodid,
            cid = cid.short(),
            revision = record.revision,
            "document pinned"
        );
        Ok(PinInfo::from_record(&record, store.credential().clone()))
    }

    // ---- Resolution ----

    /// Resolve the current document for `geodid`.
    pub async fn load_document(
        &self,
        geodid: &GeoDid,
        credential: Option<Credential>,
    ) -> SdkResult<LoadInfo> {
        let store = self.session_for(geodid, credential).await?;
        let resolution = self.protocol_for(&store).resolve(geodid).await?;
        Ok(LoadInfo {
            document: DocumentInfo::new(resolution.document),
            cid: resolution.cid,
            store,
        })
    }

    pub fn lookup(&self, geodid: &GeoDid) -> Option<PinRecord> {
        self.registry.lookup(geodid)
    }

    // ---- Assets ----

    /// Pin `assets` and return the item with their service references
    /// appended. The returned document is not pinned.
    pub async fn add_assets_to_item(
        &self,
        geodid: &GeoDid,
        assets: Vec<Asset>,
        credential: Option<Credential>,
    ) -> SdkResult<DocumentInfo> {
        let store = self.session_for(geodid, credential).await?;
        let pipeline = AttachmentPipeline::new(self.protocol_for(&store), store)
            .with_max_concurrent_pins(self.config.max_concurrent_pins);
        Ok(pipeline.attach(geodid, assets).await?)
    }

    /// Attach `assets` and pin the updated item as one step.
    ///
    /// The identifier lock is held throughout, so no other pin of `geodid`
    /// can land between the attach and the re-pin.
    pub async fn add_assets_and_pin(
        &self,
        geodid: &GeoDid,
        assets: Vec<Asset>,
        credential: Option<Credential>,
    ) -> SdkResult<(DocumentInfo, PinInfo)> {
        let _guard = self.locks.acquire(geodid).await;
        let info = self
            .add_assets_to_item(geodid, assets, credential.clone())
            .await?;
        let pin = self.pin_locked(&info, credential).await?;
        Ok((info, pin))
    }
}

impl std::fmt::Debug for AstralClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AstralClient")
            .field("endpoint", &self.config.store.endpoint)
            .field("pinned", &self.registry.len())
            .field("drivers", &self.drivers.len())
            .finish()
    }
}

/// Builder for [`AstralClient`].
pub struct AstralClientBuilder {
    backend: Arc<dyn ContentBackend>,
    factory: Option<Arc<dyn DocumentFactory>>,
    registry: Option<Arc<dyn PinRegistry>>,
    drivers: Vec<Arc<dyn Driver>>,
    config: ClientConfig,
}

impl AstralClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn factory(mut self, factory: Arc<dyn DocumentFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Share a registry between clients. Defaults to a fresh in-memory one.
    pub fn registry(mut self, registry: Arc<dyn PinRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Register an extra resolution driver.
    pub fn driver(mut self, driver: Arc<dyn Driver>) -> Self {
        self.drivers.push(driver);
        self
    }

    pub fn build(self) -> AstralClient {
        let factory = self.factory.unwrap_or_else(|| {
            Arc::new(DefaultDocumentFactory::new(self.config.controller.clone()))
        });
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(InMemoryPinRegistry::new()));
        AstralClient {
            factory,
            backend: self.backend,
            registry,
            locks: IdentifierLocks::new(),
            drivers: self.drivers,
            config: self.config,
        }
    }
}
