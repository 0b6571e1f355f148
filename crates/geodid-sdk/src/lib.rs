//! High-level SDK for GeoDID pinning and resolution.
//!
//! [`AstralClient`] is the entry point: it creates documents through a
//! [`DocumentFactory`], pins them to a content backend, records which
//! content hash currently represents each identifier, and resolves
//! identifiers back into documents.
//!
//! ```no_run
//! # async fn demo() -> geodid_sdk::SdkResult<()> {
//! use std::sync::Arc;
//! use geodid_sdk::{AstralClient, ClientConfig, GeoDidKind, InMemoryBackend};
//!
//! let client = AstralClient::new(Arc::new(InMemoryBackend::new()), ClientConfig::default());
//! let info = client.create_genesis_geodid(GeoDidKind::Collection).await?;
//! let pin = client.pin_document(&info, None).await?;
//! let loaded = client.load_document(&info.geodid, Some(pin.credential)).await?;
//! assert_eq!(loaded.document, info);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod factory;

pub use client::{AstralClient, AstralClientBuilder, LoadInfo};
pub use config::ClientConfig;
pub use error::{SdkError, SdkResult};
pub use factory::{DefaultDocumentFactory, DocumentFactory};

// Re-export key types
pub use geodid_assets::AttachError;
pub use geodid_registry::{PinRegistry, RegistryError};
pub use geodid_resolver::{Driver, Resolution, ResolveError};
pub use geodid_store::{ContentBackend, InMemoryBackend, PinMode, StoreConfig, StoreError};
pub use geodid_types::{
    Asset, Cid, Credential, DocumentInfo, GeoDid, GeoDidDocument, GeoDidKind, PinInfo, PinRecord,
    ServiceReference,
};
