//! Foundation types for GeoDID pinning and resolution.
//!
//! Every other `geodid-*` crate depends on this one. The types here carry no
//! behaviour beyond parsing and validation; storage, registry bookkeeping and
//! resolution live in their own crates.
//!
//! # Key Types
//!
//! - [`GeoDid`] -- hierarchical identifier with a method prefix
//! - [`GeoDidKind`] -- document type discriminator (collection, item, document)
//! - [`Cid`] -- opaque content hash produced by the content backend
//! - [`Credential`] -- backend access token that scopes pins
//! - [`JobId`] / [`JobStatus`] -- asynchronous pin job tracking
//! - [`GeoDidDocument`] -- the document payload that gets pinned and resolved
//! - [`Asset`] / [`ServiceReference`] -- attachable blobs and their pointers
//! - [`PinRecord`] / [`PinInfo`] -- registry entries and pin results

pub mod asset;
pub mod cid;
pub mod credential;
pub mod document;
pub mod error;
pub mod geodid;
pub mod job;
pub mod pin;

pub use asset::{Asset, ServiceReference};
pub use cid::Cid;
pub use credential::Credential;
pub use document::{DidMetadata, DocumentInfo, GeoDidDocument, DID_CONTEXT};
pub use error::TypeError;
pub use geodid::{GeoDid, GeoDidKind};
pub use job::{JobId, JobStatus};
pub use pin::{PinInfo, PinRecord};
