//! Identifier registry for GeoDID pinning.
//!
//! The registry maps each GeoDID to the content hash that currently
//! represents it, together with the credential that produced the first pin.
//! It is the mutable layer on top of the immutable content store: pinning a
//! new version of a document replaces the mapping, and no history is kept.
//!
//! # Modules
//!
//! - [`error`] -- Error types for registry operations
//! - [`traits`] -- The [`PinRegistry`] trait defining the registry interface
//! - [`memory`] -- In-memory [`InMemoryPinRegistry`], process-scoped
//! - [`locks`] -- [`IdentifierLocks`], the keyed async lock that serializes
//!   writers of the same identifier

pub mod error;
pub mod locks;
pub mod memory;
pub mod traits;

pub use error::{RegistryError, Result};
pub use locks::{IdentifierGuard, IdentifierLocks};
pub use memory::InMemoryPinRegistry;
pub use traits::PinRegistry;
