//! Content-store adapter for GeoDID pinning.
//!
//! This crate sits between the pinning core and an opaque content-addressed
//! backend with asynchronous pin jobs. It knows nothing about identifiers:
//! it stages bytes into content hashes, pins them, fetches them back, and
//! reports job status.
//!
//! # Layers
//!
//! - [`ContentBackend`] -- the backend contract (stage, storage config, get,
//!   job status, user provisioning)
//! - [`InMemoryBackend`] -- `HashMap`-based backend for tests and embedding,
//!   with fault injection
//! - [`ContentStore`] -- the adapter: one session credential, per-call
//!   timeouts, bounded retries, idempotent pins, explicit [`PinMode`]
//!
//! # Design Rules
//!
//! 1. Identical bytes always stage to the same [`Cid`](geodid_types::Cid).
//! 2. "Already pinned" is success, never an error.
//! 3. Only unreachable-backend failures are retried inside the adapter.
//! 4. A pin call returns when the configured [`PinMode`] is satisfied, and
//!    each adapter uses exactly one mode.

pub mod adapter;
pub mod backend;
pub mod config;
pub mod error;
pub mod hasher;
pub mod memory;

pub use adapter::{ContentStore, PinOutcome};
pub use backend::ContentBackend;
pub use config::{PinMode, StoreConfig};
pub use error::{BackendError, BackendResult, StoreError, StoreResult};
pub use hasher::ContentHasher;
pub use memory::InMemoryBackend;
