//! The [`ContentBackend`] trait: the contract any content-addressed store
//! with asynchronous pin jobs must satisfy.
//!
//! The adapter in [`crate::adapter`] depends only on this trait, never on a
//! specific backend protocol.

use async_trait::async_trait;
use bytes::Bytes;
use geodid_types::{Cid, Credential, JobId, JobStatus};

use crate::error::BackendResult;

/// Opaque content-addressed storage backend.
///
/// Implementations must be thread-safe and satisfy:
/// - `stage` is deterministic: identical bytes always yield the same [`Cid`].
/// - `apply_storage_config` reports [`BackendError::AlreadyPinned`] only when
///   the credential retains the content and its pin job has settled. While a
///   job for the same content is in flight it returns that job's id instead
///   of queuing a new one.
/// - Staged content stays fetchable by `get` for any valid credential.
///
/// [`BackendError::AlreadyPinned`]: crate::BackendError::AlreadyPinned
#[async_trait]
pub trait ContentBackend: Send + Sync {
    /// Provision a fresh access credential.
    async fn create_user(&self) -> BackendResult<Credential>;

    /// Stage raw bytes and return their content hash.
    async fn stage(&self, credential: &Credential, data: Bytes) -> BackendResult<Cid>;

    /// Request durable retention of staged content. Returns the pin job id.
    async fn apply_storage_config(&self, credential: &Credential, cid: &Cid)
        -> BackendResult<JobId>;

    /// Retrieve staged content.
    async fn get(&self, credential: &Credential, cid: &Cid) -> BackendResult<Bytes>;

    /// Current status of a pin job.
    async fn job_status(&self, credential: &Credential, job: &JobId) -> BackendResult<JobStatus>;
}
