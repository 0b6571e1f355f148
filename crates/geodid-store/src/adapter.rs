//! The content-store adapter.
//!
//! [`ContentStore`] binds a [`ContentBackend`] to one session credential and
//! layers the client-side guarantees on top of the raw backend contract:
//!
//! - every backend call is bounded by `request_timeout`; expiry is treated
//!   as the backend being unreachable
//! - unreachable backends are retried up to `max_retries` extra times with
//!   linear backoff, other failures are returned immediately
//! - pins are idempotent: "already pinned" is success
//! - pins complete according to the configured [`PinMode`]

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use geodid_types::{Cid, Credential, JobId, JobStatus};
use tracing::{debug, info, warn};

use crate::backend::ContentBackend;
use crate::config::{PinMode, StoreConfig};
use crate::error::{BackendError, BackendResult, StoreError, StoreResult};

/// How a successful pin call concluded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinOutcome {
    /// The backend queued a job; durability is the backend's responsibility.
    Queued(JobId),
    /// The job was observed reaching `Success`.
    Completed(JobId),
    /// The content was already retained under this credential by a pin job
    /// that has settled.
    AlreadyPinned,
}

/// Session-scoped handle onto a content backend.
///
/// Cloning is cheap; clones share the backend and credential.
#[derive(Clone)]
pub struct ContentStore {
    backend: Arc<dyn ContentBackend>,
    credential: Credential,
    config: StoreConfig,
}

impl ContentStore {
    /// Open a session, provisioning a credential if none is supplied.
    pub async fn connect(
        backend: Arc<dyn ContentBackend>,
        credential: Option<Credential>,
        config: StoreConfig,
    ) -> StoreResult<Self> {
        let credential = match credential {
            Some(credential) => credential,
            None => {
                let credential = call_with_retry(&config, "create_user", || backend.create_user())
                    .await
                    .map_err(|e| StoreError::from_backend("create_user", e))?;
                info!(
                    endpoint = %config.endpoint,
                    user = credential.fingerprint(),
                    "provisioned backend credential"
                );
                credential
            }
        };
        Ok(Self {
            backend,
            credential,
            config,
        })
    }

    /// The session credential. Later registry writes record it.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Stage bytes and return their content hash.
    pub async fn stage(&self, data: impl Into<Bytes>) -> StoreResult<Cid> {
        let data = data.into();
        let size = data.len();
        let (backend, credential) = (&self.backend, &self.credential);
        let cid = call_with_retry(&self.config, "stage", move || {
            backend.stage(credential, data.clone())
        })
        .await
        .map_err(|e| StoreError::from_backend("stage", e))?;
        debug!(cid = cid.short(), size, "staged");
        Ok(cid)
    }

    /// Request durable retention of staged content.
    ///
    /// Idempotent: if the backend reports the content as already pinned the
    /// call succeeds with [`PinOutcome::AlreadyPinned`]. A pin that is still
    /// in flight is handed back by job id and treated like a fresh one, so
    /// [`PinMode::AwaitTerminal`] waits on it.
    pub async fn pin(&self, cid: &Cid) -> StoreResult<PinOutcome> {
        let (backend, credential) = (&self.backend, &self.credential);
        let job = match call_with_retry(&self.config, "pin", move || {
            backend.apply_storage_config(credential, cid)
        })
        .await
        {
            Ok(job) => job,
            Err(BackendError::AlreadyPinned(_)) => {
                debug!(cid = cid.short(), "already pinned");
                return Ok(PinOutcome::AlreadyPinned);
            }
            Err(BackendError::Unreachable(reason)) => {
                return Err(StoreError::Unavailable {
                    operation: "pin",
                    reason,
                });
            }
            Err(e) => {
                warn!(cid = cid.short(), error = %e, "pin rejected");
                return Err(StoreError::PinFailed {
                    cid: cid.clone(),
                    reason: e.to_string(),
                });
            }
        };

        match self.config.pin_mode {
            PinMode::Acknowledged => {
                debug!(cid = cid.short(), %job, "pin queued");
                Ok(PinOutcome::Queued(job))
            }
            PinMode::AwaitTerminal => match self.wait_for_job(&job).await? {
                JobStatus::Success => {
                    debug!(cid = cid.short(), %job, "pin completed");
                    Ok(PinOutcome::Completed(job))
                }
                status => {
                    warn!(cid = cid.short(), %job, %status, "pin job did not succeed");
                    Err(StoreError::PinFailed {
                        cid: cid.clone(),
                        reason: format!("job {job} ended {status}"),
                    })
                }
            },
        }
    }

    /// Stage then pin, returning the content hash.
    pub async fn stage_and_pin(&self, data: impl Into<Bytes>) -> StoreResult<Cid> {
        let cid = self.stage(data).await?;
        self.pin(&cid).await?;
        Ok(cid)
    }

    /// Retrieve previously staged content.
    pub async fn fetch(&self, cid: &Cid) -> StoreResult<Bytes> {
        let (backend, credential) = (&self.backend, &self.credential);
        call_with_retry(&self.config, "fetch", move || backend.get(credential, cid))
            .await
            .map_err(|e| StoreError::from_backend("fetch", e))
    }

    /// Current status of a pin job.
    pub async fn job_status(&self, job: &JobId) -> StoreResult<JobStatus> {
        let (backend, credential) = (&self.backend, &self.credential);
        call_with_retry(&self.config, "job_status", move || {
            backend.job_status(credential, job)
        })
        .await
        .map_err(|e| StoreError::from_backend("job_status", e))
    }

    /// Poll a job until it reaches a terminal status.
    ///
    /// Bounded by `job_wait_timeout`; expiry is reported as
    /// [`StoreError::Unavailable`].
    pub async fn wait_for_job(&self, job: &JobId) -> StoreResult<JobStatus> {
        let poll = async {
            loop {
                let status = self.job_status(job).await?;
                if status.is_terminal() {
                    return Ok::<_, StoreError>(status);
                }
                tokio::time::sleep(self.config.job_poll_interval()).await;
            }
        };
        match tokio::time::timeout(self.config.job_wait_timeout(), poll).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Unavailable {
                operation: "wait_for_job",
                reason: format!(
                    "job {job} not terminal after {:?}",
                    self.config.job_wait_timeout()
                ),
            }),
        }
    }
}

impl fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentStore")
            .field("endpoint", &self.config.endpoint)
            .field("credential", &self.credential)
            .field("pin_mode", &self.config.pin_mode)
            .finish()
    }
}

/// Run one backend call under the configured timeout, retrying while the
/// backend is unreachable.
async fn call_with_retry<T, F, Fut>(
    config: &StoreConfig,
    operation: &'static str,
    mut call: F,
) -> BackendResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = BackendResult<T>>,
{
    let attempts = config.max_retries.saturating_add(1);
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        let result = match tokio::time::timeout(config.request_timeout(), call()).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Unreachable(format!(
                "no response within {:?}",
                config.request_timeout()
            ))),
        };
        match result {
            Err(BackendError::Unreachable(reason)) if attempt < attempts => {
                warn!(operation, attempt, %reason, "backend unreachable, retrying");
                tokio::time::sleep(config.retry_backoff() * attempt).await;
            }
            Err(BackendError::Unreachable(reason)) => {
                warn!(operation, attempts, %reason, "backend unreachable, giving up");
                return Err(BackendError::Unreachable(reason));
            }
            other => return other,
        }
    }
}
