//! In-memory content backend for tests and embedding.
//!
//! [`InMemoryBackend`] keeps blobs, per-credential pin sets and pin jobs in
//! `HashMap`s behind `RwLock`s. Jobs advance one step per status poll
//! (queued, executing, then the configured outcome) so callers that wait
//! for terminal status see a realistic lifecycle.
//!
//! Faults can be injected to exercise the adapter's timeout, retry and
//! rejection paths, and every call is counted.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use geodid_types::{Cid, Credential, JobId, JobStatus};
use rand::RngCore;
use tracing::debug;

use crate::backend::ContentBackend;
use crate::error::{BackendError, BackendResult};
use crate::hasher::ContentHasher;

#[derive(Debug)]
struct JobRecord {
    owner: Credential,
    cid: Cid,
    status: JobStatus,
}

#[derive(Debug, Default)]
struct BackendState {
    users: HashSet<Credential>,
    blobs: HashMap<Cid, Bytes>,
    pins: HashMap<Credential, HashSet<Cid>>,
    jobs: HashMap<JobId, JobRecord>,
}

#[derive(Debug)]
struct FaultPlan {
    unreachable: bool,
    /// Number of upcoming calls that fail as unreachable.
    fail_next: u32,
    rejected: HashSet<Cid>,
    latency: Option<Duration>,
    job_outcome: JobStatus,
}

impl Default for FaultPlan {
    fn default() -> Self {
        Self {
            unreachable: false,
            fail_next: 0,
            rejected: HashSet::new(),
            latency: None,
            job_outcome: JobStatus::Success,
        }
    }
}

#[derive(Debug, Default)]
struct CallCounters {
    create_user: AtomicU64,
    stage: AtomicU64,
    pin: AtomicU64,
    get: AtomicU64,
    job_status: AtomicU64,
}

/// HashMap-backed [`ContentBackend`].
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    state: RwLock<BackendState>,
    faults: RwLock<FaultPlan>,
    counters: CallCounters,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Fault injection ----

    /// Make every call fail as unreachable until reset.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.faults.write().expect("fault lock poisoned").unreachable = unreachable;
    }

    /// Fail the next `n` calls as unreachable, then recover.
    pub fn fail_next_calls(&self, n: u32) {
        self.faults.write().expect("fault lock poisoned").fail_next = n;
    }

    /// Reject pin requests for `cid`.
    pub fn reject_pins_for(&self, cid: Cid) {
        self.faults
            .write()
            .expect("fault lock poisoned")
            .rejected
            .insert(cid);
    }

    /// Delay every call by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.faults.write().expect("fault lock poisoned").latency = latency;
    }

    /// Terminal status that newly queued jobs will end in.
    pub fn set_job_outcome(&self, outcome: JobStatus) {
        self.faults.write().expect("fault lock poisoned").job_outcome = outcome;
    }

    // ---- Inspection ----

    /// Total number of backend calls made, of any kind.
    pub fn total_calls(&self) -> u64 {
        self.create_user_calls()
            + self.stage_calls()
            + self.pin_calls()
            + self.get_calls()
            + self.job_status_calls()
    }

    pub fn create_user_calls(&self) -> u64 {
        self.counters.create_user.load(Ordering::SeqCst)
    }

    pub fn stage_calls(&self) -> u64 {
        self.counters.stage.load(Ordering::SeqCst)
    }

    pub fn pin_calls(&self) -> u64 {
        self.counters.pin.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> u64 {
        self.counters.get.load(Ordering::SeqCst)
    }

    pub fn job_status_calls(&self) -> u64 {
        self.counters.job_status.load(Ordering::SeqCst)
    }

    /// Whether `credential` currently retains `cid`.
    pub fn is_pinned(&self, credential: &Credential, cid: &Cid) -> bool {
        self.state
            .read()
            .expect("backend lock poisoned")
            .pins
            .get(credential)
            .is_some_and(|set| set.contains(cid))
    }

    /// Number of distinct staged blobs.
    pub fn blob_count(&self) -> usize {
        self.state.read().expect("backend lock poisoned").blobs.len()
    }

    // ---- Internals ----

    /// Apply latency and reachability faults ahead of a call.
    async fn enter(&self, counter: &AtomicU64) -> BackendResult<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        let latency = self.faults.read().expect("fault lock poisoned").latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        let mut faults = self.faults.write().expect("fault lock poisoned");
        if faults.unreachable {
            return Err(BackendError::Unreachable("connection refused".into()));
        }
        if faults.fail_next > 0 {
            faults.fail_next -= 1;
            return Err(BackendError::Unreachable("connection reset".into()));
        }
        Ok(())
    }

    fn authorize(state: &BackendState, credential: &Credential) -> BackendResult<()> {
        if state.users.contains(credential) {
            Ok(())
        } else {
            Err(BackendError::Unauthorized)
        }
    }
}

#[async_trait]
impl ContentBackend for InMemoryBackend {
    async fn create_user(&self) -> BackendResult<Credential> {
        self.enter(&self.counters.create_user).await?;
        let mut raw = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut raw);
        let credential = Credential::new(hex::encode(raw));
        self.state
            .write()
            .expect("backend lock poisoned")
            .users
            .insert(credential.clone());
        debug!(user = credential.fingerprint(), "user created");
        Ok(credential)
    }

    async fn stage(&self, credential: &Credential, data: Bytes) -> BackendResult<Cid> {
        self.enter(&self.counters.stage).await?;
        let cid = ContentHasher::BLOB.hash(&data);
        let mut state = self.state.write().expect("backend lock poisoned");
        Self::authorize(&state, credential)?;
        // Content-addressed: an existing entry already holds identical bytes.
        state.blobs.entry(cid.clone()).or_insert(data);
        Ok(cid)
    }

    async fn apply_storage_config(
        &self,
        credential: &Credential,
        cid: &Cid,
    ) -> BackendResult<JobId> {
        self.enter(&self.counters.pin).await?;
        let rejected = self
            .faults
            .read()
            .expect("fault lock poisoned")
            .rejected
            .contains(cid);

        let mut state = self.state.write().expect("backend lock poisoned");
        Self::authorize(&state, credential)?;
        if !state.blobs.contains_key(cid) {
            return Err(BackendError::NotFound(cid.clone()));
        }
        if rejected {
            return Err(BackendError::Rejected(format!(
                "storage config refused for {cid}"
            )));
        }
        // A pin still in progress is reported by its job, not as done.
        let in_flight = state
            .jobs
            .iter()
            .find(|(_, r)| r.owner == *credential && r.cid == *cid && !r.status.is_terminal())
            .map(|(job, _)| *job);
        if let Some(job) = in_flight {
            debug!(%job, cid = cid.short(), "pin already in flight");
            return Ok(job);
        }
        let pinned = state.pins.entry(credential.clone()).or_default();
        if !pinned.insert(cid.clone()) {
            return Err(BackendError::AlreadyPinned(cid.clone()));
        }

        let job = JobId::new();
        state.jobs.insert(
            job,
            JobRecord {
                owner: credential.clone(),
                cid: cid.clone(),
                status: JobStatus::Queued,
            },
        );
        debug!(%job, cid = cid.short(), "pin job queued");
        Ok(job)
    }

    async fn get(&self, credential: &Credential, cid: &Cid) -> BackendResult<Bytes> {
        self.enter(&self.counters.get).await?;
        let state = self.state.read().expect("backend lock poisoned");
        Self::authorize(&state, credential)?;
        state
            .blobs
            .get(cid)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(cid.clone()))
    }

    async fn job_status(&self, credential: &Credential, job: &JobId) -> BackendResult<JobStatus> {
        self.enter(&self.counters.job_status).await?;
        let outcome = self.faults.read().expect("fault lock poisoned").job_outcome;

        let mut state = self.state.write().expect("backend lock poisoned");
        Self::authorize(&state, credential)?;
        let state = &mut *state;
        let record = state
            .jobs
            .get_mut(job)
            .filter(|r| r.owner == *credential)
            .ok_or(BackendError::UnknownJob(*job))?;

        record.status = match record.status {
            JobStatus::Unspecified | JobStatus::Queued => JobStatus::Executing,
            JobStatus::Executing => outcome,
            terminal => terminal,
        };
        let status = record.status;

        // A job that did not succeed leaves nothing retained.
        if matches!(status, JobStatus::Failed | JobStatus::Canceled) {
            let cid = record.cid.clone();
            if let Some(set) = state.pins.get_mut(credential) {
                set.remove(&cid);
            }
        }
        Ok(status)
    }
}
