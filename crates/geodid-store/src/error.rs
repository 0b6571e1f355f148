use geodid_types::{Cid, JobId};

/// Failures reported by a [`ContentBackend`](crate::ContentBackend).
///
/// These describe what the backend said. The adapter translates them into
/// [`StoreError`] according to the operation that was running.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The backend could not be reached or did not answer in time.
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    /// The content is already pinned under this credential.
    #[error("cid already pinned: {0}")]
    AlreadyPinned(Cid),

    /// The backend refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The credential is unknown to the backend.
    #[error("credential not recognised")]
    Unauthorized,

    /// No content is stored under this hash.
    #[error("content not found: {0}")]
    NotFound(Cid),

    /// No job with this id exists for the credential.
    #[error("unknown job: {0}")]
    UnknownJob(JobId),
}

/// Result alias for raw backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors surfaced by the content-store adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Backend unreachable or timed out after all retry attempts.
    #[error("store unavailable during {operation}: {reason}")]
    Unavailable {
        operation: &'static str,
        reason: String,
    },

    /// The backend rejected a pin for a reason other than "already pinned".
    #[error("pin failed for {cid}: {reason}")]
    PinFailed { cid: Cid, reason: String },

    /// The content hash is unknown to the backend.
    #[error("content not found: {0}")]
    NotFound(Cid),

    /// The session credential was refused.
    #[error("credential refused during {operation}")]
    Unauthorized { operation: &'static str },

    /// The backend refused a non-pin request.
    #[error("{operation} rejected: {reason}")]
    Rejected {
        operation: &'static str,
        reason: String,
    },

    #[error("unknown job: {0}")]
    UnknownJob(JobId),
}

impl StoreError {
    /// Whether a caller may reasonably retry the operation later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::PinFailed { .. })
    }

    /// Translate a backend failure for a non-pin operation.
    pub(crate) fn from_backend(operation: &'static str, err: BackendError) -> Self {
        match err {
            BackendError::Unreachable(reason) => Self::Unavailable { operation, reason },
            BackendError::NotFound(cid) => Self::NotFound(cid),
            BackendError::Unauthorized => Self::Unauthorized { operation },
            BackendError::UnknownJob(job) => Self::UnknownJob(job),
            BackendError::AlreadyPinned(cid) => Self::Rejected {
                operation,
                reason: format!("unexpected already-pinned response for {cid}"),
            },
            BackendError::Rejected(reason) => Self::Rejected { operation, reason },
        }
    }
}

/// Result alias for adapter operations.
pub type StoreResult<T> = Result<T, StoreError>;
