use std::time::Duration;

use serde::{Deserialize, Serialize};

/// When a pin call is allowed to return.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinMode {
    /// Return once the backend has accepted and queued the pin job.
    /// Durability is left to the backend.
    #[default]
    Acknowledged,
    /// Poll the job until it reaches a terminal status before returning.
    /// Failed or canceled jobs surface as `PinFailed`.
    AwaitTerminal,
}

/// Configuration for a [`ContentStore`](crate::ContentStore).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend endpoint, for logging and for network backends.
    pub endpoint: String,
    /// Upper bound on any single backend call.
    pub request_timeout_ms: u64,
    /// Extra attempts made when the backend is unreachable.
    pub max_retries: u32,
    /// Backoff step between attempts; attempt `n` waits `n * retry_backoff`.
    pub retry_backoff_ms: u64,
    pub pin_mode: PinMode,
    /// Interval between job-status polls in [`PinMode::AwaitTerminal`].
    pub job_poll_interval_ms: u64,
    /// Total time allowed for a job to reach a terminal status.
    pub job_wait_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://0.0.0.0:6002".into(),
            request_timeout_ms: 10_000,
            max_retries: 2,
            retry_backoff_ms: 200,
            pin_mode: PinMode::Acknowledged,
            job_poll_interval_ms: 250,
            job_wait_timeout_ms: 60_000,
        }
    }
}

impl StoreConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn job_poll_interval(&self) -> Duration {
        Duration::from_millis(self.job_poll_interval_ms)
    }

    pub fn job_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.job_wait_timeout_ms)
    }

    /// Same configuration with terminal-status pins.
    pub fn await_terminal(self) -> Self {
        Self {
            pin_mode: PinMode::AwaitTerminal,
            ..self
        }
    }
}
