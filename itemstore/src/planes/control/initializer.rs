use crate::domain::InitState;
use crate::ports::ItemRepository;
use shared::config::InitSettings;
use shared::{Error, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Bounded, fixed-backoff retry used while the process starts up
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Duration,
}

impl From<&InitSettings> for RetryPolicy {
    fn from(settings: &InitSettings) -> Self {
        Self {
            attempts: settings.retry_attempts,
            backoff: settings.retry_backoff,
        }
    }
}

/// Makes sure the backing schema and seed rows exist, once.
///
/// The state moves from `NotStarted` to `Ready` exactly once and never goes
/// back. At most one attempt runs at a time: callers that queued on `gate`
/// while an attempt was running take that attempt's outcome instead of
/// starting their own. A failed attempt leaves the state at `NotStarted`, so
/// the next caller that arrives afterwards tries again.
pub struct Initializer {
    repository: Arc<dyn ItemRepository>,
    ready: AtomicBool,
    /// Number of finished attempts; lets a queued caller see it was overtaken
    finished: AtomicU64,
    /// Guards the attempt itself and holds the last failure
    gate: Mutex<Option<String>>,
    attempt_timeout: Duration,
}

impl Initializer {
    pub fn new(repository: Arc<dyn ItemRepository>, attempt_timeout: Duration) -> Self {
        Self {
            repository,
            ready: AtomicBool::new(false),
            finished: AtomicU64::new(0),
            gate: Mutex::new(None),
            attempt_timeout,
        }
    }

    pub fn state(&self) -> InitState {
        if self.ready.load(Ordering::Acquire) {
            InitState::Ready
        } else {
            InitState::NotStarted
        }
    }

    pub async fn ensure_ready(&self) -> Result<()> {
        if self.ready.load(Ordering::Acquire) {
            return Ok(());
        }

        let seen = self.finished.load(Ordering::Acquire);
        let mut last_failure = self.gate.lock().await;
        if self.ready.load(Ordering::Acquire) {
            return Ok(());
        }
        if self.finished.load(Ordering::Acquire) != seen {
            let reason = last_failure.as_deref().unwrap_or("initialization failed");
            return Err(Error::StoreUnavailable(reason.to_string()));
        }

        let outcome = self.attempt().await;
        match &outcome {
            Ok(()) => self.ready.store(true, Ordering::Release),
            Err(Error::StoreUnavailable(reason)) => *last_failure = Some(reason.clone()),
            Err(e) => *last_failure = Some(e.to_string()),
        }
        self.finished.fetch_add(1, Ordering::AcqRel);
        outcome
    }

    async fn attempt(&self) -> Result<()> {
        let report = match tokio::time::timeout(self.attempt_timeout, self.repository.ensure_schema())
            .await
        {
            Ok(Ok(report)) => report,
            Ok(Err(e @ Error::StoreUnavailable(_))) => return Err(e),
            Ok(Err(e)) => {
                return Err(Error::StoreUnavailable(format!(
                    "initialization failed: {}",
                    e
                )));
            }
            Err(_) => {
                return Err(Error::StoreUnavailable(format!(
                    "initialization timed out after {:?}",
                    self.attempt_timeout
                )));
            }
        };

        info!(seeded = report.seeded, "backing store ready");
        Ok(())
    }

    /// Startup variant: retries a bounded number of times and never fails.
    /// Returns the state reached so the caller can report degraded mode.
    pub async fn ensure_ready_with_retry(&self, policy: RetryPolicy) -> InitState {
        let attempts = policy.attempts.max(1);

        for attempt in 1..=attempts {
            match self.ensure_ready().await {
                Ok(()) => return InitState::Ready,
                Err(e) => {
                    warn!(attempt, attempts, error = %e, "backing store not ready");
                    if attempt < attempts {
                        tokio::time::sleep(policy.backoff).await;
                    }
                }
            }
        }

        warn!("giving up on startup initialization; serving in degraded mode");
        self.state()
    }
}

impl std::fmt::Debug for Initializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Initializer")
            .field("state", &self.state())
            .field("attempt_timeout", &self.attempt_timeout)
            .finish()
    }
}
