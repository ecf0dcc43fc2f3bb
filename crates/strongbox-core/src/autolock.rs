//! Inactivity auto-lock.
//!
//! An [`AutoLockTimer`] owns at most one scheduled tokio task. Activity
//! replaces that task with a fresh countdown; expiry runs the lock callback
//! once and leaves the timer disarmed until [`AutoLockTimer::arm`] is called
//! again after the next unlock. While disabled no task exists at all.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::{Result, StrongboxError};
use crate::session::VaultSession;

/// Default inactivity timeout (5 minutes).
pub const DEFAULT_AUTO_LOCK_SECONDS: u64 = 300;

/// Auto-lock settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoLockConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_AUTO_LOCK_SECONDS
}

impl Default for AutoLockConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_seconds: DEFAULT_AUTO_LOCK_SECONDS,
        }
    }
}

impl AutoLockConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

type LockCallback = Box<dyn Fn() + Send + Sync>;

struct TimerState {
    enabled: bool,
    timeout: Duration,
    armed: bool,
    /// Bumped whenever the pending countdown is cancelled or replaced.
    generation: u64,
    pending: Option<JoinHandle<()>>,
    deadline: Option<Instant>,
}

struct Shared {
    state: Mutex<TimerState>,
    on_lock: LockCallback,
}

/// Cooperative inactivity timer.
pub struct AutoLockTimer {
    shared: Arc<Shared>,
    runtime: Handle,
}

impl AutoLockTimer {
    /// Create a disarmed timer that spawns its countdown on `runtime`.
    pub fn new<F>(runtime: Handle, config: AutoLockConfig, on_lock: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(TimerState {
                    enabled: config.enabled,
                    timeout: config.timeout(),
                    armed: false,
                    generation: 0,
                    pending: None,
                    deadline: None,
                }),
                on_lock: Box::new(on_lock),
            }),
            runtime,
        }
    }

    /// Create a timer on the runtime of the calling context.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::Other` outside a tokio runtime.
    pub fn with_current_runtime<F>(config: AutoLockConfig, on_lock: F) -> Result<Self>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let runtime = Handle::try_current()
            .map_err(|e| StrongboxError::Other(format!("No tokio runtime for auto-lock: {}", e)))?;
        Ok(Self::new(runtime, config, on_lock))
    }

    /// A timer whose expiry locks `session`.
    pub fn for_session(session: &VaultSession, runtime: Handle, config: AutoLockConfig) -> Self {
        let session = session.clone();
        Self::new(runtime, config, move || session.lock())
    }

    /// Start counting down. Call after every successful unlock.
    pub fn arm(&self) {
        let mut state = self.shared.state.lock();
        state.armed = true;
        self.reschedule(&mut state);
    }

    /// Reset the countdown. Ignored while disarmed.
    pub fn record_activity(&self) {
        let mut state = self.shared.state.lock();
        if state.armed {
            self.reschedule(&mut state);
        }
    }

    /// Cancel the countdown and run the lock callback now, on this thread.
    pub fn lock_now(&self) {
        {
            let mut state = self.shared.state.lock();
            state.armed = false;
            cancel(&mut state);
        }
        tracing::debug!("manual lock requested");
        (self.shared.on_lock)();
    }

    /// Cancel the countdown without locking (e.g. after an explicit logout).
    pub fn disarm(&self) {
        let mut state = self.shared.state.lock();
        state.armed = false;
        cancel(&mut state);
    }

    /// Enable or disable auto-lock. Disabling drops the scheduled task.
    pub fn set_enabled(&self, enabled: bool) {
        let mut state = self.shared.state.lock();
        state.enabled = enabled;
        if enabled && state.armed {
            self.reschedule(&mut state);
        } else {
            cancel(&mut state);
        }
    }

    /// Change the timeout. A running countdown restarts with the new value.
    pub fn set_timeout(&self, timeout: Duration) {
        let mut state = self.shared.state.lock();
        state.timeout = timeout;
        if state.armed {
            self.reschedule(&mut state);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.shared.state.lock().enabled
    }

    pub fn is_armed(&self) -> bool {
        self.shared.state.lock().armed
    }

    /// Whether a countdown task currently exists.
    pub fn is_scheduled(&self) -> bool {
        self.shared.state.lock().pending.is_some()
    }

    /// Time left before the callback fires, if a countdown is running.
    pub fn remaining(&self) -> Option<Duration> {
        let state = self.shared.state.lock();
        state
            .deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    fn reschedule(&self, state: &mut TimerState) {
        cancel(state);
        if !(state.enabled && state.armed) {
            return;
        }

        let generation = state.generation;
        let timeout = state.timeout;
        let shared = Arc::clone(&self.shared);
        state.deadline = Some(Instant::now() + timeout);
        state.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            expire(&shared, generation);
        }));
    }
}

impl Drop for AutoLockTimer {
    fn drop(&mut self) {
        cancel(&mut self.shared.state.lock());
    }
}

impl std::fmt::Debug for AutoLockTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("AutoLockTimer")
            .field("enabled", &state.enabled)
            .field("timeout", &state.timeout)
            .field("armed", &state.armed)
            .field("scheduled", &state.pending.is_some())
            .finish()
    }
}

fn cancel(state: &mut TimerState) {
    state.generation = state.generation.wrapping_add(1);
    state.deadline = None;
    if let Some(handle) = state.pending.take() {
        handle.abort();
    }
}

fn expire(shared: &Shared, generation: u64) {
    {
        let mut state = shared.state.lock();
        if state.generation != generation || !state.armed {
            return;
        }
        state.armed = false;
        state.pending = None;
        state.deadline = None;
    }
    tracing::info!("inactivity timeout reached; locking vault");
    (shared.on_lock)();
}
