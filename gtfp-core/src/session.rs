//! Session bookkeeping
//!
//! Tracks what the host knows about one module:
//! - Open/closed state (set by the Open and Close commands)
//! - Whether a command is currently in flight

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    command::Command,
    error::{Error, Result},
};

/// Module state as seen by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Open not yet acknowledged, or Close sent
    Closed,

    /// Open acknowledged
    Open,
}

/// Session tracker
///
/// Enforces one outstanding command per module.
/// Thread-safe and can be cloned cheaply (Arc internally).
#[derive(Debug, Clone)]
pub struct SessionTracker {
    inner: Arc<TrackerInner>,
}

#[derive(Debug)]
struct TrackerInner {
    /// Set while a command waits for its response
    busy: AtomicBool,

    /// Current session state
    state: parking_lot::RwLock<SessionState>,
}

/// Marks a command as in flight until dropped
#[derive(Debug)]
pub struct InFlight {
    inner: Arc<TrackerInner>,
    command: Command,
}

impl InFlight {
    /// Command this guard was taken for
    pub fn command(&self) -> Command {
        self.command
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.inner.busy.store(false, Ordering::Release);
    }
}

impl SessionTracker {
    /// Create a tracker for a closed module
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                busy: AtomicBool::new(false),
                state: parking_lot::RwLock::new(SessionState::Closed),
            }),
        }
    }

    /// Claim the session for `command`
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionBusy`] if another command is in flight.
    pub fn begin(&self, command: Command) -> Result<InFlight> {
        if self
            .inner
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::SessionBusy);
        }

        Ok(InFlight {
            inner: Arc::clone(&self.inner),
            command,
        })
    }

    /// Check if a command is in flight
    pub fn is_busy(&self) -> bool {
        self.inner.busy.load(Ordering::Acquire)
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        *self.inner.state.read()
    }

    /// Check if the module has been opened
    pub fn is_open(&self) -> bool {
        matches!(self.state(), SessionState::Open)
    }

    /// Record a successful Open, returning the previous state
    pub fn mark_open(&self) -> SessionState {
        std::mem::replace(&mut *self.inner.state.write(), SessionState::Open)
    }

    /// Record a Close
    pub fn mark_closed(&self) {
        *self.inner.state.write() = SessionState::Closed;
    }
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new()
    }
}
