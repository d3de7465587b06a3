//! Usage session timer
//!
//! [`SessionTracker`] brackets the interval between a "became active" and a
//! "will resign active" signal from the host and hands the resulting records
//! to a [`RecordingSink`].
//!
//! ```text
//!   Idle ──became_active──▶ Active ──will_resign_active──▶ Idle
//!    │                        │  ▲                          (emits session_end)
//!    └─will_resign_active─┐   └──┘ became_active
//!      (no-op)            ▼        (re-arms the timer)
//!                        Idle
//! ```
//!
//! Host lifecycle callbacks don't always pair up, so out-of-order signals are
//! absorbed rather than reported.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tempo_core::prelude::*;
use tempo_core::{AnalyticsEvent, Clock, SessionStatus, SystemClock};
use tempo_platform::RecordingSink;

use crate::identity::generate_token;

/// Open/closed state of the current session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Active {
        started_at: DateTime<Utc>,
        session_id: String,
    },
}

impl SessionState {
    pub fn status(&self) -> SessionStatus {
        match self {
            SessionState::Idle => SessionStatus::Idle,
            SessionState::Active { .. } => SessionStatus::Active,
        }
    }
}

/// Tracks the current usage session for the lifetime of the process
pub struct SessionTracker {
    state: Mutex<SessionState>,
    sink: Arc<dyn RecordingSink>,
    clock: Arc<dyn Clock>,
}

impl SessionTracker {
    /// Tracker timed by the system clock
    pub fn new(sink: Arc<dyn RecordingSink>) -> Self {
        Self::with_clock(sink, Arc::new(SystemClock))
    }

    pub fn with_clock(sink: Arc<dyn RecordingSink>, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(SessionState::Idle),
            sink,
            clock,
        }
    }

    /// Open a session, replacing any session that is already open.
    ///
    /// Emits a `session_start` record stamped with the current instant.
    pub fn record_became_active(&self) {
        let mut state = self.lock();
        let now = self.clock.now();

        if let SessionState::Active {
            started_at,
            session_id,
        } = &*state
        {
            debug!(
                "Session {} re-armed before it ended (started {})",
                session_id, started_at
            );
        }

        let session_id = generate_token();
        *state = SessionState::Active {
            started_at: now,
            session_id: session_id.clone(),
        };

        trace!("Session {} started at {}", session_id, now);
        self.sink.record(AnalyticsEvent::session_start(session_id, now));
    }

    /// Close the open session, if any.
    ///
    /// Emits a `session_end` record carrying the elapsed time since the most
    /// recent [`record_became_active`](Self::record_became_active). Does
    /// nothing when no session is open.
    pub fn record_will_resign_active(&self) {
        let mut state = self.lock();

        let (started_at, session_id) = match std::mem::take(&mut *state) {
            SessionState::Active {
                started_at,
                session_id,
            } => (started_at, session_id),
            SessionState::Idle => {
                debug!("Ignoring resign-active signal with no open session");
                return;
            }
        };

        let now = self.clock.now();
        let mut duration = now - started_at;
        if duration < chrono::Duration::zero() {
            warn!(
                "Clock moved backwards during session {} ({}ms), recording zero duration",
                session_id,
                duration.num_milliseconds()
            );
            duration = chrono::Duration::zero();
        }

        trace!(
            "Session {} ended after {}ms",
            session_id,
            duration.num_milliseconds()
        );
        self.sink.record(AnalyticsEvent::session_end(session_id, now, duration));
    }

    pub fn status(&self) -> SessionStatus {
        self.lock().status()
    }

    /// Start of the open session, `None` when idle
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match &*self.lock() {
            SessionState::Active { started_at, .. } => Some(*started_at),
            SessionState::Idle => None,
        }
    }

    /// Identifier of the open session, `None` when idle
    pub fn session_id(&self) -> Option<String> {
        match &*self.lock() {
            SessionState::Active { session_id, .. } => Some(session_id.clone()),
            SessionState::Idle => None,
        }
    }

    // Every transition leaves a valid state, so a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Debug for SessionTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTracker")
            .field("state", &*self.lock())
            .field("sink", &self.sink)
            .field("clock", &self.clock)
            .finish()
    }
}
