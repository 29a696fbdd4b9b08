use web_time::Instant;

/// Identity of one game session, bumped on every reset so late timer ticks can be told apart.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Valid transitions:
/// - Idle -> Running
/// - Idle -> Stopped
/// - Running -> Stopped
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Stopped,
}

/// Whole-second game clock, started lazily and stopped once.
#[derive(Clone, Debug)]
pub struct Timer {
    session: SessionId,
    state: TimerState,
    started_at: Option<Instant>,
    elapsed_secs: u32,
}

impl Timer {
    pub fn new(session: SessionId) -> Self {
        Self {
            session,
            state: TimerState::Idle,
            started_at: None,
            elapsed_secs: 0,
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Last published number of whole seconds.
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// Starts the clock, returns `false` if it was already started or stopped.
    pub fn start(&mut self, now: Instant) -> bool {
        if !matches!(self.state, TimerState::Idle) {
            return false;
        }
        self.state = TimerState::Running;
        self.started_at = Some(now);
        log::debug!("timer started for session {}", self.session.get());
        true
    }

    /// Stops the clock for good, publishing the final elapsed time.
    pub fn stop(&mut self, now: Instant) {
        if let (TimerState::Running, Some(started_at)) = (self.state, self.started_at) {
            self.elapsed_secs = whole_secs(started_at, now);
        }
        self.state = TimerState::Stopped;
        log::debug!(
            "timer stopped for session {} at {}s",
            self.session.get(),
            self.elapsed_secs
        );
    }

    /// Applies a scheduled tick. Ticks for another session or a clock that is not running are
    /// ignored. Returns whether the published seconds changed.
    pub fn tick(&mut self, session: SessionId, now: Instant) -> bool {
        if session != self.session {
            log::trace!(
                "ignoring stale tick for session {}, current is {}",
                session.get(),
                self.session.get()
            );
            return false;
        }
        let (TimerState::Running, Some(started_at)) = (self.state, self.started_at) else {
            return false;
        };

        let secs = whole_secs(started_at, now);
        if secs != self.elapsed_secs {
            self.elapsed_secs = secs;
            true
        } else {
            false
        }
    }
}

fn whole_secs(started_at: Instant, now: Instant) -> u32 {
    now.saturating_duration_since(started_at)
        .as_secs()
        .try_into()
        .unwrap_or(u32::MAX)
}
