use std::time::{
    Duration,
    Instant,
};

pub const DEFAULT_QUIET_PERIOD_MS: u64 = 500;

#[derive(Debug, Clone)]
enum DebounceState<T> {
    Idle,
    Armed { value: T, deadline: Instant },
}

/// Turns a burst of input changes into one settled value.
///
/// Every `input` re-arms the timer with the latest value; `poll` emits it once the quiet
/// period has fully elapsed since the last change and returns to idle. Time is supplied by
/// the caller, which polls from its event loop.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    state: DebounceState<T>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_QUIET_PERIOD_MS))
    }
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, state: DebounceState::Idle }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    pub fn input(&mut self, value: T, now: Instant) {
        self.state = DebounceState::Armed { value, deadline: now + self.quiet };
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = matches!(&self.state, DebounceState::Armed { deadline, .. } if now >= *deadline);
        if !due {
            return None;
        }

        match std::mem::replace(&mut self.state, DebounceState::Idle) {
            DebounceState::Armed { value, .. } => Some(value),
            DebounceState::Idle => None,
        }
    }

    /// Drops a pending emission without emitting it.
    pub fn cancel(&mut self) {
        self.state = DebounceState::Idle;
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, DebounceState::Armed { .. })
    }

    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            DebounceState::Armed { deadline, .. } => Some(*deadline),
            DebounceState::Idle => None,
        }
    }

    pub fn pending(&self) -> Option<&T> {
        match &self.state {
            DebounceState::Armed { value, .. } => Some(value),
            DebounceState::Idle => None,
        }
    }
}
