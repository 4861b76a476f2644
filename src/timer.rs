//! Run timer. Elapsed time is always the wall-clock difference from the start
//! instant; the periodic display refresh in the browser only reads it.

/// Source of wall-clock milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// `Date.now()` in the browser, the system clock elsewhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        #[cfg(target_arch = "wasm32")]
        {
            js_sys::Date::now()
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs_f64() * 1000.0)
                .unwrap_or(0.0)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimerState {
    Idle,
    Running { started_at_ms: f64 },
    /// Keeps the frozen value for display.
    Stopped { elapsed_secs: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunTimer {
    state: TimerState,
}

impl Default for RunTimer {
    fn default() -> Self {
        Self { state: TimerState::Idle }
    }
}

impl RunTimer {
    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, TimerState::Idle)
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    /// Starts only from `Idle`. Returns whether the timer actually started, in which
    /// case the caller should begin refreshing the display.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = TimerState::Running { started_at_ms: now_ms };
        true
    }

    /// Freezes and returns the elapsed seconds.
    pub fn stop(&mut self, now_ms: f64) -> f64 {
        match self.state {
            TimerState::Idle => 0.0,
            TimerState::Running { started_at_ms } => {
                let elapsed_secs = ((now_ms - started_at_ms) / 1000.0).max(0.0);
                self.state = TimerState::Stopped { elapsed_secs };
                elapsed_secs
            }
            TimerState::Stopped { elapsed_secs } => elapsed_secs,
        }
    }

    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
    }

    pub fn elapsed(&self, now_ms: f64) -> f64 {
        match self.state {
            TimerState::Idle => 0.0,
            TimerState::Running { started_at_ms } => ((now_ms - started_at_ms) / 1000.0).max(0.0),
            TimerState::Stopped { elapsed_secs } => elapsed_secs,
        }
    }
}
