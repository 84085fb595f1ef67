//! Focus timer implementation.
//!
//! The timer is a seconds-granularity state machine. It does not use
//! internal threads - the caller owns a one-second tick source and is
//! responsible for calling `tick()` while the timer is visible.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused | Completed) -> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = FocusTimer::new();
//! timer.toggle();
//! // Once per second:
//! if let Some(Event::IntervalCompleted { .. }) = timer.tick() {
//!     // record the session
//! }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Focus,
    Break,
}

/// Per-user default interval lengths, loaded once from persisted settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerPreferences {
    pub focus_minutes: u64,
    pub break_minutes: u64,
}

impl Default for TimerPreferences {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            break_minutes: 5,
        }
    }
}

impl TimerPreferences {
    /// Interval length in seconds for the given mode.
    pub fn duration_secs(&self, mode: TimerMode) -> u64 {
        let minutes = match mode {
            TimerMode::Focus => self.focus_minutes,
            TimerMode::Break => self.break_minutes,
        };
        minutes.saturating_mul(60)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.focus_minutes == 0 {
            return Err(ValidationError::invalid(
                "focus_minutes",
                "must be greater than zero",
            ));
        }
        if self.break_minutes == 0 {
            return Err(ValidationError::invalid(
                "break_minutes",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Derived view of where the timer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Countdown state machine for a single focus-or-break interval.
///
/// Owned, explicit state - no global store. The `completed` flag guards
/// the completion event so it fires exactly once per interval even when
/// `tick()` keeps arriving after zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusTimer {
    time_left_secs: u64,
    duration_secs: u64,
    is_running: bool,
    mode: TimerMode,
    completed: bool,
    #[serde(default)]
    preferences: TimerPreferences,
}

impl FocusTimer {
    /// Create a timer in Focus mode with default preferences (25/5).
    pub fn new() -> Self {
        Self::with_preferences(TimerPreferences::default())
    }

    pub fn with_preferences(preferences: TimerPreferences) -> Self {
        let duration_secs = preferences.duration_secs(TimerMode::Focus);
        Self {
            time_left_secs: duration_secs,
            duration_secs,
            is_running: false,
            mode: TimerMode::Focus,
            completed: false,
            preferences,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn time_left_secs(&self) -> u64 {
        self.time_left_secs
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn preferences(&self) -> TimerPreferences {
        self.preferences
    }

    pub fn state(&self) -> TimerState {
        if self.completed {
            TimerState::Completed
        } else if self.is_running {
            TimerState::Running
        } else if self.time_left_secs < self.duration_secs {
            TimerState::Paused
        } else {
            TimerState::Idle
        }
    }

    /// 0.0 .. 1.0 progress within the current interval.
    pub fn progress(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        1.0 - (self.time_left_secs as f64 / self.duration_secs as f64)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Set the interval length explicitly. Stops the countdown and clears
    /// any completed interval.
    ///
    /// # Errors
    /// Rejects a zero duration.
    pub fn set_duration(&mut self, seconds: u64) -> Result<(), ValidationError> {
        if seconds == 0 {
            return Err(ValidationError::invalid(
                "duration",
                "must be greater than zero",
            ));
        }
        self.duration_secs = seconds;
        self.time_left_secs = seconds;
        self.is_running = false;
        self.completed = false;
        Ok(())
    }

    /// Start or pause the countdown.
    ///
    /// Toggling a completed interval resets it and starts it running, so
    /// a "running but stuck at zero" state is unrepresentable.
    pub fn toggle(&mut self) -> Event {
        if self.completed {
            self.time_left_secs = self.duration_secs;
            self.completed = false;
            self.is_running = true;
            return Event::TimerStarted {
                mode: self.mode,
                duration_secs: self.duration_secs,
                at: Utc::now(),
            };
        }
        self.is_running = !self.is_running;
        if self.is_running {
            Event::TimerStarted {
                mode: self.mode,
                duration_secs: self.duration_secs,
                at: Utc::now(),
            }
        } else {
            Event::TimerPaused {
                remaining_secs: self.time_left_secs,
                at: Utc::now(),
            }
        }
    }

    /// Put the interval back to its full duration, stopped.
    pub fn reset(&mut self) -> Event {
        self.time_left_secs = self.duration_secs;
        self.is_running = false;
        self.completed = false;
        Event::TimerReset { at: Utc::now() }
    }

    /// Advance the countdown by one second. Call once per wall-clock second
    /// while the timer is active.
    ///
    /// Returns `Some(Event::IntervalCompleted)` on the tick that reaches
    /// zero - exactly once per interval. Ticks while paused are no-ops.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        if self.time_left_secs > 0 {
            self.time_left_secs -= 1;
        }
        if self.time_left_secs == 0 && !self.completed {
            self.is_running = false;
            self.completed = true;
            return Some(Event::IntervalCompleted {
                mode: self.mode,
                duration_secs: self.duration_secs,
                at: Utc::now(),
            });
        }
        None
    }

    /// Switch between Focus and Break. Recomputes the duration from the
    /// current preferences; partial progress is discarded.
    pub fn set_mode(&mut self, mode: TimerMode) -> Event {
        self.mode = mode;
        self.duration_secs = self.preferences.duration_secs(mode);
        self.time_left_secs = self.duration_secs;
        self.is_running = false;
        self.completed = false;
        Event::ModeChanged {
            mode,
            duration_secs: self.duration_secs,
            at: Utc::now(),
        }
    }

    /// Replace the preferences and immediately recompute the current
    /// interval from the new value for the selected mode.
    ///
    /// # Errors
    /// Rejects zero-minute preferences.
    pub fn set_preferences(&mut self, preferences: TimerPreferences) -> Result<(), ValidationError> {
        preferences.validate()?;
        self.preferences = preferences;
        self.duration_secs = preferences.duration_secs(self.mode);
        self.time_left_secs = self.duration_secs;
        self.is_running = false;
        self.completed = false;
        Ok(())
    }
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::new()
    }
}
