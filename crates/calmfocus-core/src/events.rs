use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerMode;

/// Every timer state change produces an Event.
///
/// `IntervalCompleted` is the completion notification: it is returned from
/// `FocusTimer::tick` at most once per interval, so the consumer never has
/// to poll a flag or deduplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    ModeChanged {
        mode: TimerMode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// A countdown reached zero. Fired exactly once per interval.
    IntervalCompleted {
        mode: TimerMode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// A milestone was unlocked by a just-recorded focus session.
    MilestoneUnlocked {
        milestone_id: i64,
        title: String,
        at: DateTime<Utc>,
    },
}
