mod engine;

pub use engine::{FocusTimer, TimerMode, TimerPreferences, TimerState};
