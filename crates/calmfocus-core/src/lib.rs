//! # Calm Focus Core Library
//!
//! Core business logic for Calm Focus, a Pomodoro-style focus timer with
//! milestone gamification. All operations are available through a
//! standalone CLI binary; any GUI is a thin layer over this library.
//!
//! ## Architecture
//!
//! - **Focus Timer**: a seconds-granularity countdown state machine that
//!   requires the caller to invoke `tick()` once per second; completion is
//!   delivered as an event, exactly once per interval
//! - **Milestones**: pure progress calculation over an ordered milestone
//!   ladder and the user's unlocked set
//! - **Sessions**: the save flow that records a focus session and
//!   idempotently unlocks newly qualified milestones
//! - **Storage**: SQLite session/milestone/achievement persistence and
//!   TOML-based configuration
//!
//! ## Key Components
//!
//! - [`FocusTimer`]: countdown state machine
//! - [`SessionService`]: session recording and unlock reconciliation
//! - [`Database`]: persistence layer
//! - [`Config`]: application configuration

pub mod error;
pub mod events;
pub mod milestones;
pub mod session;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use milestones::{newly_qualified, next_milestone, Achievement, Milestone, MilestoneProgress};
pub use session::{SaveOutcome, SessionService};
pub use storage::{Config, Database, DayStats, Reminder, SessionRecord, Stats, UserSettings};
pub use timer::{FocusTimer, TimerMode, TimerPreferences, TimerState};
