//! Session recording and milestone unlock reconciliation.
//!
//! The flow a completed interval travels through: verify there is a
//! current user, persist the focus session (breaks are never recorded),
//! recount sessions, and unlock any milestone whose threshold is now met.
//!
//! Failure model: a missing user and a failed session insert are hard
//! errors. Achievement inserts are soft - a failure is logged and the
//! milestone is dropped from the returned list, but the session save
//! still succeeds. Nothing here retries.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CoreError, Result};
use crate::milestones::{self, Achievement, Milestone, MilestoneProgress};
use crate::storage::Database;
use crate::timer::TimerMode;

/// Result of a successful session save.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveOutcome {
    /// Milestones unlocked by this session, threshold ascending.
    pub new_milestones: Vec<Milestone>,
    pub total_sessions: u64,
}

/// Session operations for one user against the database.
pub struct SessionService<'a> {
    db: &'a Database,
    user_id: Option<String>,
}

impl<'a> SessionService<'a> {
    pub fn new(db: &'a Database, user_id: Option<String>) -> Self {
        Self { db, user_id }
    }

    fn require_user(&self) -> Result<&str> {
        self.user_id.as_deref().ok_or(CoreError::NotAuthenticated)
    }

    /// Persist a completed interval and reconcile milestone unlocks.
    ///
    /// Break intervals succeed without touching the database. The session
    /// start time is derived by subtracting the interval duration from
    /// `completed_at`.
    ///
    /// # Errors
    /// `NotAuthenticated` when no user is configured; `Database` when the
    /// session insert itself fails. Achievement-insert failures are soft.
    pub fn save_session(
        &self,
        duration_secs: u64,
        mode: TimerMode,
        completed_at: DateTime<Utc>,
    ) -> Result<SaveOutcome> {
        let user_id = self.require_user()?;

        if mode != TimerMode::Focus {
            return Ok(SaveOutcome::default());
        }

        let started_at = completed_at - Duration::seconds(duration_secs as i64);
        let duration_min = (duration_secs + 30) / 60;
        self.db
            .record_focus_session(user_id, duration_min, started_at, completed_at)?;

        let total_sessions = self.db.count_focus_sessions(user_id)?;
        let active = self.db.list_active_milestones()?;
        let unlocked = self.db.list_unlocked_milestone_ids(user_id)?;

        let mut new_milestones = Vec::new();
        for milestone in milestones::newly_qualified(total_sessions, &active, &unlocked) {
            match self.db.insert_user_achievement(user_id, milestone.id) {
                Ok(_inserted) => new_milestones.push(milestone),
                Err(e) => {
                    // Soft failure: the session row is already committed.
                    warn!(
                        milestone_id = milestone.id,
                        error = %e,
                        "failed to persist achievement unlock"
                    );
                }
            }
        }

        Ok(SaveOutcome {
            new_milestones,
            total_sessions,
        })
    }

    /// Progress toward the next locked milestone, from fresh state.
    pub fn progress(&self) -> Result<MilestoneProgress> {
        let user_id = self.require_user()?;
        let total_sessions = self.db.count_focus_sessions(user_id)?;
        let active = self.db.list_active_milestones()?;
        let unlocked = self.db.list_unlocked_milestone_ids(user_id)?;
        Ok(milestones::next_milestone(total_sessions, &active, &unlocked))
    }

    /// Unlocked achievements, newest first.
    pub fn achievements(&self) -> Result<Vec<Achievement>> {
        let user_id = self.require_user()?;
        Ok(self.db.list_achievements(user_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    fn service(db: &Database) -> SessionService<'_> {
        SessionService::new(db, Some("user-1".to_string()))
    }

    fn seed_ladder(db: &Database) -> Vec<i64> {
        vec![
            db.insert_milestone("Getting Started", None, 5, None, None, true)
                .unwrap(),
            db.insert_milestone("Momentum", None, 10, None, None, true)
                .unwrap(),
            db.insert_milestone("Deep Focus", None, 20, None, None, true)
                .unwrap(),
        ]
    }

    fn save_focus_sessions(svc: &SessionService<'_>, count: usize) -> SaveOutcome {
        let mut last = SaveOutcome::default();
        for _ in 0..count {
            last = svc
                .save_session(25 * 60, TimerMode::Focus, Utc::now())
                .unwrap();
        }
        last
    }

    #[test]
    fn missing_user_is_a_hard_error() {
        let db = Database::open_memory().unwrap();
        let svc = SessionService::new(&db, None);
        let err = svc.save_session(25 * 60, TimerMode::Focus, Utc::now());
        assert!(matches!(err, Err(CoreError::NotAuthenticated)));
    }

    #[test]
    fn breaks_are_not_recorded() {
        let db = Database::open_memory().unwrap();
        let svc = service(&db);
        let outcome = svc
            .save_session(5 * 60, TimerMode::Break, Utc::now())
            .unwrap();
        assert!(outcome.new_milestones.is_empty());
        assert_eq!(db.count_focus_sessions("user-1").unwrap(), 0);
    }

    #[test]
    fn focus_session_is_recorded_with_derived_start() {
        let db = Database::open_memory().unwrap();
        let svc = service(&db);
        let completed_at = Utc::now();
        let outcome = svc
            .save_session(25 * 60, TimerMode::Focus, completed_at)
            .unwrap();
        assert_eq!(outcome.total_sessions, 1);

        let recent = db.list_recent_sessions("user-1", 1).unwrap();
        assert_eq!(recent[0].duration_min, 25);
        assert_eq!(
            recent[0].completed_at - recent[0].started_at,
            Duration::seconds(25 * 60)
        );
    }

    #[test]
    fn crossing_a_threshold_unlocks_the_milestone() {
        let db = Database::open_memory().unwrap();
        seed_ladder(&db);
        let svc = service(&db);

        let outcome = save_focus_sessions(&svc, 4);
        assert!(outcome.new_milestones.is_empty());

        let outcome = save_focus_sessions(&svc, 1);
        assert_eq!(outcome.new_milestones.len(), 1);
        assert_eq!(outcome.new_milestones[0].title, "Getting Started");
        assert_eq!(outcome.total_sessions, 5);
    }

    #[test]
    fn a_jump_past_two_thresholds_unlocks_both() {
        let db = Database::open_memory().unwrap();
        seed_ladder(&db);
        let svc = service(&db);

        // Sessions recorded out-of-band, then one save crosses 5 and 10.
        for _ in 0..11 {
            db.record_focus_session("user-1", 25, Utc::now(), Utc::now())
                .unwrap();
        }
        let outcome = save_focus_sessions(&svc, 1);
        let titles: Vec<&str> = outcome
            .new_milestones
            .iter()
            .map(|m| m.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Getting Started", "Momentum"]);
        assert_eq!(db.list_achievements("user-1").unwrap().len(), 2);
    }

    #[test]
    fn unlocks_are_idempotent_across_saves() {
        let db = Database::open_memory().unwrap();
        seed_ladder(&db);
        let svc = service(&db);

        let outcome = save_focus_sessions(&svc, 5);
        assert_eq!(outcome.new_milestones.len(), 1);

        // Next save: the unlock is reflected in state, nothing new.
        let outcome = save_focus_sessions(&svc, 1);
        assert!(outcome.new_milestones.is_empty());
        assert_eq!(db.list_achievements("user-1").unwrap().len(), 1);
    }

    #[test]
    fn progress_tracks_the_next_rung() {
        let db = Database::open_memory().unwrap();
        seed_ladder(&db);
        let svc = service(&db);

        save_focus_sessions(&svc, 7);
        let progress = svc.progress().unwrap();
        let next = progress.milestone.unwrap();
        assert_eq!(next.session_threshold, 10);
        assert_eq!(progress.progress, 2);
        assert_eq!(progress.progress_percentage, 40.0);
        assert_eq!(progress.sessions_to_go, 3);
    }

    #[test]
    fn achievements_listing_is_newest_first() {
        let db = Database::open_memory().unwrap();
        seed_ladder(&db);
        let svc = service(&db);
        save_focus_sessions(&svc, 10);

        let achievements = svc.achievements().unwrap();
        assert_eq!(achievements.len(), 2);
        assert!(achievements[0].unlocked_at >= achievements[1].unlocked_at);
    }

    #[test]
    fn duration_rounds_to_nearest_minute() {
        let db = Database::open_memory().unwrap();
        let svc = service(&db);
        svc.save_session(25 * 60 + 29, TimerMode::Focus, Utc::now())
            .unwrap();
        svc.save_session(25 * 60 + 31, TimerMode::Focus, Utc::now())
            .unwrap();
        let recent = db.list_recent_sessions("user-1", 2).unwrap();
        let minutes: Vec<u64> = recent.iter().map(|s| s.duration_min).collect();
        assert!(minutes.contains(&25));
        assert!(minutes.contains(&26));
    }
}
