//! SQLite-based persistence.
//!
//! Provides storage for:
//! - Completed focus sessions
//! - Milestone definitions and per-user achievement unlocks
//! - Per-user timer preferences
//! - Key-value store for application state (the CLI keeps the timer
//!   snapshot here between invocations)
//!
//! The composite UNIQUE key on `user_achievements(user_id, milestone_id)`
//! is what makes unlocking idempotent: concurrent writers racing on the
//! same unlock both succeed, and only one row exists afterwards.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::milestones::{Achievement, Milestone};
use crate::timer::TimerPreferences;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub duration_min: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stats {
    pub total_sessions: u64,
    pub total_focus_min: u64,
    pub today_sessions: u64,
    pub today_focus_min: u64,
}

/// A single day's session counts.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DayStats {
    pub sessions: u64,
    pub focus_min: u64,
}

/// A scheduled reminder for the current user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub title: String,
    pub message: Option<String>,
    pub remind_at: DateTime<Utc>,
}

/// Per-user settings persisted alongside sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub focus_minutes: u64,
    pub break_minutes: u64,
    /// Target focus sessions per day, shown against today's count.
    pub daily_goal: u64,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            break_minutes: 5,
            daily_goal: 8,
        }
    }
}

impl UserSettings {
    /// Validate against the ranges enforced by the settings form.
    ///
    /// # Errors
    /// Returns a validation error naming the offending field.
    pub fn validate(&self) -> Result<(), crate::error::ValidationError> {
        use crate::error::ValidationError;
        if !(5..=60).contains(&self.focus_minutes) {
            return Err(ValidationError::invalid(
                "focus_minutes",
                "focus duration must be between 5 and 60 minutes",
            ));
        }
        if !(1..=30).contains(&self.break_minutes) {
            return Err(ValidationError::invalid(
                "break_minutes",
                "break duration must be between 1 and 30 minutes",
            ));
        }
        if !(1..=20).contains(&self.daily_goal) {
            return Err(ValidationError::invalid(
                "daily_goal",
                "daily goal must be between 1 and 20 sessions",
            ));
        }
        Ok(())
    }

    pub fn timer_preferences(&self) -> TimerPreferences {
        TimerPreferences {
            focus_minutes: self.focus_minutes,
            break_minutes: self.break_minutes,
        }
    }
}

/// SQLite database for sessions, milestones, and achievements.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/calmfocus/calmfocus.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("calmfocus.db");
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS focus_sessions (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id      TEXT NOT NULL,
                duration_min INTEGER NOT NULL,
                started_at   TEXT NOT NULL,
                completed_at TEXT NOT NULL,
                session_type TEXT NOT NULL DEFAULT 'focus',
                completed    INTEGER NOT NULL DEFAULT 1
            );

            CREATE TABLE IF NOT EXISTS milestones (
                id                INTEGER PRIMARY KEY AUTOINCREMENT,
                title             TEXT NOT NULL,
                description       TEXT,
                session_threshold INTEGER NOT NULL,
                badge_icon        TEXT,
                badge_color       TEXT,
                is_active         INTEGER NOT NULL DEFAULT 1
            );

            CREATE TABLE IF NOT EXISTS user_achievements (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id      TEXT NOT NULL,
                milestone_id INTEGER NOT NULL REFERENCES milestones(id) ON DELETE CASCADE,
                unlocked_at  TEXT NOT NULL,
                UNIQUE(user_id, milestone_id)
            );

            CREATE TABLE IF NOT EXISTS preferences (
                user_id       TEXT PRIMARY KEY,
                focus_minutes INTEGER NOT NULL,
                break_minutes INTEGER NOT NULL,
                daily_goal    INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS reminders (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id   TEXT NOT NULL,
                title     TEXT NOT NULL,
                message   TEXT,
                remind_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            -- Indexes for the common query patterns
            CREATE INDEX IF NOT EXISTS idx_focus_sessions_user ON focus_sessions(user_id);
            CREATE INDEX IF NOT EXISTS idx_focus_sessions_user_completed_at
                ON focus_sessions(user_id, completed_at);
            CREATE INDEX IF NOT EXISTS idx_milestones_threshold ON milestones(session_threshold);
            CREATE INDEX IF NOT EXISTS idx_user_achievements_user ON user_achievements(user_id);
            CREATE INDEX IF NOT EXISTS idx_reminders_user_remind_at ON reminders(user_id, remind_at);",
        )?;
        Ok(())
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Record a completed focus session.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_focus_session(
        &self,
        user_id: &str,
        duration_min: u64,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<i64, rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO focus_sessions (user_id, duration_min, started_at, completed_at, session_type, completed)
             VALUES (?1, ?2, ?3, ?4, 'focus', 1)",
            params![
                user_id,
                duration_min,
                started_at.to_rfc3339(),
                completed_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn count_focus_sessions(&self, user_id: &str) -> Result<u64, rusqlite::Error> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM focus_sessions WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )
    }

    pub fn list_recent_sessions(
        &self,
        user_id: &str,
        limit: u64,
    ) -> Result<Vec<SessionRecord>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, duration_min, started_at, completed_at
             FROM focus_sessions
             WHERE user_id = ?1
             ORDER BY completed_at DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![user_id, limit], |row| {
            Ok(SessionRecord {
                id: row.get(0)?,
                duration_min: row.get(1)?,
                started_at: parse_ts(2, row.get(2)?)?,
                completed_at: parse_ts(3, row.get(3)?)?,
            })
        })?;
        rows.collect()
    }

    pub fn stats_today(&self, user_id: &str) -> Result<DayStats, rusqlite::Error> {
        let midnight = today_midnight();
        self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(duration_min), 0)
             FROM focus_sessions
             WHERE user_id = ?1 AND completed_at >= ?2",
            params![user_id, midnight],
            |row| {
                Ok(DayStats {
                    sessions: row.get(0)?,
                    focus_min: row.get(1)?,
                })
            },
        )
    }

    pub fn stats_all(&self, user_id: &str) -> Result<Stats, rusqlite::Error> {
        let (total_sessions, total_focus_min) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(duration_min), 0)
             FROM focus_sessions
             WHERE user_id = ?1",
            params![user_id],
            |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
        )?;
        let today = self.stats_today(user_id)?;
        Ok(Stats {
            total_sessions,
            total_focus_min,
            today_sessions: today.sessions,
            today_focus_min: today.focus_min,
        })
    }

    // ── Milestones ───────────────────────────────────────────────────

    /// Active milestones ordered by threshold ascending.
    pub fn list_active_milestones(&self) -> Result<Vec<Milestone>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, session_threshold, badge_icon, badge_color, is_active
             FROM milestones
             WHERE is_active = 1
             ORDER BY session_threshold ASC",
        )?;
        let rows = stmt.query_map([], row_to_milestone)?;
        rows.collect()
    }

    /// All milestones, including inactive ones (admin view).
    pub fn list_milestones(&self) -> Result<Vec<Milestone>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, session_threshold, badge_icon, badge_color, is_active
             FROM milestones
             ORDER BY session_threshold ASC",
        )?;
        let rows = stmt.query_map([], row_to_milestone)?;
        rows.collect()
    }

    pub fn get_milestone(&self, id: i64) -> Result<Option<Milestone>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT id, title, description, session_threshold, badge_icon, badge_color, is_active
                 FROM milestones WHERE id = ?1",
                params![id],
                row_to_milestone,
            )
            .optional()
    }

    /// Insert a milestone definition; returns the new id.
    pub fn insert_milestone(
        &self,
        title: &str,
        description: Option<&str>,
        session_threshold: u64,
        badge_icon: Option<&str>,
        badge_color: Option<&str>,
        is_active: bool,
    ) -> Result<i64, rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO milestones (title, description, session_threshold, badge_icon, badge_color, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                title,
                description,
                session_threshold,
                badge_icon,
                badge_color,
                is_active
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Full-row milestone update; returns false when the id does not exist.
    pub fn update_milestone(&self, milestone: &Milestone) -> Result<bool, rusqlite::Error> {
        let changed = self.conn.execute(
            "UPDATE milestones
             SET title = ?2, description = ?3, session_threshold = ?4,
                 badge_icon = ?5, badge_color = ?6, is_active = ?7
             WHERE id = ?1",
            params![
                milestone.id,
                milestone.title,
                milestone.description,
                milestone.session_threshold,
                milestone.badge_icon,
                milestone.badge_color,
                milestone.is_active
            ],
        )?;
        Ok(changed > 0)
    }

    /// Delete a milestone. Achievement rows referencing it cascade.
    pub fn delete_milestone(&self, id: i64) -> Result<bool, rusqlite::Error> {
        let changed = self
            .conn
            .execute("DELETE FROM milestones WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // ── Achievements ─────────────────────────────────────────────────

    pub fn list_unlocked_milestone_ids(
        &self,
        user_id: &str,
    ) -> Result<HashSet<i64>, rusqlite::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT milestone_id FROM user_achievements WHERE user_id = ?1")?;
        let rows = stmt.query_map(params![user_id], |row| row.get::<_, i64>(0))?;
        rows.collect()
    }

    /// Unlock a milestone for a user. Returns true when a new row was
    /// created, false when the achievement already existed - the duplicate
    /// is absorbed by the UNIQUE key and is not an error.
    pub fn insert_user_achievement(
        &self,
        user_id: &str,
        milestone_id: i64,
    ) -> Result<bool, rusqlite::Error> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO user_achievements (user_id, milestone_id, unlocked_at)
             VALUES (?1, ?2, ?3)",
            params![user_id, milestone_id, Utc::now().to_rfc3339()],
        )?;
        Ok(changed > 0)
    }

    /// Unlocked achievements with joined milestone data, newest first.
    pub fn list_achievements(&self, user_id: &str) -> Result<Vec<Achievement>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT a.id, a.unlocked_at,
                    m.id, m.title, m.description, m.session_threshold,
                    m.badge_icon, m.badge_color, m.is_active
             FROM user_achievements a
             JOIN milestones m ON m.id = a.milestone_id
             WHERE a.user_id = ?1
             ORDER BY a.unlocked_at DESC",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(Achievement {
                id: row.get(0)?,
                unlocked_at: parse_ts(1, row.get(1)?)?,
                milestone: Milestone {
                    id: row.get(2)?,
                    title: row.get(3)?,
                    description: row.get(4)?,
                    session_threshold: row.get(5)?,
                    badge_icon: row.get(6)?,
                    badge_color: row.get(7)?,
                    is_active: row.get(8)?,
                },
            })
        })?;
        rows.collect()
    }

    // ── Preferences ──────────────────────────────────────────────────

    pub fn get_settings(&self, user_id: &str) -> Result<Option<UserSettings>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT focus_minutes, break_minutes, daily_goal
                 FROM preferences WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(UserSettings {
                        focus_minutes: row.get(0)?,
                        break_minutes: row.get(1)?,
                        daily_goal: row.get(2)?,
                    })
                },
            )
            .optional()
    }

    pub fn set_settings(
        &self,
        user_id: &str,
        settings: &UserSettings,
    ) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO preferences (user_id, focus_minutes, break_minutes, daily_goal)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                 focus_minutes = excluded.focus_minutes,
                 break_minutes = excluded.break_minutes,
                 daily_goal = excluded.daily_goal",
            params![
                user_id,
                settings.focus_minutes,
                settings.break_minutes,
                settings.daily_goal
            ],
        )?;
        Ok(())
    }

    // ── Reminders ────────────────────────────────────────────────────

    /// Schedule a reminder; returns the new id.
    pub fn insert_reminder(
        &self,
        user_id: &str,
        title: &str,
        message: Option<&str>,
        remind_at: DateTime<Utc>,
    ) -> Result<i64, rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO reminders (user_id, title, message, remind_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![user_id, title, message, remind_at.to_rfc3339()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All of the user's reminders, soonest first.
    pub fn list_reminders(&self, user_id: &str) -> Result<Vec<Reminder>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, message, remind_at
             FROM reminders
             WHERE user_id = ?1
             ORDER BY remind_at ASC",
        )?;
        let rows = stmt.query_map(params![user_id], row_to_reminder)?;
        rows.collect()
    }

    /// Reminders whose time has come within the last 24 hours, newest
    /// first. Older ones are considered stale and not surfaced.
    pub fn list_due_reminders(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Reminder>, rusqlite::Error> {
        let one_day_ago = now - chrono::Duration::hours(24);
        let mut stmt = self.conn.prepare(
            "SELECT id, title, message, remind_at
             FROM reminders
             WHERE user_id = ?1 AND remind_at <= ?2 AND remind_at >= ?3
             ORDER BY remind_at DESC",
        )?;
        let rows = stmt.query_map(
            params![user_id, now.to_rfc3339(), one_day_ago.to_rfc3339()],
            row_to_reminder,
        )?;
        rows.collect()
    }

    pub fn delete_reminder(&self, id: i64) -> Result<bool, rusqlite::Error> {
        let changed = self
            .conn
            .execute("DELETE FROM reminders WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // ── Key-value store ──────────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

fn row_to_milestone(row: &rusqlite::Row<'_>) -> Result<Milestone, rusqlite::Error> {
    Ok(Milestone {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        session_threshold: row.get(3)?,
        badge_icon: row.get(4)?,
        badge_color: row.get(5)?,
        is_active: row.get(6)?,
    })
}

fn row_to_reminder(row: &rusqlite::Row<'_>) -> Result<Reminder, rusqlite::Error> {
    Ok(Reminder {
        id: row.get(0)?,
        title: row.get(1)?,
        message: row.get(2)?,
        remind_at: parse_ts(3, row.get(3)?)?,
    })
}

fn parse_ts(idx: usize, value: String) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// RFC3339 string for today's UTC midnight, comparable lexically with the
/// stored timestamps.
fn today_midnight() -> String {
    format!("{}T00:00:00+00:00", Utc::now().format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_count_sessions() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.record_focus_session("user-1", 25, now, now).unwrap();
        db.record_focus_session("user-1", 25, now, now).unwrap();
        db.record_focus_session("user-2", 25, now, now).unwrap();
        assert_eq!(db.count_focus_sessions("user-1").unwrap(), 2);
        assert_eq!(db.count_focus_sessions("user-2").unwrap(), 1);
    }

    #[test]
    fn stats_cover_today_and_all_time() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.record_focus_session("user-1", 25, now, now).unwrap();
        db.record_focus_session("user-1", 15, now, now).unwrap();
        let stats = db.stats_all("user-1").unwrap();
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.total_focus_min, 40);
        assert_eq!(stats.today_sessions, 2);
        assert_eq!(stats.today_focus_min, 40);

        let today = db.stats_today("user-1").unwrap();
        assert_eq!(today.sessions, 2);
        assert_eq!(today.focus_min, 40);
    }

    #[test]
    fn active_milestones_sorted_by_threshold() {
        let db = Database::open_memory().unwrap();
        db.insert_milestone("Ten", None, 10, None, None, true)
            .unwrap();
        db.insert_milestone("Five", None, 5, None, None, true)
            .unwrap();
        db.insert_milestone("Hidden", None, 1, None, None, false)
            .unwrap();
        let active = db.list_active_milestones().unwrap();
        let thresholds: Vec<u64> = active.iter().map(|m| m.session_threshold).collect();
        assert_eq!(thresholds, vec![5, 10]);
        assert_eq!(db.list_milestones().unwrap().len(), 3);
    }

    #[test]
    fn milestone_update_and_delete() {
        let db = Database::open_memory().unwrap();
        let id = db
            .insert_milestone("First", Some("desc"), 5, Some("star"), None, true)
            .unwrap();
        let mut milestone = db.get_milestone(id).unwrap().unwrap();
        milestone.session_threshold = 7;
        milestone.is_active = false;
        assert!(db.update_milestone(&milestone).unwrap());
        let reloaded = db.get_milestone(id).unwrap().unwrap();
        assert_eq!(reloaded.session_threshold, 7);
        assert!(!reloaded.is_active);

        assert!(db.delete_milestone(id).unwrap());
        assert!(db.get_milestone(id).unwrap().is_none());
    }

    #[test]
    fn duplicate_achievement_is_absorbed() {
        let db = Database::open_memory().unwrap();
        let id = db
            .insert_milestone("First", None, 5, None, None, true)
            .unwrap();
        assert!(db.insert_user_achievement("user-1", id).unwrap());
        // Second attempt: no error, no new row.
        assert!(!db.insert_user_achievement("user-1", id).unwrap());
        assert_eq!(db.list_achievements("user-1").unwrap().len(), 1);
        assert_eq!(
            db.list_unlocked_milestone_ids("user-1").unwrap(),
            HashSet::from([id])
        );
    }

    #[test]
    fn deleting_a_milestone_cascades_achievements() {
        let db = Database::open_memory().unwrap();
        let id = db
            .insert_milestone("First", None, 5, None, None, true)
            .unwrap();
        db.insert_user_achievement("user-1", id).unwrap();
        db.delete_milestone(id).unwrap();
        assert!(db.list_achievements("user-1").unwrap().is_empty());
    }

    #[test]
    fn settings_roundtrip() {
        let db = Database::open_memory().unwrap();
        assert!(db.get_settings("user-1").unwrap().is_none());
        let settings = UserSettings {
            focus_minutes: 50,
            break_minutes: 10,
            daily_goal: 4,
        };
        db.set_settings("user-1", &settings).unwrap();
        assert_eq!(db.get_settings("user-1").unwrap().unwrap(), settings);

        // Upsert overwrites.
        let updated = UserSettings {
            focus_minutes: 30,
            ..settings
        };
        db.set_settings("user-1", &updated).unwrap();
        assert_eq!(db.get_settings("user-1").unwrap().unwrap(), updated);
    }

    #[test]
    fn settings_validation_ranges() {
        let ok = UserSettings::default();
        assert!(ok.validate().is_ok());
        let bad = UserSettings {
            focus_minutes: 61,
            ..ok
        };
        assert!(bad.validate().is_err());
        let bad = UserSettings {
            break_minutes: 0,
            ..ok
        };
        assert!(bad.validate().is_err());
        let bad = UserSettings {
            daily_goal: 21,
            ..ok
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn recent_sessions_newest_first() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        let earlier = now - chrono::Duration::hours(2);
        db.record_focus_session("user-1", 25, earlier, earlier)
            .unwrap();
        db.record_focus_session("user-1", 15, now, now).unwrap();
        let recent = db.list_recent_sessions("user-1", 10).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].duration_min, 15);
        assert_eq!(recent[1].duration_min, 25);
    }

    #[test]
    fn reminders_roundtrip_soonest_first() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.insert_reminder("user-1", "Stretch", None, now + chrono::Duration::hours(2))
            .unwrap();
        let id = db
            .insert_reminder(
                "user-1",
                "Drink water",
                Some("a full glass"),
                now + chrono::Duration::hours(1),
            )
            .unwrap();
        db.insert_reminder("user-2", "Other user", None, now).unwrap();

        let reminders = db.list_reminders("user-1").unwrap();
        assert_eq!(reminders.len(), 2);
        assert_eq!(reminders[0].title, "Drink water");
        assert_eq!(reminders[0].message.as_deref(), Some("a full glass"));
        assert_eq!(reminders[1].title, "Stretch");

        assert!(db.delete_reminder(id).unwrap());
        assert!(!db.delete_reminder(id).unwrap());
        assert_eq!(db.list_reminders("user-1").unwrap().len(), 1);
    }

    #[test]
    fn due_reminders_cover_the_last_day_only() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.insert_reminder("user-1", "Just due", None, now - chrono::Duration::minutes(5))
            .unwrap();
        db.insert_reminder(
            "user-1",
            "Yesterday",
            None,
            now - chrono::Duration::hours(23),
        )
        .unwrap();
        db.insert_reminder("user-1", "Stale", None, now - chrono::Duration::hours(25))
            .unwrap();
        db.insert_reminder("user-1", "Upcoming", None, now + chrono::Duration::hours(1))
            .unwrap();

        let due = db.list_due_reminders("user-1", now).unwrap();
        let titles: Vec<&str> = due.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Just due", "Yesterday"]);
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
    }
}
