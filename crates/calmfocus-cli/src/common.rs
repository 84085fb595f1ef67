//! Shared setup for CLI commands.

use calmfocus_core::{Config, Database, SessionService, TimerPreferences};

pub struct AppContext {
    pub db: Database,
    pub config: Config,
    pub user_id: String,
}

/// Open the database and configuration, creating a local user identity
/// on first run.
pub fn load() -> Result<AppContext, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut config = Config::load()?;
    let user_id = config.ensure_user()?.to_string();
    Ok(AppContext {
        db,
        config,
        user_id,
    })
}

impl AppContext {
    pub fn service(&self) -> SessionService<'_> {
        SessionService::new(&self.db, Some(self.user_id.clone()))
    }

    /// The user's stored preferences, or the config fallbacks before any
    /// settings row exists.
    pub fn timer_preferences(&self) -> Result<TimerPreferences, Box<dyn std::error::Error>> {
        match self.db.get_settings(&self.user_id)? {
            Some(settings) => Ok(settings.timer_preferences()),
            None => Ok(TimerPreferences {
                focus_minutes: self.config.fallback_focus_minutes,
                break_minutes: self.config.fallback_break_minutes,
            }),
        }
    }
}
