pub mod config;
pub mod database;

pub use config::Config;
pub use database::{Database, DayStats, Reminder, SessionRecord, Stats, UserSettings};

use std::path::PathBuf;

/// Returns `~/.config/calmfocus[-dev]/` based on CALMFOCUS_ENV.
///
/// Set CALMFOCUS_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CALMFOCUS_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("calmfocus-dev")
    } else {
        base_dir.join("calmfocus")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
