//! TOML-based application configuration.
//!
//! Stores the local identity and timer behavior of this installation:
//! - `current_user`: the user id sessions and achievements are recorded
//!   under, generated on first run
//! - fallback interval durations used before per-user settings exist
//! - whether a completed focus interval flows straight into a break
//!
//! Configuration is stored at `~/.config/calmfocus/config.toml`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::data_dir;
use crate::error::ConfigError;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/calmfocus/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Local user identity. `None` until the first `ensure_user` call.
    #[serde(default)]
    pub current_user: Option<Uuid>,
    #[serde(default = "default_focus_minutes")]
    pub fallback_focus_minutes: u64,
    #[serde(default = "default_break_minutes")]
    pub fallback_break_minutes: u64,
    /// Switch to Break and start it when a focus interval completes.
    #[serde(default = "default_true")]
    pub auto_start_break: bool,
}

fn default_focus_minutes() -> u64 {
    25
}
fn default_break_minutes() -> u64 {
    5
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            current_user: None,
            fallback_focus_minutes: default_focus_minutes(),
            fallback_break_minutes: default_break_minutes(),
            auto_start_break: default_true(),
        }
    }
}

impl Config {
    /// Load the configuration, falling back to defaults when the file
    /// does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Write the configuration back to disk.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })
    }

    /// Return the current user id, generating and persisting one on
    /// first use.
    ///
    /// # Errors
    /// Returns an error if the generated identity cannot be saved.
    pub fn ensure_user(&mut self) -> Result<Uuid, ConfigError> {
        if let Some(user) = self.current_user {
            return Ok(user);
        }
        let user = Uuid::new_v4();
        self.current_user = Some(user);
        self.save()?;
        Ok(user)
    }

    fn path() -> Result<std::path::PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: std::path::PathBuf::from("~/.config/calmfocus"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.current_user.is_none());
        assert_eq!(config.fallback_focus_minutes, 25);
        assert_eq!(config.fallback_break_minutes, 5);
        assert!(config.auto_start_break);
    }

    #[test]
    fn roundtrips_through_toml() {
        let mut config = Config::default();
        config.current_user = Some(Uuid::new_v4());
        config.auto_start_break = false;
        let raw = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&raw).unwrap();
        assert_eq!(back.current_user, config.current_user);
        assert!(!back.auto_start_break);
    }
}
