pub mod achievements;
pub mod milestone;
pub mod prefs;
pub mod reminder;
pub mod stats;
pub mod timer;
