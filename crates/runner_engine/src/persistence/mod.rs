//! Per-user persisted state
//!
//! The best score is kept as a RON record and the volume sliders as TOML.
//! A missing file means "never saved" and a corrupt one is logged and
//! replaced by defaults; neither stops a session from starting.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};

/// Persistence errors
#[derive(thiserror::Error, Debug)]
pub enum PersistenceError {
    /// Underlying file could not be written or encoded
    #[error("Failed to write {path}: {source}")]
    Write {
        /// File that was being written
        path: PathBuf,
        /// Cause
        #[source]
        source: ConfigError,
    },
}

/// Stored best score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    /// Best combined score reached
    pub high_score: u32,
}

impl Config for HighScoreRecord {}

/// Stored volume sliders
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Music volume, 0 to 1
    pub bgm_volume: f32,
    /// Effects volume, 0 to 1
    pub sfx_volume: f32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            bgm_volume: 1.0,
            sfx_volume: 1.0,
        }
    }
}

impl Config for Preferences {}

fn load_or_fallback<T: Config>(path: &Path, what: &str) -> T {
    match T::load_or_default(path) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Ignoring unreadable {what} at {}: {e}", path.display());
            T::default()
        }
    }
}

fn write<T: Config>(value: &T, path: &Path) -> Result<(), PersistenceError> {
    value.save_to_file(path).map_err(|source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// File-backed best score
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    /// Store the record at `path` (extension `.ron`)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Best score on record, 0 when nothing usable is stored
    pub fn load(&self) -> u32 {
        load_or_fallback::<HighScoreRecord>(&self.path, "high score").high_score
    }

    /// Persist `score` if it beats the stored one; returns the best score afterwards
    pub fn submit(&self, score: u32) -> Result<u32, PersistenceError> {
        let best = self.load();
        if score <= best {
            return Ok(best);
        }
        log::info!("New high score {score} (was {best})");
        write(&HighScoreRecord { high_score: score }, &self.path)?;
        Ok(score)
    }
}

/// File-backed volume preferences
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    /// Store the preferences at `path` (extension `.toml`)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Stored preferences, defaults when nothing usable is stored
    pub fn load(&self) -> Preferences {
        load_or_fallback(&self.path, "preferences")
    }

    /// Overwrite the stored preferences
    pub fn save(&self, preferences: &Preferences) -> Result<(), PersistenceError> {
        write(preferences, &self.path)
    }
}
