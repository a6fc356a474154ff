//! Global event tracker configuration.

use std::path::{Path, PathBuf};

use chrono::{Duration, Weekday};
use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};
use crate::filter::FilterMode;

const DEFAULT_EVENT_MINUTES: i64 = 60;

/// First column of the month grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn weekday(&self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }
}

/// Configuration at ~/.config/event-tracker/config.toml
///
/// Every field is optional; missing ones fall back to their defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Filter active when a session starts
    pub default_filter: FilterMode,

    pub week_start: WeekStart,

    /// Length of a new timed event when only its start is given
    pub default_event_minutes: i64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            default_filter: FilterMode::default(),
            week_start: WeekStart::default(),
            default_event_minutes: DEFAULT_EVENT_MINUTES,
        }
    }
}

impl TrackerConfig {
    pub fn config_path() -> TrackerResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TrackerError::Config("Could not determine config directory".into()))?
            .join("event-tracker");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented default file
    /// there first if none exists.
    pub fn load() -> TrackerResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit path. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> TrackerResult<Self> {
        let config: TrackerConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| TrackerError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| TrackerError::Config(e.to_string()))?;

        if config.default_event_minutes <= 0 {
            return Err(TrackerError::Config(format!(
                "default_event_minutes must be positive, got {}",
                config.default_event_minutes
            )));
        }
        if Duration::try_minutes(config.default_event_minutes).is_none() {
            return Err(TrackerError::Config(format!(
                "default_event_minutes is too large, got {}",
                config.default_event_minutes
            )));
        }

        Ok(config)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> TrackerResult<()> {
        let contents = format!(
            "\
# event tracker configuration

# Filter shown when a session starts (all, past, upcoming):
# default_filter = \"all\"

# First day of the week in the month grid (monday, sunday):
# week_start = \"monday\"

# Length in minutes of a new event when only a start time is given:
# default_event_minutes = {}
",
            DEFAULT_EVENT_MINUTES
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Falls back to the built-in length if the field was set out of range
    /// without going through `load_from`.
    pub fn default_event_duration(&self) -> Duration {
        Duration::try_minutes(self.default_event_minutes)
            .filter(|d| *d > Duration::zero())
            .unwrap_or_else(|| Duration::minutes(DEFAULT_EVENT_MINUTES))
    }
}
