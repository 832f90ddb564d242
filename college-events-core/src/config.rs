//! Configuration for the event store.

use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_RECOMMEND_LIMIT, DEFAULT_UPCOMING_DAYS};
use crate::error::{EventsError, EventsResult};

static DEFAULT_EVENT_FILE: &str = "~/college-events/events_college.json";

fn default_event_file() -> PathBuf {
    PathBuf::from(DEFAULT_EVENT_FILE)
}

fn default_upcoming_days() -> u32 {
    DEFAULT_UPCOMING_DAYS
}

fn default_recommend_limit() -> usize {
    DEFAULT_RECOMMEND_LIMIT
}

/// Configuration at ~/.config/college-events/config.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsConfig {
    /// JSON file holding all events. `~` is expanded.
    #[serde(default = "default_event_file")]
    pub event_file: PathBuf,

    /// Length of the upcoming-events window in days.
    #[serde(default = "default_upcoming_days")]
    pub upcoming_days: u32,

    /// How many recommendations to return by default.
    #[serde(default = "default_recommend_limit")]
    pub recommend_limit: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        EventsConfig {
            event_file: default_event_file(),
            upcoming_days: default_upcoming_days(),
            recommend_limit: default_recommend_limit(),
        }
    }
}

impl EventsConfig {
    pub fn config_path() -> EventsResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| EventsError::Config("Could not determine config directory".into()))?
            .join("college-events");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user config, writing a commented default first if none exists.
    pub fn load() -> EventsResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> EventsResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| EventsError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| EventsError::Config(e.to_string()))
    }

    pub fn save_to(&self, path: &Path) -> EventsResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| EventsError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| EventsError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Store location with `~` expanded.
    pub fn event_file_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.event_file.to_string_lossy()).into_owned())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> EventsResult<()> {
        let contents = format!(
            "\
# college-events configuration

# Where events are stored:
# event_file = \"{}\"

# How many days ahead count as upcoming:
# upcoming_days = {}

# How many recommendations to show:
# recommend_limit = {}
",
            DEFAULT_EVENT_FILE, DEFAULT_UPCOMING_DAYS, DEFAULT_RECOMMEND_LIMIT
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EventsError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| EventsError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = EventsConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, EventsConfig::default());
    }

    #[test]
    fn test_commented_default_parses_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cfg/config.toml");
        EventsConfig::create_default_config(&path).unwrap();

        assert_eq!(EventsConfig::load_from(&path).unwrap(), EventsConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let config = EventsConfig {
            event_file: dir.path().join("events.json"),
            upcoming_days: 14,
            recommend_limit: 3,
        };
        config.save_to(&path).unwrap();

        let loaded = EventsConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.recommend_limit, 3);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "recommend_limit = 2\n").unwrap();

        let config = EventsConfig::load_from(&path).unwrap();
        assert_eq!(config.recommend_limit, 2);
        assert_eq!(config.upcoming_days, DEFAULT_UPCOMING_DAYS);
    }

    #[test]
    fn test_invalid_value_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "upcoming_days = \"soon\"\n").unwrap();

        let err = EventsConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, EventsError::Config(_)));
    }

    #[test]
    fn test_absolute_event_file_unchanged() {
        let config = EventsConfig {
            event_file: PathBuf::from("/srv/events/events.json"),
            ..Default::default()
        };
        assert_eq!(config.event_file_path(), PathBuf::from("/srv/events/events.json"));
    }
}
