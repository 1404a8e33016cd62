//! User settings.

use std::{
    fs::{self, File},
    io::{BufReader, ErrorKind},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    engine::{
        DEFAULT_INTERVAL_MINUTES, DEFAULT_MATCH_SECONDS, EngineConfig,
        config::{interval_from_minutes, validate_match_duration},
    },
    types::UserId,
};

/// Display name used when none is configured
pub const DEFAULT_USER_NAME: &str = "You";

/// Stored user settings.
///
/// Missing keys fall back to their defaults, so a partial file is still valid.
///
/// # Examples
///
/// ```
/// use xo_break::app::Settings;
///
/// let settings: Settings = serde_json::from_str(r#"{ "game_interval": 5 }"#)?;
/// assert_eq!(settings.game_duration, 30);
/// assert_eq!(settings.game_interval, 5.0);
/// assert_eq!(settings.user_name, "You");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Countdown length of a match, in seconds
    pub game_duration: u32,
    /// Minutes between pop-ups
    pub game_interval: f64,
    /// Name the points are stored under
    pub user_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game_duration: DEFAULT_MATCH_SECONDS,
            game_interval: DEFAULT_INTERVAL_MINUTES,
            user_name: DEFAULT_USER_NAME.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or holds
    /// out-of-range values.
    pub fn load(path: &Path) -> Result<Self> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(Error::Io {
                    operation: format!("open settings {path:?}"),
                    source,
                });
            }
        };

        let settings: Self = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            Error::SerializationContext {
                operation: format!("parse settings {path:?}"),
                message: e.to_string(),
            }
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Write settings as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or the file cannot be
    /// written.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| Error::Io {
            operation: format!("write settings {path:?}"),
            source,
        })
    }

    /// Check every value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a zero duration, an interval
    /// that is not a positive finite number of minutes, or a blank user name.
    pub fn validate(&self) -> Result<()> {
        validate_match_duration(self.game_duration)?;
        interval_from_minutes(self.game_interval)?;
        if self.user_name.trim().is_empty() {
            return Err(Error::InvalidConfiguration {
                message: "user name must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn user_id(&self) -> UserId {
        UserId::new(self.user_name.trim())
    }

    /// Engine configuration carrying these timings
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new()
            .with_match_duration(self.game_duration)
            .with_interval_minutes(self.game_interval)
    }
}
