//! Timing configuration for the match engine.

use std::time::Duration;

use crate::{Error, Result};

/// Default countdown length for a match, in seconds
pub const DEFAULT_MATCH_SECONDS: u32 = 30;
/// Default pop-up period, in minutes
pub const DEFAULT_INTERVAL_MINUTES: f64 = 2.0;
/// Visible pause before the opponent answers a player move
pub const DEFAULT_OPPONENT_DELAY: Duration = Duration::from_millis(500);
/// Pause between a finished board and the automatic restart
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(1500);
/// Pause between a timeout and the match closing
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(2000);
/// Countdown resolution
pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// Configuration for creating a [`MatchEngine`](super::MatchEngine).
///
/// Builder-style; values are checked by [`EngineConfig::validate`] when the
/// engine is created.
///
/// # Examples
///
/// ```
/// use xo_break::engine::EngineConfig;
///
/// let config = EngineConfig::new()
///     .with_match_duration(45)
///     .with_interval_minutes(5.0)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Countdown length of every match, in seconds
    pub match_duration: u32,
    /// Minutes between pop-up ticks
    pub interval_minutes: f64,
    /// Delay before the opponent replies
    pub opponent_delay: Duration,
    /// Delay before a finished board restarts
    pub reset_delay: Duration,
    /// Delay before a timed-out match closes
    pub close_delay: Duration,
    /// Whether the pop-up scheduler is armed when the engine starts
    pub scheduler_enabled: bool,
    /// Random seed for the default opponent
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// Create a configuration with the default timings:
    /// 30 s matches, a pop-up every 2 minutes, 500 ms opponent delay,
    /// 1.5 s restart delay and 2 s close delay.
    pub fn new() -> Self {
        Self {
            match_duration: DEFAULT_MATCH_SECONDS,
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            opponent_delay: DEFAULT_OPPONENT_DELAY,
            reset_delay: DEFAULT_RESET_DELAY,
            close_delay: DEFAULT_CLOSE_DELAY,
            scheduler_enabled: true,
            seed: None,
        }
    }

    /// Set the countdown length in seconds.
    pub fn with_match_duration(mut self, seconds: u32) -> Self {
        self.match_duration = seconds;
        self
    }

    /// Set the pop-up period in minutes.
    pub fn with_interval_minutes(mut self, minutes: f64) -> Self {
        self.interval_minutes = minutes;
        self
    }

    /// Set the opponent reply delay.
    pub fn with_opponent_delay(mut self, delay: Duration) -> Self {
        self.opponent_delay = delay;
        self
    }

    /// Set the delay before a finished board restarts.
    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    /// Set the delay before a timed-out match closes.
    pub fn with_close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = delay;
        self
    }

    /// Arm or disarm the pop-up scheduler at start.
    pub fn with_scheduler(mut self, enabled: bool) -> Self {
        self.scheduler_enabled = enabled;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a zero match duration or a
    /// pop-up interval that is not a positive, finite number of minutes.
    pub fn validate(&self) -> Result<()> {
        validate_match_duration(self.match_duration)?;
        interval_from_minutes(self.interval_minutes)?;
        Ok(())
    }

    /// The pop-up period as a duration
    ///
    /// # Errors
    ///
    /// Same conditions as [`EngineConfig::validate`] for the interval.
    pub fn interval(&self) -> Result<Duration> {
        interval_from_minutes(self.interval_minutes)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn validate_match_duration(seconds: u32) -> Result<()> {
    if seconds == 0 {
        return Err(Error::InvalidConfiguration {
            message: "match duration must be at least one second".to_string(),
        });
    }
    Ok(())
}

/// Convert a pop-up period in minutes to a non-zero duration.
pub(crate) fn interval_from_minutes(minutes: f64) -> Result<Duration> {
    let invalid = || Error::InvalidConfiguration {
        message: format!("pop-up interval must be a positive number of minutes, got {minutes}"),
    };

    if !minutes.is_finite() || minutes <= 0.0 {
        return Err(invalid());
    }
    let interval = Duration::try_from_secs_f64(minutes * 60.0).map_err(|_| invalid())?;
    if interval.is_zero() {
        return Err(invalid());
    }
    Ok(interval)
}
