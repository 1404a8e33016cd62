//! Dependency injection container for the xo-break application.
//!
//! The container owns infrastructure dependencies (the points ledger) and
//! builds match engines wired to them.

use std::{path::PathBuf, sync::Arc};

use super::config::Settings;
use crate::{
    Result,
    adapters::{JsonFileLedger, LedgerObserver},
    engine::{EngineConfig, MatchEngine},
    ports::PointsLedger,
    types::UserId,
};

/// Ledger file used when no other path is given
pub const DEFAULT_LEDGER_PATH: &str = "xo-break-points.json";

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```no_run
/// use xo_break::app::{App, Settings};
///
/// let app = App::new();
/// let settings = Settings::default();
/// let engine = app.create_engine(settings.engine_config(), &settings.user_id())?;
/// # Ok::<(), xo_break::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use xo_break::app::App;
/// use xo_break::adapters::InMemoryLedger;
///
/// let app = App::for_testing()
///     .with_ledger(InMemoryLedger::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Durable store for cumulative points
    ledger: Arc<dyn PointsLedger + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses a [`JsonFileLedger`] at [`DEFAULT_LEDGER_PATH`] and no default seed.
    pub fn new() -> Self {
        Self::with_ledger_path(DEFAULT_LEDGER_PATH)
    }

    /// Create an app whose ledger lives at `path`.
    pub fn with_ledger_path(path: impl Into<PathBuf>) -> Self {
        Self {
            ledger: Arc::new(JsonFileLedger::new(path)),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    ///
    /// Primarily used for testing with in-memory dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Get the points ledger.
    pub fn ledger(&self) -> Arc<dyn PointsLedger + Send + Sync> {
        Arc::clone(&self.ledger)
    }

    /// Create an engine with a random opponent whose cumulative awards are
    /// credited to `user`.
    ///
    /// A seed in `config` wins over the app's default seed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if the configuration is
    /// invalid.
    pub fn create_engine(&self, config: EngineConfig, user: &UserId) -> Result<MatchEngine> {
        let config = match (config.seed, self.default_seed) {
            (None, Some(seed)) => config.with_seed(seed),
            _ => config,
        };

        let observer = LedgerObserver::new(self.ledger(), user.clone());
        Ok(MatchEngine::with_random_opponent(config)?.with_observer(Box::new(observer)))
    }

    /// Create an engine from stored settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid.
    pub fn create_engine_from_settings(&self, settings: &Settings) -> Result<MatchEngine> {
        settings.validate()?;
        self.create_engine(settings.engine_config(), &settings.user_id())
    }

    /// Cumulative points stored for `user`.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    pub fn balance(&self, user: &UserId) -> Result<u64> {
        self.ledger.balance(user)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
pub struct AppBuilder {
    ledger: Option<Arc<dyn PointsLedger + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self {
            ledger: None,
            default_seed: None,
        }
    }

    /// Set a custom points ledger.
    pub fn with_ledger<L: PointsLedger + Send + Sync + 'static>(mut self, ledger: L) -> Self {
        self.ledger = Some(Arc::new(ledger));
        self
    }

    /// Set a default random seed for every engine created by this container.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no ledger was specified, uses a [`JsonFileLedger`] at
    /// [`DEFAULT_LEDGER_PATH`].
    pub fn build(self) -> App {
        App {
            ledger: self
                .ledger
                .unwrap_or_else(|| Arc::new(JsonFileLedger::new(DEFAULT_LEDGER_PATH))),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
