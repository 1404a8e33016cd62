//! Shared configuration for CLI commands

use std::path::PathBuf;

use clap::Args;

use crate::{
    Result,
    app::{App, DEFAULT_LEDGER_PATH, Settings},
};

/// Settings file used when no other path is given
pub const DEFAULT_SETTINGS_PATH: &str = "xo-break-settings.json";

/// Options every command accepts
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Settings file (JSON)
    #[arg(long, default_value = DEFAULT_SETTINGS_PATH)]
    pub settings: PathBuf,

    /// Points ledger file (JSON)
    #[arg(long, default_value = DEFAULT_LEDGER_PATH)]
    pub ledger: PathBuf,

    /// User the points are stored under (overrides the settings file)
    #[arg(long)]
    pub user: Option<String>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

impl CommonArgs {
    /// Stored settings with the command-line user override applied
    pub fn load_settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(&self.settings)?;
        if let Some(user) = &self.user {
            settings.user_name = user.clone();
        }
        settings.validate()?;
        Ok(settings)
    }

    /// App backed by the configured ledger file
    pub fn app(&self) -> App {
        App::with_ledger_path(self.ledger.clone())
    }
}
