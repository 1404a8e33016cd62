//! Settings command - show or change stored settings

use anyhow::Result;
use clap::Parser;

use crate::cli::{
    config::CommonArgs,
    output::{print_kv, print_section},
};

#[derive(Parser, Debug)]
#[command(about = "Show or change match duration, pop-up interval and user name")]
pub struct SettingsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Match countdown in seconds
    #[arg(long)]
    pub duration: Option<u32>,

    /// Minutes between pop-ups
    #[arg(long)]
    pub interval: Option<f64>,
}

pub fn execute(args: SettingsArgs) -> Result<()> {
    let mut settings = args.common.load_settings()?;
    let changed = args.duration.is_some() || args.interval.is_some() || args.common.user.is_some();

    if let Some(duration) = args.duration {
        settings.game_duration = duration;
    }
    if let Some(interval) = args.interval {
        settings.game_interval = interval;
    }

    if changed {
        settings.save(&args.common.settings)?;
        print_section("Settings saved");
    } else {
        print_section("Settings");
    }
    print_kv("Game duration", &format!("{}s", settings.game_duration));
    print_kv("Pop-up interval", &format!("{} min", settings.game_interval));
    print_kv("User name", &settings.user_name);
    Ok(())
}
