//! Points command - show a user's stored balance

use anyhow::Result;
use clap::Parser;

use crate::cli::{
    config::CommonArgs,
    output::{format_number, print_kv},
};

#[derive(Parser, Debug)]
#[command(about = "Show stored reward points")]
pub struct PointsArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

pub fn execute(args: PointsArgs) -> Result<()> {
    let settings = args.common.load_settings()?;
    let user = settings.user_id();
    let balance = args.common.app().balance(&user)?;

    print_kv("User", user.as_str());
    print_kv("Points", &format_number(balance));
    Ok(())
}
