//! Config command implementation.

use anyhow::{Context, Result};

use connhub_core::config::Config;

use super::{ConfigAction, ConfigArgs};

/// Run the config command.
pub fn run(args: ConfigArgs) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!();
            println!("ConnHub Configuration");
            println!("{}", "-".repeat(50));
            println!();
            print!("{}", config.to_toml()?);
            println!();
        }

        ConfigAction::Path => {
            let path = Config::config_path();
            println!("{}", path.display());
        }

        ConfigAction::Reset => {
            Config::default()
                .save()
                .context("Failed to write default configuration")?;
            println!("Configuration reset to defaults.");
        }
    }

    Ok(())
}
