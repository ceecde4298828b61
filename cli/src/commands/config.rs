//! Config commands

use std::path::Path;

use crate::config::{Config, KEYS};
use crate::output;
use crate::ConfigCommands;

pub async fn handle(action: ConfigCommands, path: &Path) -> anyhow::Result<()> {
    match action {
        ConfigCommands::Init => {
            Config::default().save_to(path)?;
            output::success(&format!("Configuration initialized at {}", path.display()));
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load_from(path)?;
            config.set(&key, value)?;
            config.save_to(path)?;
            output::success(&format!("Set {}", key));
        }
        ConfigCommands::Get { key } => {
            let config = Config::load_from(path)?;
            let value = config.display_value(&key)?;
            println!("{}: {}", key, value.unwrap_or_else(|| "(not set)".into()));
        }
        ConfigCommands::List => {
            let config = Config::load_from(path)?;
            for key in KEYS {
                let value = config.display_value(key)?;
                println!("{}: {}", key, value.unwrap_or_else(|| "(not set)".into()));
            }
        }
    }
    Ok(())
}
