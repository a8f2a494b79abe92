//! `familygraph config`: inspect and edit the TOML config file

use clap::{Args, Subcommand};

use crate::config::{config_file_path, Config};
use crate::output::table;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print one value
    Get { key: String },
    /// Change one value; the value is validated before saving
    Set { key: String, value: String },
    /// Reset one value to its default
    Unset { key: String },
    /// Print every key with its current value
    List,
    /// Print the config file location
    Path,
    /// Write a config file with default values
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: &ConfigArgs) -> anyhow::Result<()> {
    let path = config_file_path();

    match &args.command {
        ConfigCommands::Get { key } => {
            if !Config::keys().contains(&key.as_str()) {
                anyhow::bail!(
                    "Unknown config key: {}. Available keys: {}",
                    key,
                    Config::keys().join(", ")
                );
            }
            let value = Config::load()?.get(key);
            println!("{}", value.as_deref().unwrap_or("(not set)"));
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }
        ConfigCommands::Unset { key } => {
            let mut config = Config::load()?;
            config.unset(key)?;
            config.save()?;
            println!("Reset {}", key);
        }
        ConfigCommands::List => {
            let config = Config::load()?;
            let rows: Vec<Vec<String>> = Config::keys()
                .iter()
                .map(|key| {
                    vec![
                        key.to_string(),
                        config.get(key).unwrap_or_else(|| "(not set)".to_string()),
                    ]
                })
                .collect();
            println!("# {}", path.display());
            println!("{}", table(&["KEY", "VALUE"], &rows));
        }
        ConfigCommands::Path => println!("{}", path.display()),
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Config::default().save()?;
            println!("Wrote default config to {}", path.display());
        }
    }

    Ok(())
}
