use clap::{Args, Subcommand};
use std::path::Path;

use super::OutputFormat;
use opsdriver::config::Config;

const CONFIG_TEMPLATE: &str = "\
# Ops Driver configuration
#
# Relative paths are resolved against this file's directory.

# SQLite database for the structured store
# database_path: opsdriver.db

# Directory for the flat fallback store
# flat_store_dir: flat

# Set to false to use only the flat store
# structured_store: true

# Remote collection endpoint, e.g. https://ops.example.com/api
# Leave empty to work purely offline.
remote_base: \"\"
";

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Write a commented config file to the config path
    Init {
        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn run(
        &self,
        config: &Config,
        config_path: Option<&Path>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("database_path: {}", config.database_path.value.display());
                        println!("  source: {}", config.database_path.source);
                        println!();

                        println!("flat_store_dir: {}", config.flat_store_dir.value.display());
                        println!("  source: {}", config.flat_store_dir.source);
                        println!();

                        println!("structured_store: {}", config.structured_store.value);
                        println!("  source: {}", config.structured_store.source);
                        println!();

                        println!(
                            "remote_base: {}",
                            config.remote_base().unwrap_or("(disabled)")
                        );
                        println!("  source: {}", config.remote_base.source);
                    }
                }
                Ok(())
            }
            ConfigSubcommand::Init { force } => {
                let default_path = Config::default_config_path();
                let path = config_path.unwrap_or(&default_path);

                if path.exists() && !force {
                    return Err(format!(
                        "Config file already exists: {} (use --force to overwrite)",
                        path.display()
                    )
                    .into());
                }

                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, CONFIG_TEMPLATE)?;
                println!("Wrote {}", path.display());
                Ok(())
            }
        }
    }
}
