use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{
    ConfigCommand, DataCommand, MovementCommand, RequestCommand, UserCommand, VehicleCommand,
};
use opsdriver::config::Config;
use opsdriver::OpsApi;

#[derive(Parser)]
#[command(name = "opsdriver")]
#[command(version)]
#[command(about = "Fleet users, vehicles, requests and movements", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User(UserCommand),

    /// Manage vehicles
    Vehicle(VehicleCommand),

    /// Manage vehicle requests
    Request(RequestCommand),

    /// Manage vehicle movements
    Movement(MovementCommand),

    /// Export, import and push data
    Data(DataCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("opsdriver=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;
    let api = OpsApi::from_config(&config);

    match cli.command {
        Some(Commands::User(cmd)) => cmd.run(&api).await?,
        Some(Commands::Vehicle(cmd)) => cmd.run(&api).await?,
        Some(Commands::Request(cmd)) => cmd.run(&api).await?,
        Some(Commands::Movement(cmd)) => cmd.run(&api).await?,
        Some(Commands::Data(cmd)) => cmd.run(&api).await?,
        Some(Commands::Config(cmd)) => cmd.run(&config, cli.config.as_deref())?,
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
