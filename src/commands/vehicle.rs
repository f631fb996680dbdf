use clap::{Args, Subcommand};
use serde_json::Value;

use super::{confirm, parse_field, print_added, print_records, record_from_fields, OutputFormat};
use opsdriver::OpsApi;

#[derive(Args)]
pub struct VehicleCommand {
    #[command(subcommand)]
    pub command: VehicleSubcommand,
}

#[derive(Subcommand)]
pub enum VehicleSubcommand {
    /// List vehicles
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a vehicle
    Add {
        /// Field as key=value (can be repeated)
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field, required = true)]
        fields: Vec<(String, Value)>,
    },

    /// Update fields on a vehicle
    Update {
        id: i64,

        /// Field as key=value (can be repeated)
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field, required = true)]
        fields: Vec<(String, Value)>,
    },

    /// Delete a vehicle
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl VehicleCommand {
    pub async fn run(&self, api: &OpsApi) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            VehicleSubcommand::List { format } => {
                let vehicles = api.list_vehicles().await?;
                print_records(&vehicles, format, "vehicle")
            }
            VehicleSubcommand::Add { fields } => {
                let outcome = api.add_vehicle(record_from_fields(fields)).await?;
                print_added(outcome, "vehicle");
                Ok(())
            }
            VehicleSubcommand::Update { id, fields } => {
                if !api.update_vehicle(*id, &record_from_fields(fields)).await? {
                    return Err(format!("Vehicle not found: {}", id).into());
                }
                println!("Updated vehicle #{}", id);
                Ok(())
            }
            VehicleSubcommand::Delete { id, force } => {
                if !force && !confirm(&format!("Delete vehicle #{}?", id))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }
                if !api.delete_vehicle(*id).await? {
                    return Err(format!("Vehicle not found: {}", id).into());
                }
                println!("Deleted vehicle #{}", id);
                Ok(())
            }
        }
    }
}
