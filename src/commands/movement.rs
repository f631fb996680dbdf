use clap::{Args, Subcommand};
use serde_json::Value;

use super::{parse_field, print_added, print_records, record_from_fields, OutputFormat};
use opsdriver::OpsApi;

#[derive(Args)]
pub struct MovementCommand {
    #[command(subcommand)]
    pub command: MovementSubcommand,
}

#[derive(Subcommand)]
pub enum MovementSubcommand {
    /// List movements
    List {
        /// Only movements of this kind
        #[arg(long)]
        kind: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Record a movement
    Add {
        /// Field as key=value (can be repeated)
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field, required = true)]
        fields: Vec<(String, Value)>,
    },

    /// Delete a movement
    Delete { id: i64 },
}

impl MovementCommand {
    pub async fn run(&self, api: &OpsApi) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            MovementSubcommand::List { kind, format } => {
                let movements = api.list_movements(kind.as_deref()).await?;
                print_records(&movements, format, "movement")
            }
            MovementSubcommand::Add { fields } => {
                let outcome = api.add_movement(record_from_fields(fields)).await?;
                print_added(outcome, "movement");
                Ok(())
            }
            MovementSubcommand::Delete { id } => {
                if !api.delete_movement(*id).await? {
                    return Err(format!("Movement not found: {}", id).into());
                }
                println!("Deleted movement #{}", id);
                Ok(())
            }
        }
    }
}
