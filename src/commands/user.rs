use clap::{Args, Subcommand};
use serde_json::Value;

use super::{confirm, parse_field, print_added, print_records, record_from_fields, OutputFormat};
use opsdriver::OpsApi;

#[derive(Args)]
pub struct UserCommand {
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Subcommand)]
pub enum UserSubcommand {
    /// List users
    List {
        /// Only users with this role
        #[arg(long)]
        role: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a user
    Add {
        /// Field as key=value (can be repeated)
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field, required = true)]
        fields: Vec<(String, Value)>,
    },

    /// Update fields on a user
    Update {
        id: i64,

        /// Field as key=value (can be repeated)
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field, required = true)]
        fields: Vec<(String, Value)>,
    },

    /// Delete a user
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl UserCommand {
    pub async fn run(&self, api: &OpsApi) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            UserSubcommand::List { role, format } => {
                let users = api.list_users(role.as_deref()).await?;
                print_records(&users, format, "user")
            }
            UserSubcommand::Add { fields } => {
                let outcome = api.add_user(record_from_fields(fields)).await?;
                print_added(outcome, "user");
                Ok(())
            }
            UserSubcommand::Update { id, fields } => {
                if !api.update_user(*id, &record_from_fields(fields)).await? {
                    return Err(format!("User not found: {}", id).into());
                }
                println!("Updated user #{}", id);
                Ok(())
            }
            UserSubcommand::Delete { id, force } => {
                if !force && !confirm(&format!("Delete user #{}?", id))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }
                if !api.delete_user(*id).await? {
                    return Err(format!("User not found: {}", id).into());
                }
                println!("Deleted user #{}", id);
                Ok(())
            }
        }
    }
}
