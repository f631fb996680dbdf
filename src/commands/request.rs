use clap::{Args, Subcommand};
use serde_json::Value;

use super::{confirm, parse_field, print_records, record_from_fields, OutputFormat};
use opsdriver::{OpsApi, RequestState};

#[derive(Args)]
pub struct RequestCommand {
    #[command(subcommand)]
    pub command: RequestSubcommand,
}

#[derive(Subcommand)]
pub enum RequestSubcommand {
    /// List vehicle requests
    List {
        /// Only requests in this state (pending, approved, rejected)
        #[arg(long)]
        state: Option<RequestState>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show one request
    Show {
        id: i64,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Create a pending request with a new ticket number
    Create {
        /// Field as key=value (can be repeated)
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },

    /// Approve a request
    Approve { id: i64 },

    /// Reject a request
    Reject {
        id: i64,

        /// Reason recorded as the request's observation
        #[arg(long)]
        reason: String,
    },

    /// Delete a request
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl RequestCommand {
    pub async fn run(&self, api: &OpsApi) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            RequestSubcommand::List { state, format } => {
                let requests = api.list_requests(*state).await?;
                print_records(&requests, format, "request")
            }
            RequestSubcommand::Show { id, format } => match api.get_request(*id).await? {
                Some(request) => {
                    match format {
                        OutputFormat::Json => {
                            println!("{}", serde_json::to_string_pretty(&request)?);
                        }
                        OutputFormat::Text => {
                            println!("{}", request);
                        }
                    }
                    Ok(())
                }
                None => Err(format!("Request not found: {}", id).into()),
            },
            RequestSubcommand::Create { fields } => {
                let request = api.create_request(record_from_fields(fields)).await?;
                println!("Created request:");
                println!("{}", request);
                Ok(())
            }
            RequestSubcommand::Approve { id } => {
                if !api.approve_request(*id).await? {
                    return Err(format!("Request not found: {}", id).into());
                }
                println!("Approved request #{}", id);
                Ok(())
            }
            RequestSubcommand::Reject { id, reason } => {
                if reason.trim().is_empty() {
                    return Err("Rejection reason cannot be empty".into());
                }
                if !api.reject_request(*id, reason.trim()).await? {
                    return Err(format!("Request not found: {}", id).into());
                }
                println!("Rejected request #{}", id);
                Ok(())
            }
            RequestSubcommand::Delete { id, force } => {
                if !force && !confirm(&format!("Delete request #{}?", id))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }
                if !api.delete_request(*id).await? {
                    return Err(format!("Request not found: {}", id).into());
                }
                println!("Deleted request #{}", id);
                Ok(())
            }
        }
    }
}
