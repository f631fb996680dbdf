mod config_cmd;
mod data;
mod movement;
mod request;
mod user;
mod vehicle;

pub use config_cmd::ConfigCommand;
pub use data::DataCommand;
pub use movement::MovementCommand;
pub use request::RequestCommand;
pub use user::UserCommand;
pub use vehicle::VehicleCommand;

use clap::ValueEnum;
use opsdriver::{AddOutcome, Record};
use serde_json::Value;
use std::io::{self, Write};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Parses a `key=value` pair. The value is read as JSON when it parses,
/// otherwise it is kept as a plain string.
pub fn parse_field(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid field '{}'. Expected key=value", s))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Invalid field '{}'. Key cannot be empty", s));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

/// Builds a record from parsed `--field` pairs.
pub fn record_from_fields(fields: &[(String, Value)]) -> Record {
    fields
        .iter()
        .fold(Record::new(), |record, (key, value)| record.with(key.clone(), value.clone()))
}

pub fn print_records(
    records: &[Record],
    format: &OutputFormat,
    noun: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records)?);
        }
        OutputFormat::Text => {
            if records.is_empty() {
                println!("No {}s found", noun);
                return Ok(());
            }
            for record in records {
                println!("{}", record);
            }
            println!("Total: {} {}(s)", records.len(), noun);
        }
    }
    Ok(())
}

pub fn print_added(outcome: AddOutcome, noun: &str) {
    match outcome {
        AddOutcome::Local { id } => println!("Added {} #{} (local)", noun, id),
        AddOutcome::Remote => println!("Added {} (remote)", noun),
    }
}

/// Asks for a y/N confirmation on stdin.
pub fn confirm(prompt: &str) -> Result<bool, Box<dyn std::error::Error>> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
