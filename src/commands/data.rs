use clap::{Args, Subcommand};
use std::path::PathBuf;

use opsdriver::OpsApi;

#[derive(Args)]
pub struct DataCommand {
    #[command(subcommand)]
    pub command: DataSubcommand,
}

#[derive(Subcommand)]
pub enum DataSubcommand {
    /// Export every local collection as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Replace every local collection with the contents of an export file
    Import {
        /// Export file to read
        file: PathBuf,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Overwrite the remote collections with the local ones
    Push,
}

impl DataCommand {
    pub async fn run(&self, api: &OpsApi) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            DataSubcommand::Export { output } => {
                let snapshot = api.export_all().await?;
                let json = serde_json::to_string_pretty(&snapshot)?;

                match output {
                    Some(path) => {
                        std::fs::write(path, json)?;
                        let total: usize = snapshot.values().map(Vec::len).sum();
                        eprintln!("Exported {} record(s) to {}", total, path.display());
                    }
                    None => println!("{}", json),
                }
                Ok(())
            }
            DataSubcommand::Import { file, force } => {
                let contents = std::fs::read_to_string(file)?;

                if !force
                    && !super::confirm("Importing replaces all local data. Continue?")?
                {
                    println!("Import cancelled.");
                    return Ok(());
                }

                let imported = api.import_all(contents).await?;
                println!("Imported {} record(s) from {}", imported, file.display());
                Ok(())
            }
            DataSubcommand::Push => {
                let report = api.store().push_all().await?;

                for (collection, count) in &report.replaced {
                    println!("{:<10} replaced ({} record(s))", collection, count);
                }
                for (collection, error) in &report.failed {
                    eprintln!("{:<10} failed: {}", collection, error);
                }

                if !report.failed.is_empty() {
                    return Err(format!("{} collection(s) failed to push", report.failed.len()).into());
                }
                Ok(())
            }
        }
    }
}
