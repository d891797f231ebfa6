//! DELETE command - Delete a record.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use edusync_core::Collection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{HumanReadable, make_request, output};

/// Arguments for the delete command.
#[derive(Args)]
pub struct DeleteArgs {
    /// Collection the record belongs to
    pub collection: Collection,

    /// Record ID to delete
    pub id: Uuid,

    /// Skip confirmation prompt (for non-interactive use)
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Response from deleting a record.
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteRecordResponse {
    pub id: Uuid,
    pub message: String,
}

impl HumanReadable for DeleteRecordResponse {
    fn print_human(&self) {
        println!("{}", "Record deleted successfully!".green().bold());
        println!();
        println!("  {} {}", "ID:".cyan(), self.id);
        println!("  {}", self.message.dimmed());
    }
}

/// Execute the delete command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: DeleteArgs,
) -> Result<()> {
    // Confirmation prompt for interactive use
    if human && !args.yes {
        eprint!(
            "{} Are you sure you want to delete {} {}? [y/N] ",
            "Warning:".yellow().bold(),
            args.collection.singular(),
            args.id
        );

        use std::io::Write;
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            eprintln!("Aborted.");
            return Ok(());
        }
    }

    let url = format!("{}/{}/{}", base_url, args.collection, args.id);
    let response: DeleteRecordResponse = make_request(client.delete(&url)).await?;

    output(&response, human)
}
