//! LIST command - List the records of a collection.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use edusync_core::Collection;
use serde::{Deserialize, Serialize};

use super::{HumanReadable, Record, make_request, output};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Collection to list (students, users, courses, enrollments)
    pub collection: Collection,
}

/// Records of one collection.
#[derive(Debug, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RecordList(pub Vec<Record>);

impl HumanReadable for RecordList {
    fn print_human(&self) {
        println!("{} ({})", "Records".green().bold(), self.0.len());
        println!("{}", "=".repeat(60));

        if self.0.is_empty() {
            println!("  {}", "(No records)".dimmed());
            return;
        }

        for record in &self.0 {
            println!();
            record.print_human();
        }
    }
}

/// Execute the list command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: ListArgs,
) -> Result<()> {
    let url = format!("{}/{}", base_url, args.collection);
    let records: RecordList = make_request(client.get(&url)).await?;
    output(&records, human)
}
