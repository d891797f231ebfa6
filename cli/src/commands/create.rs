//! CREATE command - Create a record.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use edusync_core::Collection;
use serde::{Deserialize, Serialize};

use super::{HumanReadable, Record, make_request, output, parse_payload};

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// Collection to create the record in
    pub collection: Collection,

    /// Record fields as a JSON object, e.g. '{"name":"Ada","email":"ada@school.com"}'
    #[arg(long, short = 'd')]
    pub data: String,
}

/// Response from creating a record.
#[derive(Debug, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CreatedRecord(pub Record);

impl HumanReadable for CreatedRecord {
    fn print_human(&self) {
        println!("{}", "Record created successfully!".green().bold());
        println!();
        self.0.print_human();
    }
}

/// Execute the create command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: CreateArgs,
) -> Result<()> {
    let payload = parse_payload(&args.data)?;
    let url = format!("{}/{}", base_url, args.collection);

    let record: CreatedRecord = make_request(client.post(&url).json(&payload)).await?;
    output(&record, human)
}
