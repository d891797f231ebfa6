//! UPDATE command - Update fields of a record.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use edusync_core::Collection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{HumanReadable, Record, make_request, output, parse_payload};

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Collection the record belongs to
    pub collection: Collection,

    /// Record ID
    pub id: Uuid,

    /// Fields to change as a JSON object; other fields are kept
    #[arg(long, short = 'd')]
    pub data: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(transparent)]
pub struct UpdatedRecord(pub Record);

impl HumanReadable for UpdatedRecord {
    fn print_human(&self) {
        println!("{}", "Record updated.".green().bold());
        println!();
        self.0.print_human();
    }
}

/// Execute the update command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: UpdateArgs,
) -> Result<()> {
    let payload = parse_payload(&args.data)?;
    let url = format!("{}/{}/{}", base_url, args.collection, args.id);

    let record: UpdatedRecord = make_request(client.put(&url).json(&payload)).await?;
    output(&record, human)
}
