//! GET command - Fetch one record.

use anyhow::Result;
use clap::Args;
use edusync_core::Collection;
use uuid::Uuid;

use super::{Record, make_request, output};

/// Arguments for the get command.
#[derive(Args)]
pub struct GetArgs {
    /// Collection the record belongs to
    pub collection: Collection,

    /// Record ID
    pub id: Uuid,
}

/// Execute the get command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: GetArgs,
) -> Result<()> {
    let url = format!("{}/{}/{}", base_url, args.collection, args.id);
    let record: Record = make_request(client.get(&url)).await?;
    output(&record, human)
}
