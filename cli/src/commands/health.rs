//! HEALTH command - Check server readiness.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::{HumanReadable, make_request, output};

#[derive(Args)]
pub struct HealthArgs {
    /// Only check that the process answers, not the database
    #[arg(long)]
    pub live: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

impl HumanReadable for HealthResponse {
    fn print_human(&self) {
        println!("  {} {}", "Status:".cyan(), self.status.green());
        if let Some(database) = &self.database {
            println!("  {} {}", "Database:".cyan(), database.green());
        }
    }
}

/// Execute the health command.
pub async fn execute(
    client: &reqwest::Client,
    base_url: &str,
    human: bool,
    args: HealthArgs,
) -> Result<()> {
    let path = if args.live { "/health" } else { "/health/ready" };
    let response: HealthResponse = make_request(client.get(format!("{base_url}{path}"))).await?;
    output(&response, human)
}
