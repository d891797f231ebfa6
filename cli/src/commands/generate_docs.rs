//! GENERATE-DOCS command - Write the API description document.
//!
//! The server loads this file at startup (`DOCS_PATH`) and serves it under
//! `/api-docs/`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use edusync_core::edusync_document;
use serde::Serialize;

use super::{HumanReadable, output};

/// Arguments for the generate-docs command.
#[derive(Args)]
pub struct GenerateDocsArgs {
    /// File to write
    #[arg(long, short = 'o', default_value = "swagger.json")]
    pub output: PathBuf,

    /// Host to bake into the file; normally left empty and set per request
    #[arg(long)]
    pub host: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GeneratedDocs {
    pub path: PathBuf,
    pub paths: usize,
}

impl HumanReadable for GeneratedDocs {
    fn print_human(&self) {
        println!("{}", "API description written.".green().bold());
        println!();
        println!("  {} {}", "File:".cyan(), self.path.display());
        println!("  {} {}", "Paths:".cyan(), self.paths);
    }
}

/// Execute the generate-docs command.
pub fn execute(human: bool, args: GenerateDocsArgs) -> Result<()> {
    let mut doc = edusync_document();
    if let Some(host) = args.host {
        doc.host = host;
    }

    let json = doc.to_json_pretty()?;
    std::fs::write(&args.output, json)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    output(
        &GeneratedDocs {
            path: args.output,
            paths: doc.paths.len(),
        },
        human,
    )
}
