//! Command-line client for the EduSync API.
//!
//! Commands:
//! - generate-docs: Write the API description document
//! - list: List the records of a collection
//! - get: Fetch one record
//! - create: Create a record
//! - update: Update a record
//! - delete: Delete a record
//! - health: Check server readiness
//!
//! Configuration via environment:
//! - EDUSYNC_URL: Base URL of the server (default: http://localhost:3000)
//! - EDUSYNC_TOKEN: Bearer token from `GET /auth/token`

mod commands;

use clap::{Parser, Subcommand};

use commands::{
    create::CreateArgs, delete::DeleteArgs, generate_docs::GenerateDocsArgs, get::GetArgs,
    health::HealthArgs, list::ListArgs, update::UpdateArgs,
};

/// EduSync CLI
///
/// Manage students, users, courses and enrollments from the command line.
/// Output is JSON unless --human is given.
#[derive(Parser)]
#[command(name = "edusync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output human-readable formatted text instead of JSON
    #[arg(long, global = true)]
    human: bool,

    /// EduSync server URL
    #[arg(
        long,
        env = "EDUSYNC_URL",
        default_value = "http://localhost:3000",
        global = true
    )]
    url: String,

    /// Bearer token for write operations
    #[arg(long, env = "EDUSYNC_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the API description document to a file
    GenerateDocs(GenerateDocsArgs),

    /// List the records of a collection
    List(ListArgs),

    /// Fetch one record
    Get(GetArgs),

    /// Create a record from a JSON payload
    Create(CreateArgs),

    /// Update fields of a record
    Update(UpdateArgs),

    /// Delete a record
    Delete(DeleteArgs),

    /// Check that the server and its database are up
    Health(HealthArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let client = match commands::build_client(cli.token.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let url = cli.url.trim_end_matches('/');

    let result = match cli.command {
        Commands::GenerateDocs(args) => commands::generate_docs::execute(cli.human, args),
        Commands::List(args) => commands::list::execute(&client, url, cli.human, args).await,
        Commands::Get(args) => commands::get::execute(&client, url, cli.human, args).await,
        Commands::Create(args) => commands::create::execute(&client, url, cli.human, args).await,
        Commands::Update(args) => commands::update::execute(&client, url, cli.human, args).await,
        Commands::Delete(args) => commands::delete::execute(&client, url, cli.human, args).await,
        Commands::Health(args) => commands::health::execute(&client, url, cli.human, args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
