//! Command implementations for the edusync CLI.
//!
//! Each command module provides:
//! - Args struct for clap argument parsing
//! - execute() function that performs the command
//! - Human-readable and JSON output formatting

pub mod create;
pub mod delete;
pub mod generate_docs;
pub mod get;
pub mod health;
pub mod list;
pub mod update;

use anyhow::Result;
use colored::Colorize;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Common error type for HTTP requests.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

/// Build an HTTP client, optionally configured with a Bearer token.
pub fn build_client(token: Option<&str>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();

    if let Some(token) = token {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| anyhow::anyhow!("Invalid token value: {}", e))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        builder = builder.default_headers(headers);
    }

    Ok(builder.build()?)
}

/// Print output in JSON or human-readable format.
pub fn output<T: Serialize + HumanReadable>(value: &T, human: bool) -> Result<()> {
    if human {
        value.print_human();
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

/// Trait for types that can be printed in human-readable format.
pub trait HumanReadable {
    fn print_human(&self);
}

/// Make an HTTP request and handle common error cases.
pub async fn make_request<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, CliError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        Ok(response.json::<T>().await?)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(CliError::Server {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

/// Pull the message out of an error body.
///
/// The server answers with `{"error": {"code", "message"}}`, or with a flat
/// `{"error": "..."}` on logout failures.
fn error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };
    match json.get("error") {
        Some(Value::String(message)) => message.clone(),
        Some(error) => error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(body)
            .to_string(),
        None => body.to_string(),
    }
}

/// Parse a JSON object given on the command line.
pub fn parse_payload(data: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(data)? {
        Value::Object(fields) => Ok(fields),
        _ => anyhow::bail!("payload must be a JSON object"),
    }
}

/// A record as returned by the server: `id` plus its fields.
#[derive(Debug, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Record(pub Map<String, Value>);

impl Record {
    pub fn id(&self) -> &str {
        self.0.get("id").and_then(Value::as_str).unwrap_or("?")
    }

    fn print_fields(&self) {
        for (key, value) in self.0.iter().filter(|(k, _)| k.as_str() != "id") {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            println!("    {} {}", format!("{key}:").cyan(), value);
        }
    }
}

impl HumanReadable for Record {
    fn print_human(&self) {
        println!("  {} {}", "ID:".cyan(), self.id().yellow());
        self.print_fields();
    }
}
