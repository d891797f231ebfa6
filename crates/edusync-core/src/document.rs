//! The Swagger 2.0 description document and its read-only process-wide store.
//!
//! The master document is produced once (by the generator or from a file written by
//! it) and never mutated afterwards. Request handlers work on snapshots taken with
//! [`DocumentStore::snapshot`], which are fully owned copies.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Errors raised while loading a description document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The document file could not be read.
    #[error("failed to read description document {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or does not have the expected shape.
    #[error("invalid description document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The `info` block of the description document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiInfo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub version: String,
}

/// A Swagger 2.0 description document.
///
/// `host` and `schemes` are the fields stamped per request. Top-level fields this
/// type does not model (`definitions`, `tags`, ...) are kept in `extra` and written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiDocument {
    pub swagger: String,
    pub info: ApiInfo,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub schemes: Vec<String>,
    #[serde(rename = "basePath", default = "default_base_path")]
    pub base_path: String,
    #[serde(default)]
    pub paths: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_base_path() -> String {
    "/".to_string()
}

impl ApiDocument {
    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a document from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to indented JSON, as written to `swagger.json`.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Holds the master description document for the lifetime of the process.
///
/// Cloning a `DocumentStore` shares the same master.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    master: Arc<ApiDocument>,
}

impl DocumentStore {
    /// Wrap a fully built master document.
    pub fn new(master: ApiDocument) -> Self {
        Self {
            master: Arc::new(master),
        }
    }

    /// The shared master document.
    pub fn master(&self) -> &ApiDocument {
        &self.master
    }

    /// A fully owned copy of the master for one request to mutate.
    pub fn snapshot(&self) -> ApiDocument {
        ApiDocument::clone(&self.master)
    }
}
