//! Database models for the storage layer.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

/// Database row shared by every collection table.
#[derive(Debug, Clone, FromRow)]
pub struct StoredRecord {
    pub id: Uuid,
    pub data: Json<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredRecord {
    /// The stored payload.
    pub fn payload(&self) -> &Value {
        &self.data.0
    }

    /// Consume the row, returning the id and payload.
    pub fn into_parts(self) -> (Uuid, Value) {
        (self.id, self.data.0)
    }
}
