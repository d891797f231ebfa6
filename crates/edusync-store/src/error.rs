//! Error types for the storage layer.

use edusync_core::Collection;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database connection or query error.
    #[error("database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    /// No record with this id in the collection.
    #[error("{collection} record not found: {id}")]
    RecordNotFound { collection: Collection, id: Uuid },

    /// A unique constraint rejected the write.
    #[error("conflicting {collection} record: {detail}")]
    Conflict {
        collection: Collection,
        detail: String,
    },

    /// Migration error.
    #[error("migration error: {0}")]
    MigrationError(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl StoreError {
    /// Translate unique violations into [`StoreError::Conflict`].
    pub(crate) fn from_write(collection: Collection, err: sqlx::Error) -> Self {
        let unique_violation = err
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| code == "23505");

        if unique_violation {
            let detail = err
                .as_database_error()
                .map(|db| db.message().to_string())
                .unwrap_or_default();
            Self::Conflict { collection, detail }
        } else {
            Self::Connection(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(err: &StoreError) -> &'static str {
        match err {
            StoreError::Connection(_) => "connection",
            StoreError::RecordNotFound { .. } => "not-found",
            StoreError::Conflict { .. } => "conflict",
            StoreError::MigrationError(_) => "migration",
            StoreError::ConfigError(_) => "config",
        }
    }

    #[test]
    fn test_non_database_write_error_is_connection() {
        let err = StoreError::from_write(Collection::Users, sqlx::Error::PoolTimedOut);
        assert_eq!(kind(&err), "connection");
    }

    #[test]
    fn test_error_messages() {
        let err = StoreError::ConfigError("DATABASE_URL environment variable not set".to_string());
        assert_eq!(kind(&err), "config");
        assert_eq!(
            err.to_string(),
            "configuration error: DATABASE_URL environment variable not set"
        );
        assert_eq!(
            StoreError::MigrationError("checksum mismatch".to_string()).to_string(),
            "migration error: checksum mismatch"
        );
    }
}
