//! Schema definitions and migration utilities.

use sqlx::PgPool;

use crate::error::{StoreError, StoreResult};
use edusync_core::Collection;

/// Embedded migration SQL for the collection tables (001_schema.sql).
pub const SCHEMA_MIGRATION: &str = include_str!("../../../migrations/001_schema.sql");

/// Create any missing tables and indexes.
///
/// Idempotent: every statement uses `IF NOT EXISTS`.
pub async fn run_migrations(pool: &PgPool) -> StoreResult<()> {
    tracing::info!("Running database migrations...");

    tracing::debug!("Running schema migration (001_schema.sql)...");
    sqlx::raw_sql(SCHEMA_MIGRATION)
        .execute(pool)
        .await
        .map_err(|e| StoreError::MigrationError(format!("Schema migration failed: {}", e)))?;

    tracing::info!("Migrations completed successfully");
    Ok(())
}

/// Check that every collection table exists.
pub async fn is_schema_initialized(pool: &PgPool) -> StoreResult<bool> {
    let tables: Vec<String> = Collection::ALL
        .iter()
        .map(|c| c.table().to_string())
        .collect();

    let result: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)::bigint
        FROM information_schema.tables
        WHERE table_schema = 'public'
        AND table_name = ANY($1)
        "#,
    )
    .bind(&tables)
    .fetch_one(pool)
    .await?;

    Ok(result.0 == tables.len() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_migration_embedded() {
        for collection in Collection::ALL {
            let statement = format!("CREATE TABLE IF NOT EXISTS {}", collection.table());
            assert!(SCHEMA_MIGRATION.contains(&statement), "missing {statement}");
        }
    }

    #[test]
    fn test_usernames_are_unique() {
        assert!(SCHEMA_MIGRATION.contains("CREATE UNIQUE INDEX IF NOT EXISTS users_username_idx"));
    }
}
