//! edusync-store: Storage layer for EduSync
//!
//! This crate provides:
//! - PostgreSQL storage for the students, users, courses and enrollments collections
//! - Embedded, idempotent schema bootstrap
//! - Type-safe database operations via sqlx
//!
//! Each collection is a table holding its validated JSON payload in a JSONB column.
//!
//! # Usage
//!
//! ```rust,ignore
//! use edusync_core::Collection;
//! use edusync_store::{Store, StoreConfig};
//!
//! let config = StoreConfig::from_env()?;
//! let store = Store::connect(config).await?;
//!
//! let created = store.insert(Collection::Courses, json!({"name": "Algebra", "code": "M-1"})).await?;
//! let all = store.list(Collection::Courses).await?;
//! ```

pub mod error;
pub mod models;
pub mod schema;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use models::StoredRecord;
pub use store::{Store, StoreConfig};

// Re-export edusync-core for downstream crates
pub use edusync_core;
