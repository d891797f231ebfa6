//! edusync-core: API description document and record models for EduSync
//!
//! This crate provides:
//! - The Swagger 2.0 description document and its process-wide store
//! - Per-request host/scheme resolution with an ordered override rule table
//! - Rendering of a document into a Swagger UI page
//! - The document generator describing every EduSync route
//! - Collection and record payload models with validation
//!
//! # Usage
//!
//! ```rust,ignore
//! use edusync_core::{ApiDocument, DocumentStore, HostSchemeResolver, render_swagger_ui};
//!
//! let store = DocumentStore::new(ApiDocument::load("swagger.json")?);
//!
//! let mut snapshot = store.snapshot();
//! HostSchemeResolver::default()
//!     .resolve("http", "myapp.onrender.com")
//!     .apply(&mut snapshot);
//! let html = render_swagger_ui(&snapshot)?;
//! ```

pub mod document;
pub mod generator;
pub mod models;
pub mod render;
pub mod resolver;

pub use document::{ApiDocument, ApiInfo, DocumentError, DocumentStore};
pub use generator::{RouteSpec, edusync_document, generate_document};
pub use models::{
    Collection, CourseInput, EnrollmentInput, EnrollmentStatus, StudentInput, UnknownCollection,
    UserInput, ValidationError, validate_username,
};
pub use render::{RenderError, render_swagger_ui};
pub use resolver::{HostSchemeResolver, ResolvedOrigin, RuleParseError, SchemeRule};
