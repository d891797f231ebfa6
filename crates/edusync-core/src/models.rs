//! Collections and record payloads of the school information system.
//!
//! Payloads use the camelCase field names API clients send. Each input type has a
//! `validate` method; handlers reject invalid payloads with 400 before anything
//! reaches the datastore.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// Collections
// ============================================================================

/// A record collection exposed under `/<collection>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Students,
    Users,
    Courses,
    Enrollments,
}

impl Collection {
    /// Every collection, in route order.
    pub const ALL: [Collection; 4] = [
        Collection::Students,
        Collection::Users,
        Collection::Courses,
        Collection::Enrollments,
    ];

    /// Path segment and collection name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Students => "students",
            Self::Users => "users",
            Self::Courses => "courses",
            Self::Enrollments => "enrollments",
        }
    }

    /// Database table backing the collection.
    pub const fn table(self) -> &'static str {
        self.as_str()
    }

    /// Tag used in the description document.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Students => "Students",
            Self::Users => "Users",
            Self::Courses => "Courses",
            Self::Enrollments => "Enrollments",
        }
    }

    /// Singular noun for summaries ("Create a student").
    pub const fn singular(self) -> &'static str {
        match self {
            Self::Students => "student",
            Self::Users => "user",
            Self::Courses => "course",
            Self::Enrollments => "enrollment",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The name does not match any collection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown collection: {0}")]
pub struct UnknownCollection(pub String);

impl FromStr for Collection {
    type Err = UnknownCollection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCollection(s.to_string()))
    }
}

// ============================================================================
// Validation
// ============================================================================

/// A payload field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid field {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

// ============================================================================
// Payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInput {
    pub name: String,
    pub email: String,
}

impl StudentInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        match self.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(ValidationError::new("email", "must be an email address")),
        }
    }
}

/// User payload as submitted. Only the password hash is ever stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    pub username: String,
    pub password: String,
}

/// Check a username on its own, as when a stored user is renamed.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    require("username", username)
}

impl UserInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_username(&self.username)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::new(
                "password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInput {
    pub name: String,
    pub code: String,
}

impl CourseInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("code", &self.code)
    }
}

/// Lifecycle of an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    #[default]
    Active,
    Completed,
    Dropped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentInput {
    pub student_id: String,
    pub course_id: String,
    #[serde(default)]
    pub status: EnrollmentStatus,
}

impl EnrollmentInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("studentId", &self.student_id)?;
        require("courseId", &self.course_id)
    }
}
