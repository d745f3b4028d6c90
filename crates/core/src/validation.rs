//! Validation outcome types
//!
//! A failed schema parse produces one `ValidationError` carrying every
//! field issue found, so a form can show all of them next to their inputs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// IssueCode
// ============================================================================

/// Error codes for field issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// Candidate is not an object
    NotAnObject,
    /// Required field is missing or null
    Required,
    /// Value has the wrong JSON type for the field kind
    InvalidType,
    TooShort,
    TooLong,
    TooSmall,
    TooLarge,
    PatternMismatch,
    InvalidEmail,
    InvalidUrl,
    /// Value is not one of the declared options
    InvalidOption,
    InvalidDate,
    Custom,
}

// ============================================================================
// FieldIssue
// ============================================================================

/// One problem found on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Field name (empty for record-level issues)
    pub field: String,

    /// Error code for programmatic handling
    pub code: IssueCode,

    /// Human-readable error message
    pub message: String,
}

impl FieldIssue {
    /// Create a new field issue
    pub fn new(field: impl Into<String>, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.field.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

// ============================================================================
// ValidationError
// ============================================================================

/// Schema parse failure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Create an empty error (no issues yet)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an error with a single issue
    pub fn single(issue: FieldIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }

    /// Add an issue
    pub fn push(&mut self, issue: FieldIssue) {
        self.issues.push(issue);
    }

    /// Check if any issue was recorded
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues for one field
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldIssue> + 'a {
        self.issues.iter().filter(move |i| i.field == field)
    }

    /// First message per field, for inline display next to form inputs
    pub fn field_errors(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for issue in &self.issues {
            map.entry(issue.field.clone())
                .or_insert_with(|| issue.message.clone());
        }
        map
    }

    /// Convert to a result: `Ok(value)` when no issue was recorded
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationError> {
        if self.issues.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = self
            .issues
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", msg)
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_keep_first_message() {
        let mut err = ValidationError::new();
        err.push(FieldIssue::new("name", IssueCode::Required, "Name is required"));
        err.push(FieldIssue::new("name", IssueCode::TooShort, "Too short"));
        err.push(FieldIssue::new("price", IssueCode::TooSmall, "Too small"));

        let map = err.field_errors();
        assert_eq!(map.len(), 2);
        assert_eq!(map["name"], "Name is required");
        assert_eq!(err.for_field("name").count(), 2);
    }

    #[test]
    fn test_display_joins_issues() {
        let mut err = ValidationError::new();
        err.push(FieldIssue::new("", IssueCode::NotAnObject, "Expected an object"));
        err.push(FieldIssue::new("email", IssueCode::InvalidEmail, "Must be a valid email address"));
        assert_eq!(
            err.to_string(),
            "Expected an object; email: Must be a valid email address"
        );
    }

    #[test]
    fn test_into_result() {
        assert_eq!(ValidationError::new().into_result(5), Ok(5));
        let err = ValidationError::single(FieldIssue::new("a", IssueCode::Custom, "bad"));
        assert!(err.into_result(5).is_err());
    }
}
