//! Base validators for field values
//!
//! A `Validator` knows the field kind, whether the field may be absent and
//! the extra rules attached by builder calls. It checks one JSON value at
//! a time and records every problem it finds.

use chrono::{DateTime, NaiveDate};
use forge_core::{FieldIssue, FieldKind, IssueCode, Validation, ValidationError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
});

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(https?://|/)\S+$").expect("url regex is valid"));

/// Compiled `pattern` rules, keyed by source
static PATTERNS: LazyLock<Mutex<HashMap<String, Regex>>> = LazyLock::new(Default::default);

/// Compile a pattern rule, at most once per process
pub fn compile_pattern(source: &str) -> Result<Regex, regex::Error> {
    let mut cache = PATTERNS.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(re) = cache.get(source) {
        return Ok(re.clone());
    }
    let re = Regex::new(source)?;
    cache.insert(source.to_string(), re.clone());
    Ok(re)
}

// ============================================================================
// Validator
// ============================================================================

/// Validation primitive for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validator {
    /// Base kind the value must match
    pub kind: FieldKind,

    /// Whether the value may be absent or null
    pub optional: bool,

    /// Additional rules
    pub rules: Vec<Validation>,
}

impl Validator {
    /// Create a required validator for a kind
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            optional: false,
            rules: Vec::new(),
        }
    }

    /// Allow the value to be absent
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Add a rule
    pub fn with_rule(mut self, rule: Validation) -> Self {
        self.rules.push(rule);
        self
    }

    /// Check that every `pattern` rule compiles
    pub fn check_patterns(&self) -> Result<(), String> {
        for rule in &self.rules {
            if let Validation::Pattern { regex, .. } = rule {
                compile_pattern(regex).map_err(|e| format!("invalid pattern '{regex}': {e}"))?;
            }
        }
        Ok(())
    }

    /// Check a value that may be absent, recording issues under `field`
    pub fn check(&self, field: &str, value: Option<&Value>, errors: &mut ValidationError) {
        match value {
            None | Some(Value::Null) => {
                if !self.optional {
                    errors.push(FieldIssue::new(
                        field,
                        IssueCode::Required,
                        "This field is required",
                    ));
                }
            }
            Some(value) => self.check_present(field, value, errors),
        }
    }

    fn check_present(&self, field: &str, value: &Value, errors: &mut ValidationError) {
        if !self.check_kind(field, value, errors) {
            return;
        }
        for rule in &self.rules {
            if let Some(issue) = apply_rule(field, rule, value) {
                errors.push(issue);
            }
        }
    }

    /// Type check against the field kind; returns false when the value is
    /// unusable so that rules are not evaluated against it.
    fn check_kind(&self, field: &str, value: &Value, errors: &mut ValidationError) -> bool {
        let type_error = |expected: &str| {
            FieldIssue::new(
                field,
                IssueCode::InvalidType,
                format!("Expected {}", expected),
            )
        };

        match &self.kind {
            FieldKind::String | FieldKind::TextArea | FieldKind::Image => {
                if !value.is_string() {
                    errors.push(type_error("a string"));
                    return false;
                }
            }
            FieldKind::Number => {
                if !value.is_number() {
                    errors.push(type_error("a number"));
                    return false;
                }
            }
            FieldKind::Boolean => {
                if !value.is_boolean() {
                    errors.push(type_error("a boolean"));
                    return false;
                }
            }
            FieldKind::Date => {
                let Some(s) = value.as_str() else {
                    errors.push(type_error("a date string"));
                    return false;
                };
                if parse_date(s).is_none() {
                    errors.push(FieldIssue::new(
                        field,
                        IssueCode::InvalidDate,
                        "Must be a date (YYYY-MM-DD or RFC 3339)",
                    ));
                    return false;
                }
            }
            FieldKind::Select { options } => {
                let Some(s) = value.as_str() else {
                    errors.push(type_error("a string"));
                    return false;
                };
                if !options.iter().any(|o| o.value == s) {
                    errors.push(invalid_option(field, options));
                    return false;
                }
            }
            FieldKind::MultiSelect { options } => {
                let Some(items) = value.as_array() else {
                    errors.push(type_error("a list"));
                    return false;
                };
                for item in items {
                    let Some(s) = item.as_str() else {
                        errors.push(type_error("a list of strings"));
                        return false;
                    };
                    if !options.is_empty() && !options.iter().any(|o| o.value == s) {
                        errors.push(invalid_option(field, options));
                        return false;
                    }
                }
            }
            FieldKind::Relation { multiple, .. } => {
                let ok = if *multiple {
                    value
                        .as_array()
                        .is_some_and(|items| items.iter().all(is_identity))
                } else {
                    is_identity(value)
                };
                if !ok {
                    errors.push(type_error(if *multiple {
                        "a list of ids"
                    } else {
                        "an id"
                    }));
                    return false;
                }
            }
        }
        true
    }
}

fn is_identity(value: &Value) -> bool {
    value.is_string() || value.is_u64() || value.is_i64()
}

fn invalid_option(field: &str, options: &[forge_core::SelectOption]) -> FieldIssue {
    let values: Vec<String> = options.iter().map(|o| o.value.clone()).collect();
    FieldIssue::new(
        field,
        IssueCode::InvalidOption,
        Validation::OneOf(values).error_message(),
    )
}

fn apply_rule(field: &str, rule: &Validation, value: &Value) -> Option<FieldIssue> {
    let failed = match rule {
        Validation::MinLength(n) => text_len(value).map(|len| (len < *n, IssueCode::TooShort)),
        Validation::MaxLength(n) => text_len(value).map(|len| (len > *n, IssueCode::TooLong)),
        Validation::Min(min) => value.as_f64().map(|v| (v < *min, IssueCode::TooSmall)),
        Validation::Max(max) => value.as_f64().map(|v| (v > *max, IssueCode::TooLarge)),
        // Schemas reject uncompilable patterns when validated
        Validation::Pattern { regex, .. } => {
            let s = value.as_str()?;
            let re = compile_pattern(regex).ok()?;
            Some((!re.is_match(s), IssueCode::PatternMismatch))
        }
        Validation::Email => value
            .as_str()
            .map(|s| (!EMAIL_RE.is_match(s), IssueCode::InvalidEmail)),
        Validation::Url => value
            .as_str()
            .map(|s| (!URL_RE.is_match(s), IssueCode::InvalidUrl)),
        Validation::OneOf(values) => value
            .as_str()
            .map(|s| (!values.iter().any(|v| v == s), IssueCode::InvalidOption)),
    };

    match failed {
        Some((true, code)) => Some(FieldIssue::new(field, code, rule.error_message())),
        _ => None,
    }
}

/// Length of a string value in characters, or of a list value in items
fn text_len(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Parse a `YYYY-MM-DD` or RFC 3339 string, returning it as RFC 3339
pub fn parse_date(s: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.to_rfc3339());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().to_rfc3339())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::SelectOption;
    use serde_json::json;

    fn run(validator: &Validator, value: Option<Value>) -> ValidationError {
        let mut errors = ValidationError::new();
        validator.check("f", value.as_ref(), &mut errors);
        errors
    }

    #[test]
    fn test_required_and_optional() {
        let required = Validator::new(FieldKind::String);
        assert_eq!(run(&required, None).issues[0].code, IssueCode::Required);
        assert_eq!(
            run(&required, Some(Value::Null)).issues[0].code,
            IssueCode::Required
        );

        let optional = Validator::new(FieldKind::String).optional();
        assert!(run(&optional, None).is_empty());
        assert!(run(&optional, Some(Value::Null)).is_empty());
    }

    #[test]
    fn test_kind_mismatch_skips_rules() {
        let v = Validator::new(FieldKind::Number).with_rule(Validation::Min(1.0));
        let errors = run(&v, Some(json!("12")));
        assert_eq!(errors.issues.len(), 1);
        assert_eq!(errors.issues[0].code, IssueCode::InvalidType);
    }

    #[test]
    fn test_length_and_range_rules() {
        let name = Validator::new(FieldKind::String)
            .with_rule(Validation::MinLength(2))
            .with_rule(Validation::MaxLength(5));
        assert_eq!(run(&name, Some(json!("a"))).issues[0].code, IssueCode::TooShort);
        assert_eq!(
            run(&name, Some(json!("abcdef"))).issues[0].code,
            IssueCode::TooLong
        );
        assert!(run(&name, Some(json!("abc"))).is_empty());

        let seats = Validator::new(FieldKind::Number)
            .with_rule(Validation::Min(1.0))
            .with_rule(Validation::Max(80.0));
        assert_eq!(run(&seats, Some(json!(0))).issues[0].code, IssueCode::TooSmall);
        assert_eq!(run(&seats, Some(json!(81))).issues[0].code, IssueCode::TooLarge);
        assert!(run(&seats, Some(json!(50))).is_empty());
    }

    #[test]
    fn test_select_membership() {
        let v = Validator::new(FieldKind::Select {
            options: vec![SelectOption::new("bus", "Bus"), SelectOption::new("van", "Van")],
        });
        assert!(run(&v, Some(json!("bus"))).is_empty());
        assert_eq!(
            run(&v, Some(json!("train"))).issues[0].code,
            IssueCode::InvalidOption
        );
    }

    #[test]
    fn test_free_form_list_accepts_any_strings() {
        let v = Validator::new(FieldKind::MultiSelect { options: vec![] });
        assert!(run(&v, Some(json!(["a", "b"]))).is_empty());
        assert_eq!(
            run(&v, Some(json!(["a", 1]))).issues[0].code,
            IssueCode::InvalidType
        );
    }

    #[test]
    fn test_relation_identity() {
        let single = Validator::new(FieldKind::Relation {
            target_entity: "modules".into(),
            label_field: "title".into(),
            multiple: false,
        });
        assert!(run(&single, Some(json!("module-1"))).is_empty());
        assert!(run(&single, Some(json!(4))).is_empty());
        assert!(!run(&single, Some(json!(["module-1"]))).is_empty());
    }

    #[test]
    fn test_email_and_pattern() {
        let email = Validator::new(FieldKind::String).with_rule(Validation::Email);
        assert!(run(&email, Some(json!("jo@example.com"))).is_empty());
        assert_eq!(
            run(&email, Some(json!("nope"))).issues[0].code,
            IssueCode::InvalidEmail
        );

        let plate = Validator::new(FieldKind::String).with_rule(Validation::Pattern {
            regex: r"^[A-Z]{2}-\d{3}-[A-Z]{2}$".to_string(),
            message: "Invalid plate".to_string(),
        });
        assert!(run(&plate, Some(json!("AB-123-CD"))).is_empty());
        let errors = run(&plate, Some(json!("abc")));
        assert_eq!(errors.issues[0].message, "Invalid plate");
        assert!(plate.check_patterns().is_ok());
    }

    #[test]
    fn test_invalid_pattern_caught_before_use() {
        let broken = Validator::new(FieldKind::String).with_rule(Validation::Pattern {
            regex: "([a-z]".to_string(),
            message: "Letters".to_string(),
        });
        let err = broken.check_patterns().unwrap_err();
        assert!(err.contains("([a-z]"));
        assert!(compile_pattern("([a-z]").is_err());

        let first = compile_pattern("^[a-z]+$").unwrap();
        let again = compile_pattern("^[a-z]+$").unwrap();
        assert_eq!(first.as_str(), again.as_str());
    }

    #[test]
    fn test_dates() {
        let v = Validator::new(FieldKind::Date);
        assert!(run(&v, Some(json!("2024-03-01"))).is_empty());
        assert!(run(&v, Some(json!("2024-03-01T08:30:00+01:00"))).is_empty());
        assert_eq!(
            run(&v, Some(json!("01/03/2024"))).issues[0].code,
            IssueCode::InvalidDate
        );
        assert_eq!(
            parse_date("2024-03-01").as_deref(),
            Some("2024-03-01T00:00:00+00:00")
        );
    }
}
