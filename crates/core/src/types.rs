//! Core types used throughout Admin Forge
//!
//! This module contains the value types shared by every layer: the
//! dynamic record shape services exchange, list filters and envelopes,
//! the field kinds a schema can declare and the validation rules a field
//! can carry.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ============================================================================
// Records
// ============================================================================

/// One entity record as exchanged with services (a JSON object)
pub type Record = serde_json::Map<String, Value>;

/// Name of the identity field every record carries once persisted
pub const ID_FIELD: &str = "id";

/// Read a record's identity as a string (ids may be strings or numbers)
pub fn record_id(record: &Record) -> Option<String> {
    match record.get(ID_FIELD)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Plain-text rendering of a JSON value (no quotes around strings)
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

// ============================================================================
// Filters
// ============================================================================

/// List filters, serialized as query parameters by remote bindings
///
/// Ordered so that two filter sets with the same pairs compare and hash
/// equal regardless of insertion order (they are part of cache keys).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(BTreeMap<String, String>);

impl Filters {
    /// Create an empty filter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter using builder pattern
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a filter, replacing any previous value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Remove a filter
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Get a filter value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterate over (key, value) pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check if no filter is set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of filters
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// ============================================================================
// List envelope
// ============================================================================

/// Paging information returned alongside a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    pub total: u64,
    pub total_pages: u64,
}

/// Canonical list envelope: `{ data, meta? }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    pub data: Vec<Record>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ListMeta>,
}

impl ListResponse {
    /// Create an envelope without paging information
    pub fn new(data: Vec<Record>) -> Self {
        Self { data, meta: None }
    }

    /// Attach paging information
    pub fn with_meta(mut self, total: u64, total_pages: u64) -> Self {
        self.meta = Some(ListMeta { total, total_pages });
        self
    }

    /// Number of records in this page
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the page is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Identities of the records in this page
    pub fn ids(&self) -> Vec<String> {
        self.data.iter().filter_map(record_id).collect()
    }

    /// Find a record by identity
    pub fn find(&self, id: &str) -> Option<&Record> {
        self.data
            .iter()
            .find(|r| record_id(r).as_deref() == Some(id))
    }
}

// ============================================================================
// Field Kinds
// ============================================================================

/// One choice of a select / multiselect field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    /// Create an option
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl<V: Into<String>, L: Into<String>> From<(V, L)> for SelectOption {
    fn from((value, label): (V, L)) -> Self {
        Self::new(value, label)
    }
}

/// Base kind of a declared entity field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "params", rename_all = "snake_case")]
pub enum FieldKind {
    /// Single-line string
    String,
    /// Numeric value (integer or float)
    Number,
    /// Boolean true/false
    Boolean,
    /// Calendar date or timestamp (ISO 8601 string)
    Date,
    /// One value out of a fixed list
    Select { options: Vec<SelectOption> },
    /// Any number of values out of a list (free-form when no options)
    MultiSelect { options: Vec<SelectOption> },
    /// Reference to records of another entity by id
    Relation {
        target_entity: String,
        label_field: String,
        multiple: bool,
    },
    /// Long-form text
    TextArea,
    /// Image URL
    Image,
}

impl FieldKind {
    /// Short name of the kind
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::Select { .. } => "select",
            FieldKind::MultiSelect { .. } => "multiselect",
            FieldKind::Relation { .. } => "relation",
            FieldKind::TextArea => "textarea",
            FieldKind::Image => "image",
        }
    }

    /// Declared options for select kinds
    pub fn options(&self) -> &[SelectOption] {
        match self {
            FieldKind::Select { options } | FieldKind::MultiSelect { options } => options,
            _ => &[],
        }
    }

    /// Check if values of this kind are lists
    pub fn is_multiple(&self) -> bool {
        match self {
            FieldKind::MultiSelect { .. } => true,
            FieldKind::Relation { multiple, .. } => *multiple,
            _ => false,
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Relation { target_entity, .. } => write!(f, "relation({})", target_entity),
            other => write!(f, "{}", other.name()),
        }
    }
}

// ============================================================================
// Validation Rules
// ============================================================================

/// Field validation rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validation {
    /// Minimum string length
    MinLength(usize),
    /// Maximum string length
    MaxLength(usize),
    /// Minimum numeric value
    Min(f64),
    /// Maximum numeric value
    Max(f64),
    /// Regex pattern validation
    Pattern { regex: String, message: String },
    /// Valid email address
    Email,
    /// Valid URL
    Url,
    /// Value must be in a list
    OneOf(Vec<String>),
}

impl Validation {
    /// Get a user-friendly error message
    pub fn error_message(&self) -> String {
        match self {
            Validation::MinLength(n) => format!("Minimum length is {} characters", n),
            Validation::MaxLength(n) => format!("Maximum length is {} characters", n),
            Validation::Min(n) => format!("Minimum value is {}", n),
            Validation::Max(n) => format!("Maximum value is {}", n),
            Validation::Pattern { message, .. } => message.clone(),
            Validation::Email => "Must be a valid email address".to_string(),
            Validation::Url => "Must be a valid URL".to_string(),
            Validation::OneOf(values) => format!("Must be one of: {}", values.join(", ")),
        }
    }
}

impl std::fmt::Display for Validation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Validation::MinLength(n) => write!(f, "min_length({})", n),
            Validation::MaxLength(n) => write!(f, "max_length({})", n),
            Validation::Min(n) => write!(f, "min({})", n),
            Validation::Max(n) => write!(f, "max({})", n),
            Validation::Pattern { regex, .. } => write!(f, "pattern({})", regex),
            Validation::Email => write!(f, "email"),
            Validation::Url => write!(f, "url"),
            Validation::OneOf(values) => write!(f, "one_of({:?})", values),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
