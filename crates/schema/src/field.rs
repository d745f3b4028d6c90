//! Field descriptors for entity properties
//!
//! This module contains the field builder functions (`string`, `number`,
//! `select`, ...) and the `FieldDescriptor` an `EntitySchema` stores for
//! every named field. Each builder returns a [`FieldDef`]: the base
//! [`Validator`] paired with its display [`FieldMeta`]. The metadata is a
//! record of its own, never encoded inside the validator.

use crate::validator::Validator;
use forge_core::{FieldKind, SelectOption, Validation, value_to_text};
use heck::ToTitleCase;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

// ============================================================================
// Widget
// ============================================================================

/// Widget types for form rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    /// Single-line text input
    Text,
    /// Multi-line text area
    TextArea,
    /// Numeric input
    Number,
    /// Email input
    Email,
    /// URL input
    Url,
    /// Checkbox
    Checkbox,
    /// Toggle switch
    Toggle,
    /// Dropdown select
    Select,
    /// Multi-select
    MultiSelect,
    /// Free-form tag list
    Tag,
    /// Date picker
    Date,
    /// Image upload / preview
    Image,
    /// Hidden field
    Hidden,
}

impl Widget {
    /// Get the default widget for a field kind
    pub fn for_kind(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::String => Widget::Text,
            FieldKind::TextArea => Widget::TextArea,
            FieldKind::Number => Widget::Number,
            FieldKind::Boolean => Widget::Checkbox,
            FieldKind::Date => Widget::Date,
            FieldKind::Select { .. } => Widget::Select,
            FieldKind::MultiSelect { options } if options.is_empty() => Widget::Tag,
            FieldKind::MultiSelect { .. } => Widget::MultiSelect,
            FieldKind::Relation { multiple: true, .. } => Widget::MultiSelect,
            FieldKind::Relation { .. } => Widget::Select,
            FieldKind::Image => Widget::Image,
        }
    }
}

// ============================================================================
// ValueFormatter
// ============================================================================

/// Custom cell formatter: `(value) -> string`
#[derive(Clone)]
pub struct ValueFormatter(Arc<dyn Fn(&Value) -> String + Send + Sync>);

impl ValueFormatter {
    /// Wrap a formatting closure
    pub fn new(f: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Format a value
    pub fn apply(&self, value: &Value) -> String {
        (self.0)(value)
    }
}

impl std::fmt::Debug for ValueFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ValueFormatter(..)")
    }
}

impl PartialEq for ValueFormatter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// ============================================================================
// FieldMeta
// ============================================================================

/// Display and widget metadata carried next to a field's validator
///
/// This is the options object every builder accepts. Unknown keys cannot
/// be expressed: the struct is closed, so a typo fails to compile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMeta {
    /// Display label (falls back to the field name in title case)
    pub label: Option<String>,

    /// Placeholder text for input
    pub placeholder: Option<String>,

    /// Help text shown below the input
    pub description: Option<String>,

    /// Whether to show as a table column
    pub show_in_table: bool,

    /// Whether to show in create/edit forms
    pub show_in_form: bool,

    /// Explicit position; fields without one keep their declaration slot
    pub order: Option<i32>,

    /// Widget override (defaults from the field kind)
    pub widget: Option<Widget>,

    /// Prefix text (e.g. a currency sign)
    pub prefix: Option<String>,

    /// Suffix text (e.g. "km")
    pub suffix: Option<String>,

    /// Custom cell formatter
    #[serde(skip)]
    pub format: Option<ValueFormatter>,
}

impl Default for FieldMeta {
    fn default() -> Self {
        Self {
            label: None,
            placeholder: None,
            description: None,
            show_in_table: true,
            show_in_form: true,
            order: None,
            widget: None,
            prefix: None,
            suffix: None,
            format: None,
        }
    }
}

impl FieldMeta {
    /// Create metadata with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create metadata with a label
    pub fn labeled(label: impl Into<String>) -> Self {
        Self::new().label(label)
    }

    /// Set the label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the placeholder text
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the display order
    pub fn order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    /// Hide from table columns
    pub fn hide_in_table(mut self) -> Self {
        self.show_in_table = false;
        self
    }

    /// Hide from forms
    pub fn hide_in_form(mut self) -> Self {
        self.show_in_form = false;
        self
    }

    /// Set the widget
    pub fn widget(mut self, widget: Widget) -> Self {
        self.widget = Some(widget);
        self
    }

    /// Set the prefix text
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the suffix text
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Set a custom cell formatter
    pub fn format(mut self, f: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        self.format = Some(ValueFormatter::new(f));
        self
    }
}

impl From<&str> for FieldMeta {
    fn from(label: &str) -> Self {
        FieldMeta::labeled(label)
    }
}

impl From<String> for FieldMeta {
    fn from(label: String) -> Self {
        FieldMeta::labeled(label)
    }
}

// ============================================================================
// FieldDef
// ============================================================================

/// An unnamed field: validator plus metadata, as returned by the builders
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub validator: Validator,
    pub meta: FieldMeta,
}

impl FieldDef {
    /// Create a field definition from its parts
    pub fn new(validator: Validator, meta: FieldMeta) -> Self {
        Self { validator, meta }
    }

    /// Base kind of the field
    pub fn kind(&self) -> &FieldKind {
        &self.validator.kind
    }

    /// Allow the value to be absent
    pub fn optional(mut self) -> Self {
        self.validator = self.validator.optional();
        self
    }

    /// Require a minimum length
    pub fn min_length(self, n: usize) -> Self {
        self.rule(Validation::MinLength(n))
    }

    /// Allow a maximum length
    pub fn max_length(self, n: usize) -> Self {
        self.rule(Validation::MaxLength(n))
    }

    /// Require a minimum value
    pub fn min(self, n: f64) -> Self {
        self.rule(Validation::Min(n))
    }

    /// Require a maximum value
    pub fn max(self, n: f64) -> Self {
        self.rule(Validation::Max(n))
    }

    /// Require the value to match a regex
    pub fn pattern(self, regex: impl Into<String>, message: impl Into<String>) -> Self {
        self.rule(Validation::Pattern {
            regex: regex.into(),
            message: message.into(),
        })
    }

    /// Require a valid email address
    pub fn email(self) -> Self {
        self.rule(Validation::Email)
    }

    /// Require a valid URL
    pub fn url(self) -> Self {
        self.rule(Validation::Url)
    }

    /// Add a validation rule
    pub fn rule(mut self, rule: Validation) -> Self {
        self.validator = self.validator.with_rule(rule);
        self
    }
}

// ============================================================================
// Builders
// ============================================================================

fn build(kind: FieldKind, meta: impl Into<FieldMeta>) -> FieldDef {
    FieldDef::new(Validator::new(kind), meta.into())
}

/// Single-line text field
pub fn string(meta: impl Into<FieldMeta>) -> FieldDef {
    build(FieldKind::String, meta)
}

/// Numeric field
pub fn number(meta: impl Into<FieldMeta>) -> FieldDef {
    build(FieldKind::Number, meta)
}

/// Boolean field
pub fn boolean(meta: impl Into<FieldMeta>) -> FieldDef {
    build(FieldKind::Boolean, meta)
}

/// Date field (ISO 8601 strings)
pub fn date(meta: impl Into<FieldMeta>) -> FieldDef {
    build(FieldKind::Date, meta)
}

/// One value out of a fixed list of options
pub fn select<O: Into<SelectOption>>(
    options: impl IntoIterator<Item = O>,
    meta: impl Into<FieldMeta>,
) -> FieldDef {
    let options = options.into_iter().map(Into::into).collect();
    build(FieldKind::Select { options }, meta)
}

/// Free-form list of strings (rendered as tags)
pub fn list(meta: impl Into<FieldMeta>) -> FieldDef {
    build(FieldKind::MultiSelect { options: vec![] }, meta)
}

/// Several values out of a fixed list of options
pub fn multiselect<O: Into<SelectOption>>(
    options: impl IntoIterator<Item = O>,
    meta: impl Into<FieldMeta>,
) -> FieldDef {
    let options = options.into_iter().map(Into::into).collect();
    build(FieldKind::MultiSelect { options }, meta)
}

/// Reference to records of another entity
pub fn relation(
    target_entity: impl Into<String>,
    label_field: impl Into<String>,
    multiple: bool,
    meta: impl Into<FieldMeta>,
) -> FieldDef {
    build(
        FieldKind::Relation {
            target_entity: target_entity.into(),
            label_field: label_field.into(),
            multiple,
        },
        meta,
    )
}

/// Long-form text field
pub fn textarea(meta: impl Into<FieldMeta>) -> FieldDef {
    build(FieldKind::TextArea, meta)
}

/// Image URL field
pub fn image(meta: impl Into<FieldMeta>) -> FieldDef {
    build(FieldKind::Image, meta)
}

// ============================================================================
// FieldDescriptor
// ============================================================================

/// A named field of an entity schema
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name, unique within its schema
    pub name: String,

    /// Declaration position within the schema
    pub position: usize,

    pub validator: Validator,
    pub meta: FieldMeta,
}

impl FieldDescriptor {
    /// Name a field definition
    pub fn new(name: impl Into<String>, position: usize, def: FieldDef) -> Self {
        Self {
            name: name.into(),
            position,
            validator: def.validator,
            meta: def.meta,
        }
    }

    /// Base kind of the field
    pub fn kind(&self) -> &FieldKind {
        &self.validator.kind
    }

    /// Get the display label (falls back to the name in title case)
    pub fn label(&self) -> String {
        self.meta
            .label
            .clone()
            .unwrap_or_else(|| self.name.to_title_case())
    }

    /// Sort key: explicit order, else the declaration slot
    pub fn effective_order(&self) -> i32 {
        self.meta
            .order
            .unwrap_or_else(|| i32::try_from(self.position).unwrap_or(i32::MAX))
    }

    /// Widget to render (explicit or defaulted from the kind)
    pub fn widget(&self) -> Widget {
        self.meta
            .widget
            .unwrap_or_else(|| Widget::for_kind(self.kind()))
    }

    pub fn show_in_table(&self) -> bool {
        self.meta.show_in_table
    }

    pub fn show_in_form(&self) -> bool {
        self.meta.show_in_form
    }

    /// Check if the field may be absent
    pub fn is_optional(&self) -> bool {
        self.validator.optional
    }

    /// Render a value for a table cell
    pub fn format_value(&self, value: &Value) -> String {
        let body = match &self.meta.format {
            Some(f) => f.apply(value),
            None => self.default_text(value),
        };
        if body.is_empty() {
            return body;
        }
        format!(
            "{}{}{}",
            self.meta.prefix.as_deref().unwrap_or(""),
            body,
            self.meta.suffix.as_deref().unwrap_or("")
        )
    }

    fn default_text(&self, value: &Value) -> String {
        match (self.kind(), value) {
            (FieldKind::Boolean, Value::Bool(b)) => if *b { "yes" } else { "no" }.to_string(),
            (FieldKind::Select { options }, Value::String(s)) => options
                .iter()
                .find(|o| &o.value == s)
                .map(|o| o.label.clone())
                .unwrap_or_else(|| s.clone()),
            (FieldKind::MultiSelect { options }, Value::Array(items)) if !options.is_empty() => {
                items
                    .iter()
                    .map(|item| {
                        let raw = value_to_text(item);
                        options
                            .iter()
                            .find(|o| o.value == raw)
                            .map(|o| o.label.clone())
                            .unwrap_or(raw)
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            }
            _ => value_to_text(value),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
