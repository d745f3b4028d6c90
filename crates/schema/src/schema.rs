//! Entity schemas
//!
//! An `EntitySchema` is the ordered set of named fields of one entity. It
//! is the single source both table-column and form-field generation read,
//! and it validates candidate records against every field's validator.

use crate::field::{FieldDef, FieldDescriptor};
use crate::validator::parse_date;
use forge_core::{
    AdminError, AdminResult, FieldIssue, FieldKind, IssueCode, Record, Validatable,
    ValidationError,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

// ============================================================================
// EntitySchema
// ============================================================================

/// Ordered mapping of field name to field descriptor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntitySchema {
    fields: Vec<FieldDescriptor>,
}

impl EntitySchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named field using builder pattern
    ///
    /// Declaring a name twice replaces the earlier definition in place.
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        let name = name.into();
        if let Some(existing) = self.fields.iter_mut().find(|f| f.name == name) {
            let position = existing.position;
            *existing = FieldDescriptor::new(name, position, def);
        } else {
            let position = self.fields.len();
            self.fields.push(FieldDescriptor::new(name, position, def));
        }
        self
    }

    /// All fields in declaration order
    pub fn describe_fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Get a field by name
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema has no field
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // ========================================================================
    // Table / form derivation
    // ========================================================================

    /// Fields shown as table columns, in display order
    pub fn table_columns(&self) -> Vec<&FieldDescriptor> {
        sort_by_order(
            self.fields
                .iter()
                .filter(|f| f.show_in_table())
                .map(|f| (f, f.effective_order()))
                .collect(),
        )
    }

    /// Fields shown in forms, in display order
    pub fn form_fields(&self) -> Vec<&FieldDescriptor> {
        sort_by_order(
            self.fields
                .iter()
                .filter(|f| f.show_in_form())
                .map(|f| (f, f.effective_order()))
                .collect(),
        )
    }

    /// Form fields drawn from an explicit list of names
    ///
    /// The list replaces the source set and its sequence stands in for the
    /// declaration order: fields without an explicit order keep their slot
    /// in `names`, and ordering still ascends by display order.
    pub fn form_fields_from<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<Vec<&FieldDescriptor>, String> {
        let mut picked = Vec::with_capacity(names.len());
        for (slot, name) in names.iter().enumerate() {
            let name = name.as_ref();
            let field = self
                .get(name)
                .ok_or_else(|| format!("unknown form field '{}'", name))?;
            let fallback = i32::try_from(slot).unwrap_or(i32::MAX);
            picked.push((field, field.meta.order.unwrap_or(fallback)));
        }
        Ok(sort_by_order(picked))
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate a full candidate record
    ///
    /// Every declared field is checked; optional fields may be absent.
    /// Keys the schema does not declare are kept untouched.
    pub fn parse(&self, candidate: &Value) -> Result<Record, ValidationError> {
        self.parse_with(candidate, false)
    }

    /// Validate a partial record (an update): only present keys are checked
    pub fn parse_partial(&self, candidate: &Value) -> Result<Record, ValidationError> {
        self.parse_with(candidate, true)
    }

    /// Validate and deserialize into a typed struct
    pub fn parse_as<T: DeserializeOwned>(&self, candidate: &Value) -> AdminResult<T> {
        let record = self.parse(candidate)?;
        Ok(serde_json::from_value(Value::Object(record))?)
    }

    fn parse_with(&self, candidate: &Value, partial: bool) -> Result<Record, ValidationError> {
        let Some(object) = candidate.as_object() else {
            return Err(ValidationError::single(FieldIssue::new(
                "",
                IssueCode::NotAnObject,
                "Expected an object",
            )));
        };

        let mut errors = ValidationError::new();
        for field in &self.fields {
            let value = object.get(&field.name);
            if partial && value.is_none() {
                continue;
            }
            field.validator.check(&field.name, value, &mut errors);
        }
        errors.into_result(object.clone())
    }
}

impl Validatable for EntitySchema {
    fn validate(&self) -> AdminResult<()> {
        for field in &self.fields {
            if !is_valid_identifier(&field.name) {
                return Err(AdminError::config(format!(
                    "Field name '{}' is not a valid identifier",
                    field.name
                )));
            }
            field.validator.check_patterns().map_err(|e| {
                AdminError::config(format!("Field '{}' has an {}", field.name, e))
            })?;
            if let FieldKind::Select { options } = field.kind() {
                if options.is_empty() {
                    return Err(AdminError::config(format!(
                        "Select field '{}' declares no options",
                        field.name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Normalize every date field of a fetched record to RFC 3339
///
/// Suitable as an entity's `parse_data` transform. Values that do not
/// parse as dates are left as they are.
pub fn coerce_dates(schema: &EntitySchema, mut record: Record) -> Record {
    for field in schema.describe_fields() {
        if field.kind() != &FieldKind::Date {
            continue;
        }
        let normalized = match record.get(&field.name) {
            Some(Value::String(raw)) => parse_date(raw),
            _ => None,
        };
        if let Some(normalized) = normalized {
            record.insert(field.name.clone(), Value::String(normalized));
        }
    }
    record
}

/// Stable ascending sort on the computed order; ties keep input sequence
fn sort_by_order(mut items: Vec<(&FieldDescriptor, i32)>) -> Vec<&FieldDescriptor> {
    items.sort_by_key(|(_, order)| *order);
    items.into_iter().map(|(f, _)| f).collect()
}

/// Check if a string is a valid field identifier
fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    // First character must be letter or underscore
    if !first.is_alphabetic() && first != '_' {
        return false;
    }

    // Rest must be alphanumeric or underscore
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldMeta, number, select, string};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn names(fields: Vec<&FieldDescriptor>) -> Vec<&str> {
        fields.into_iter().map(|f| f.name.as_str()).collect()
    }

    fn vehicle_schema() -> EntitySchema {
        EntitySchema::new()
            .field("plate", string(FieldMeta::labeled("Plaque").order(2)))
            .field("brand", string(FieldMeta::labeled("Marque").order(1)))
            .field("model", string(FieldMeta::labeled("Modèle").order(1)))
            .field(
                "notes",
                string(FieldMeta::labeled("Notes").hide_in_table()).optional(),
            )
            .field("capacity", number(FieldMeta::labeled("Capacité").order(0)).min(1.0))
    }

    #[test]
    fn test_table_columns_sorted_and_filtered() {
        let schema = vehicle_schema();
        assert_eq!(
            names(schema.table_columns()),
            vec!["capacity", "brand", "model", "plate"]
        );
    }

    #[test]
    fn test_form_fields_ties_keep_declaration_order() {
        let schema = vehicle_schema();
        // notes has no explicit order: it keeps declaration slot 3
        assert_eq!(
            names(schema.form_fields()),
            vec!["capacity", "brand", "model", "plate", "notes"]
        );
    }

    #[test]
    fn test_unordered_fields_keep_declaration_order() {
        let schema = EntitySchema::new()
            .field("c", string("C"))
            .field("a", string("A"))
            .field("b", string("B"));
        assert_eq!(names(schema.form_fields()), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_form_fields_from_override() {
        let schema = vehicle_schema();
        let fields = schema.form_fields_from(&["notes", "plate", "brand"]).unwrap();
        // notes has no explicit order and takes its slot in the list (0)
        assert_eq!(names(fields), vec!["notes", "brand", "plate"]);

        let plain = EntitySchema::new()
            .field("a", string("A"))
            .field("b", string("B"))
            .field("c", string("C"));
        assert_eq!(
            names(plain.form_fields_from(&["c", "a"]).unwrap()),
            vec!["c", "a"]
        );
        assert!(plain.form_fields_from(&["zzz"]).is_err());
    }

    #[test]
    fn test_parse_collects_all_issues() {
        let schema = vehicle_schema();
        let err = schema
            .parse(&json!({"plate": 12, "capacity": 0}))
            .unwrap_err();
        let codes: Vec<_> = err.issues.iter().map(|i| (i.field.as_str(), i.code)).collect();
        assert_eq!(
            codes,
            vec![
                ("plate", IssueCode::InvalidType),
                ("brand", IssueCode::Required),
                ("model", IssueCode::Required),
                ("capacity", IssueCode::TooSmall),
            ]
        );
    }

    #[test]
    fn test_parse_keeps_unknown_keys_and_allows_optional() {
        let schema = vehicle_schema();
        let record = schema
            .parse(&json!({
                "plate": "AB-123-CD",
                "brand": "Iveco",
                "model": "Daily",
                "capacity": 16,
                "depot": "Lyon"
            }))
            .unwrap();
        assert_eq!(record["depot"], json!("Lyon"));
        assert!(!record.contains_key("notes"));
    }

    #[test]
    fn test_parse_partial_checks_only_present_keys() {
        let schema = vehicle_schema();
        assert!(schema.parse_partial(&json!({"capacity": 20})).is_ok());
        assert!(schema.parse_partial(&json!({"capacity": -1})).is_err());
        assert!(schema.parse(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_parse_as_typed() {
        #[derive(serde::Deserialize)]
        struct Vehicle {
            plate: String,
            capacity: u32,
        }
        let v: Vehicle = vehicle_schema()
            .parse_as(&json!({
                "plate": "AB-123-CD", "brand": "Iveco", "model": "Daily", "capacity": 16
            }))
            .unwrap();
        assert_eq!(v.plate, "AB-123-CD");
        assert_eq!(v.capacity, 16);
    }

    #[test]
    fn test_redeclared_field_keeps_slot() {
        let schema = EntitySchema::new()
            .field("a", string("A"))
            .field("b", string("B"))
            .field("a", number("A2"));
        assert_eq!(schema.field_names(), vec!["a", "b"]);
        assert_eq!(schema.get("a").unwrap().kind(), &FieldKind::Number);
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_schema_validation() {
        assert!(vehicle_schema().validate().is_ok());
        let bad = EntitySchema::new().field("1abc", string("X"));
        assert!(bad.validate().is_err());
        let empty_select =
            EntitySchema::new().field("kind", select(Vec::<(String, String)>::new(), "Kind"));
        assert!(empty_select.validate().is_err());

        let bad_pattern =
            EntitySchema::new().field("code", string("Code").pattern("[0-9", "Digits only"));
        let err = bad_pattern.validate().unwrap_err();
        assert!(err.to_string().contains("code"));
    }

    #[test]
    fn test_coerce_dates() {
        let schema = EntitySchema::new()
            .field("departure", crate::field::date("Départ"))
            .field("name", string("Nom"));
        let record = json!({"departure": "2024-05-02", "name": "2024-05-02"})
            .as_object()
            .cloned()
            .unwrap();
        let out = coerce_dates(&schema, record);
        assert_eq!(out["departure"], json!("2024-05-02T00:00:00+00:00"));
        assert_eq!(out["name"], json!("2024-05-02"));
    }
}
