//! Admin entity configuration
//!
//! An [`AdminEntityConfig`] is everything a generic admin page needs to
//! administer one entity: its schema, its service binding, the actions it
//! allows and how it nests under a parent. Configs are built once with
//! [`create_admin_entity`] and never mutated afterwards.

use forge_core::{AdminError, AdminResult, Filters, Record, Validatable, ValidationError};
use forge_schema::{EntitySchema, FieldDescriptor};
use forge_service::{CrudService, ServiceBinding};
use heck::ToKebabCase;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Default number of rows per table page
pub const DEFAULT_PAGE_SIZE: usize = 10;

// ============================================================================
// Actions
// ============================================================================

/// An action a page may offer on an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Bulk,
    Export,
    Import,
}

impl Action {
    /// All actions in display order
    pub const ALL: [Action; 7] = [
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
        Action::Bulk,
        Action::Export,
        Action::Import,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Bulk => "bulk",
            Action::Export => "export",
            Action::Import => "import",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action gates checked by pages before calling the service
///
/// Services do not enforce these; a read-only entity also needs a
/// service that refuses mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Actions {
    pub create: bool,
    pub read: bool,
    pub update: bool,
    pub delete: bool,
    pub bulk: bool,
    pub export: bool,
    pub import: bool,
}

impl Default for Actions {
    fn default() -> Self {
        Self {
            create: true,
            read: true,
            update: true,
            delete: true,
            bulk: false,
            export: false,
            import: false,
        }
    }
}

impl Actions {
    /// Only `read` allowed
    pub fn read_only() -> Self {
        Self {
            create: false,
            update: false,
            delete: false,
            ..Self::default()
        }
    }

    /// Check if an action is allowed
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Create => self.create,
            Action::Read => self.read,
            Action::Update => self.update,
            Action::Delete => self.delete,
            Action::Bulk => self.bulk,
            Action::Export => self.export,
            Action::Import => self.import,
        }
    }

    /// Set one gate using builder pattern
    pub fn with(mut self, action: Action, allowed: bool) -> Self {
        let gate = match action {
            Action::Create => &mut self.create,
            Action::Read => &mut self.read,
            Action::Update => &mut self.update,
            Action::Delete => &mut self.delete,
            Action::Bulk => &mut self.bulk,
            Action::Export => &mut self.export,
            Action::Import => &mut self.import,
        };
        *gate = allowed;
        self
    }

    /// Allowed actions in display order
    pub fn allowed(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|a| self.allows(*a))
            .collect()
    }
}

// ============================================================================
// UI options
// ============================================================================

/// Table rendering options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableUi {
    pub page_size: usize,
    pub searchable: bool,
    /// Field the table is initially sorted by
    pub default_sort: Option<String>,
}

impl Default for TableUi {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            searchable: true,
            default_sort: None,
        }
    }
}

impl TableUi {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn sorted_by(mut self, field: impl Into<String>) -> Self {
        self.default_sort = Some(field.into());
        self
    }
}

/// How form fields are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormLayout {
    #[default]
    Simple,
    Grid,
    Tabs,
}

/// Form rendering options
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormUi {
    pub layout: FormLayout,
    /// Grid columns (used by the grid layout)
    pub columns: Option<u8>,
}

impl FormUi {
    pub fn layout(layout: FormLayout) -> Self {
        Self {
            layout,
            columns: None,
        }
    }
}

// ============================================================================
// Hierarchy
// ============================================================================

/// Declares that an entity lives under a parent record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentConfig {
    /// Field (and filter) holding the parent identifier, e.g. `moduleId`
    pub key: String,
    /// Route parameter carrying the parent identifier
    pub route_param: String,
    pub parent_entity: Option<String>,
    pub parent_label: Option<String>,
}

impl ParentConfig {
    pub fn new(key: impl Into<String>, route_param: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            route_param: route_param.into(),
            parent_entity: None,
            parent_label: None,
        }
    }

    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.parent_entity = Some(entity.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.parent_label = Some(label.into());
        self
    }
}

/// A child page reachable from one record of this entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRoute {
    /// Path segment appended after the parent identifier
    pub route: String,
    pub label: String,
    pub icon: String,
    /// Route parameter naming the parent identifier
    #[serde(default = "default_child_param")]
    pub param: String,
}

fn default_child_param() -> String {
    "id".to_string()
}

impl ChildRoute {
    pub fn new(route: impl Into<String>, label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            label: label.into(),
            icon: icon.into(),
            param: default_child_param(),
        }
    }

    /// Name the route parameter, e.g. the child's parent key
    pub fn param(mut self, param: impl Into<String>) -> Self {
        self.param = param.into();
        self
    }

    /// Path of this child page for one parent record
    pub fn path_for(&self, parent_id: &str) -> String {
        format!("{}/{}", parent_id, self.route.trim_start_matches('/'))
    }

    /// Route template under the parent entity's route, e.g. `/modules/:moduleId/lessons`
    pub fn template(&self, parent_route: &str) -> String {
        format!(
            "{}/{}",
            parent_route.trim_end_matches('/'),
            self.path_for(&format!(":{}", self.param))
        )
    }
}

// ============================================================================
// Record transform
// ============================================================================

/// Post-fetch transform applied to every listed record
#[derive(Clone)]
pub struct RecordTransform(Arc<dyn Fn(Record) -> Record + Send + Sync>);

impl RecordTransform {
    pub fn new(f: impl Fn(Record) -> Record + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn apply(&self, record: Record) -> Record {
        (self.0)(record)
    }
}

impl std::fmt::Debug for RecordTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RecordTransform(..)")
    }
}

// ============================================================================
// EntityOptions
// ============================================================================

/// Caller-supplied options merged over the defaults by [`create_admin_entity`]
#[derive(Debug, Clone, Default)]
pub struct EntityOptions {
    pub description: Option<String>,
    pub icon: Option<String>,
    pub actions: Option<Actions>,
    pub table: Option<TableUi>,
    pub form: Option<FormUi>,
    pub services: Option<ServiceBinding>,
    pub query_key: Option<String>,
    pub parent: Option<ParentConfig>,
    pub children: Vec<ChildRoute>,
    pub form_fields: Option<Vec<String>>,
    pub parse_data: Option<RecordTransform>,
}

impl EntityOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn actions(mut self, actions: Actions) -> Self {
        self.actions = Some(actions);
        self
    }

    pub fn table(mut self, table: TableUi) -> Self {
        self.table = Some(table);
        self
    }

    pub fn form(mut self, form: FormUi) -> Self {
        self.form = Some(form);
        self
    }

    pub fn services(mut self, services: ServiceBinding) -> Self {
        self.services = Some(services);
        self
    }

    /// Bind a parent-agnostic service
    pub fn service(self, service: impl CrudService + 'static) -> Self {
        self.services(ServiceBinding::flat(service))
    }

    pub fn query_key(mut self, key: impl Into<String>) -> Self {
        self.query_key = Some(key.into());
        self
    }

    pub fn parent(mut self, parent: ParentConfig) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn child(mut self, child: ChildRoute) -> Self {
        self.children.push(child);
        self
    }

    /// Render forms from exactly these fields
    pub fn form_fields<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.form_fields = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn parse_data(mut self, f: impl Fn(Record) -> Record + Send + Sync + 'static) -> Self {
        self.parse_data = Some(RecordTransform::new(f));
        self
    }
}

// ============================================================================
// AdminEntityConfig
// ============================================================================

/// Per-entity descriptor consumed by pages and the hook layer
#[derive(Debug, Clone)]
pub struct AdminEntityConfig {
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub schema: Arc<EntitySchema>,
    pub actions: Actions,
    pub table: TableUi,
    pub form: FormUi,
    pub services: ServiceBinding,
    pub query_key: String,
    pub parent: Option<ParentConfig>,
    pub children: Vec<ChildRoute>,
    pub form_fields: Option<Vec<String>>,
    pub parse_data: Option<RecordTransform>,
}

/// Build an entity config, merging `options` over the defaults
///
/// Fails when no service is bound, when the schema is inconsistent, or
/// when `form_fields` names a field the schema does not declare.
pub fn create_admin_entity(
    title: impl Into<String>,
    schema: EntitySchema,
    options: EntityOptions,
) -> AdminResult<AdminEntityConfig> {
    let title = title.into();
    let Some(services) = options.services else {
        return Err(AdminError::invalid_entity(&title, "no service bound"));
    };

    let config = AdminEntityConfig {
        query_key: options
            .query_key
            .unwrap_or_else(|| title.to_kebab_case()),
        title,
        description: options.description,
        icon: options.icon,
        schema: Arc::new(schema),
        actions: options.actions.unwrap_or_default(),
        table: options.table.unwrap_or_default(),
        form: options.form.unwrap_or_default(),
        services,
        parent: options.parent,
        children: options.children,
        form_fields: options.form_fields,
        parse_data: options.parse_data,
    };
    config.validate()?;
    Ok(config)
}

impl AdminEntityConfig {
    /// Check if pages may offer `action`
    pub fn can(&self, action: Action) -> bool {
        self.actions.allows(action)
    }

    /// Fields rendered as table columns, in display order
    pub fn table_columns(&self) -> Vec<&FieldDescriptor> {
        self.schema.table_columns()
    }

    /// Fields rendered in forms, in display order
    ///
    /// With a `form_fields` override the named fields replace the schema's
    /// form set; display order still applies to them.
    pub fn form_fields(&self) -> Vec<&FieldDescriptor> {
        match &self.form_fields {
            Some(names) => self
                .schema
                .form_fields_from(names.as_slice())
                .unwrap_or_else(|_| self.schema.form_fields()),
            None => self.schema.form_fields(),
        }
    }

    /// Child pages with their paths resolved for one parent record
    pub fn child_routes(&self, parent_id: &str) -> Vec<(&ChildRoute, String)> {
        self.children
            .iter()
            .map(|child| (child, child.path_for(parent_id)))
            .collect()
    }

    /// Check if records are always handled under a parent
    pub fn is_nested(&self) -> bool {
        self.parent.is_some()
    }

    /// Filter naming the parent, as pages pass it to the hook layer
    pub fn parent_filter(&self, parent_id: &str) -> Option<Filters> {
        self.parent
            .as_ref()
            .map(|p| Filters::new().with(p.key.as_str(), parent_id))
    }

    /// Service to call within `parent_id`'s scope (or unscoped)
    pub fn scoped_service(&self, parent_id: Option<&str>) -> Arc<dyn CrudService> {
        self.services.scoped(parent_id)
    }

    /// Apply the post-fetch transform, if any
    pub fn parse_record(&self, record: Record) -> Record {
        match &self.parse_data {
            Some(transform) => transform.apply(record),
            None => record,
        }
    }

    /// Validate a create-form submission against the schema
    pub fn validate_input(&self, candidate: &Value) -> Result<Record, ValidationError> {
        self.schema.parse(candidate)
    }

    /// Validate an edit-form submission (only present fields)
    pub fn validate_patch(&self, candidate: &Value) -> Result<Record, ValidationError> {
        self.schema.parse_partial(candidate)
    }
}

impl Validatable for AdminEntityConfig {
    fn validate(&self) -> AdminResult<()> {
        if self.title.trim().is_empty() {
            return Err(AdminError::invalid_entity("", "title cannot be empty"));
        }
        if self.query_key.trim().is_empty() {
            return Err(AdminError::invalid_entity(&self.title, "query key cannot be empty"));
        }
        self.schema
            .validate()
            .map_err(|e| AdminError::invalid_entity(&self.title, e.to_string()))?;

        if let Some(names) = &self.form_fields {
            self.schema
                .form_fields_from(names.as_slice())
                .map_err(|msg| AdminError::invalid_entity(&self.title, msg))?;
        }
        if self.services.is_parent_aware() && self.parent.is_none() {
            return Err(AdminError::invalid_entity(
                &self.title,
                "a parent-aware service needs a parent config",
            ));
        }
        if let Some(parent) = &self.parent {
            if parent.key.trim().is_empty() || parent.route_param.trim().is_empty() {
                return Err(AdminError::invalid_entity(
                    &self.title,
                    "parent key and route parameter cannot be empty",
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
