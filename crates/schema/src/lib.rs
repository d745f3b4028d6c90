//! # Forge Schema
//!
//! Declarative entity schemas for Admin Forge.
//!
//! A schema is composed from field builder calls. Each field pairs a base
//! validator with display metadata, and the schema derives from them both
//! the table columns and the form fields an admin page renders.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use forge_schema::prelude::*;
//!
//! let schema = EntitySchema::new()
//!     .field("name", string(FieldMeta::labeled("Nom").order(1)).min_length(2))
//!     .field("active", boolean("Active").optional());
//!
//! for field in schema.table_columns() {
//!     println!("{}", field.label());
//! }
//! ```

pub mod field;
pub mod schema;
pub mod validator;

pub use field::{FieldDef, FieldDescriptor, FieldMeta, ValueFormatter, Widget};
pub use schema::{EntitySchema, coerce_dates};
pub use validator::{Validator, compile_pattern, parse_date};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convenient re-exports for declaring schemas
pub mod prelude {
    pub use crate::field::{
        FieldDef, FieldMeta, Widget, boolean, date, image, list, multiselect, number, relation,
        select, string, textarea,
    };
    pub use crate::schema::EntitySchema;
    pub use forge_core::{FieldKind, SelectOption};
}
