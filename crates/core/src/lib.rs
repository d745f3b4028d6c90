//! # Forge Core
//!
//! Core types, traits, and error handling for Admin Forge.
//!
//! This crate provides the foundational building blocks shared by the
//! schema, service and admin layers, including:
//!
//! - **Types**: records, list filters and envelopes, field kinds, validation rules
//! - **Traits**: `Validatable` for self-checking configuration objects
//! - **Errors**: unified error handling with `AdminError` and `AdminResult`
//!

pub mod error;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export commonly used items at crate root
pub use error::{AdminError, AdminResult};
pub use traits::Validatable;
pub use types::{
    FieldKind, Filters, ID_FIELD, ListMeta, ListResponse, Record, SelectOption, Validation,
    record_id, value_to_text,
};
pub use validation::{FieldIssue, IssueCode, ValidationError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
