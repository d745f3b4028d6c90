//! Core traits for Admin Forge

use crate::error::AdminResult;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can check their own consistency
///
/// Implemented by schemas, entity configs and application configuration,
/// which are built once and then trusted by every consumer.
///
/// # Example
///
/// ```rust,ignore
/// use forge_core::{AdminError, AdminResult, Validatable};
///
/// struct Endpoint {
///     base_url: String,
/// }
///
/// impl Validatable for Endpoint {
///     fn validate(&self) -> AdminResult<()> {
///         if self.base_url.is_empty() {
///             return Err(AdminError::config("base_url cannot be empty"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Validate the current state of the object
    fn validate(&self) -> AdminResult<()>;
}
