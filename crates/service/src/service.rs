//! The CRUD service contract
//!
//! Every entity's data layer implements [`CrudService`], whatever the
//! transport. Entities nested under a parent (lessons under a module)
//! implement [`ParentAwareService`] as well, and say so at construction
//! time through [`ServiceBinding::ParentAware`].

use crate::parent::{ParentScopedService, Unscoped};
use async_trait::async_trait;
use forge_core::{AdminResult, Filters, ListResponse, Record};
use std::sync::Arc;

// ============================================================================
// CrudService
// ============================================================================

/// Four-operation data contract, independent of transport
#[async_trait]
pub trait CrudService: Send + Sync {
    /// List records matching `filters`
    async fn fetch_items(&self, filters: &Filters) -> AdminResult<ListResponse>;

    /// Create a record; the returned record carries the assigned identity
    async fn create_item(&self, data: Record) -> AdminResult<Record>;

    /// Merge a partial record into the record with `id`
    async fn update_item(&self, id: &str, data: Record) -> AdminResult<Record>;

    /// Remove the record with `id`
    async fn delete_item(&self, id: &str) -> AdminResult<()>;
}

#[async_trait]
impl<S: CrudService + ?Sized> CrudService for Arc<S> {
    async fn fetch_items(&self, filters: &Filters) -> AdminResult<ListResponse> {
        (**self).fetch_items(filters).await
    }

    async fn create_item(&self, data: Record) -> AdminResult<Record> {
        (**self).create_item(data).await
    }

    async fn update_item(&self, id: &str, data: Record) -> AdminResult<Record> {
        (**self).update_item(id, data).await
    }

    async fn delete_item(&self, id: &str) -> AdminResult<()> {
        (**self).delete_item(id).await
    }
}

// ============================================================================
// ParentAwareService
// ============================================================================

/// A service that can operate within a parent record's scope
#[async_trait]
pub trait ParentAwareService: CrudService {
    /// List records belonging to `parent_id`
    async fn fetch_items_in(&self, parent_id: &str, filters: &Filters)
    -> AdminResult<ListResponse>;

    /// Create a record under `parent_id`
    async fn create_item_in(&self, parent_id: &str, data: Record) -> AdminResult<Record>;

    /// Update a record under `parent_id`
    async fn update_item_in(&self, parent_id: &str, id: &str, data: Record)
    -> AdminResult<Record>;

    /// Delete a record under `parent_id`
    async fn delete_item_in(&self, parent_id: &str, id: &str) -> AdminResult<()>;
}

// ============================================================================
// ServiceBinding
// ============================================================================

/// How an entity config reaches its data: flat, or parent-aware
#[derive(Clone)]
pub enum ServiceBinding {
    /// Parent-agnostic service: calls are forwarded unchanged
    Flat(Arc<dyn CrudService>),
    /// Service that receives the parent identifier explicitly
    ParentAware(Arc<dyn ParentAwareService>),
}

impl ServiceBinding {
    /// Bind a parent-agnostic service
    pub fn flat(service: impl CrudService + 'static) -> Self {
        ServiceBinding::Flat(Arc::new(service))
    }

    /// Bind a parent-aware service
    pub fn parent_aware(service: impl ParentAwareService + 'static) -> Self {
        ServiceBinding::ParentAware(Arc::new(service))
    }

    /// Check if the binding accepts a parent identifier
    pub fn is_parent_aware(&self) -> bool {
        matches!(self, ServiceBinding::ParentAware(_))
    }

    /// Service to use for calls made in the context of `parent_id`
    ///
    /// Flat bindings ignore the parent; parent-aware bindings without a
    /// parent fall back to their unscoped operations.
    pub fn scoped(&self, parent_id: Option<&str>) -> Arc<dyn CrudService> {
        match (self, parent_id) {
            (ServiceBinding::Flat(service), _) => Arc::clone(service),
            (ServiceBinding::ParentAware(service), Some(parent_id)) => Arc::new(
                ParentScopedService::new(Arc::clone(service), parent_id),
            ),
            (ServiceBinding::ParentAware(service), None) => {
                Arc::new(Unscoped::new(Arc::clone(service)))
            }
        }
    }
}

impl std::fmt::Debug for ServiceBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceBinding::Flat(_) => f.write_str("ServiceBinding::Flat"),
            ServiceBinding::ParentAware(_) => f.write_str("ServiceBinding::ParentAware"),
        }
    }
}

impl<S: CrudService + 'static> From<Arc<S>> for ServiceBinding {
    fn from(service: Arc<S>) -> Self {
        ServiceBinding::Flat(service)
    }
}
