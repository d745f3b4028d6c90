//! Read-only binding: lists pass through, mutations are refused

use crate::service::CrudService;
use async_trait::async_trait;
use forge_core::{AdminError, AdminResult, Filters, ListResponse, Record};
use std::sync::Arc;

/// Wraps a service so only `fetch_items` reaches it
///
/// Every mutation fails with [`AdminError::NotImplemented`] naming the
/// entity, without calling the inner service.
pub struct ReadOnlyService {
    inner: Arc<dyn CrudService>,
    entity: String,
}

impl ReadOnlyService {
    pub fn new(inner: impl CrudService + 'static, entity: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(inner),
            entity: entity.into(),
        }
    }

    fn refuse<T>(&self, operation: &str) -> AdminResult<T> {
        tracing::warn!(entity = %self.entity, operation, "mutation on read-only entity");
        Err(AdminError::not_implemented(format!(
            "{operation} is not available for {}",
            self.entity
        )))
    }
}

#[async_trait]
impl CrudService for ReadOnlyService {
    async fn fetch_items(&self, filters: &Filters) -> AdminResult<ListResponse> {
        self.inner.fetch_items(filters).await
    }

    async fn create_item(&self, _data: Record) -> AdminResult<Record> {
        self.refuse("create")
    }

    async fn update_item(&self, _id: &str, _data: Record) -> AdminResult<Record> {
        self.refuse("update")
    }

    async fn delete_item(&self, _id: &str) -> AdminResult<()> {
        self.refuse("delete")
    }
}
