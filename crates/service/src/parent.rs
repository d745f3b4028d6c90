//! Parent scoping for nested entities
//!
//! [`ParentScopedService`] fixes a parent identifier and exposes a plain
//! [`CrudService`], so pages and hooks never see the parent argument.
//! [`ParentKeyed`] turns a flat service into a parent-aware one by storing
//! the parent identifier in a foreign-key field.

use crate::service::{CrudService, ParentAwareService};
use async_trait::async_trait;
use forge_core::{AdminResult, Filters, ListResponse, Record};
use serde_json::Value;
use std::sync::Arc;

// ============================================================================
// ParentScopedService
// ============================================================================

/// A parent-aware service with the parent identifier bound
#[derive(Clone)]
pub struct ParentScopedService {
    inner: Arc<dyn ParentAwareService>,
    parent_id: String,
}

impl ParentScopedService {
    pub fn new(inner: Arc<dyn ParentAwareService>, parent_id: impl Into<String>) -> Self {
        Self {
            inner,
            parent_id: parent_id.into(),
        }
    }

    /// The bound parent identifier
    pub fn parent_id(&self) -> &str {
        &self.parent_id
    }
}

impl std::fmt::Debug for ParentScopedService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParentScopedService")
            .field("parent_id", &self.parent_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CrudService for ParentScopedService {
    async fn fetch_items(&self, filters: &Filters) -> AdminResult<ListResponse> {
        self.inner.fetch_items_in(&self.parent_id, filters).await
    }

    async fn create_item(&self, data: Record) -> AdminResult<Record> {
        self.inner.create_item_in(&self.parent_id, data).await
    }

    async fn update_item(&self, id: &str, data: Record) -> AdminResult<Record> {
        self.inner.update_item_in(&self.parent_id, id, data).await
    }

    async fn delete_item(&self, id: &str) -> AdminResult<()> {
        self.inner.delete_item_in(&self.parent_id, id).await
    }
}

// ============================================================================
// Unscoped
// ============================================================================

/// A parent-aware service used without a parent
pub struct Unscoped(Arc<dyn ParentAwareService>);

impl Unscoped {
    pub fn new(inner: Arc<dyn ParentAwareService>) -> Self {
        Self(inner)
    }
}

#[async_trait]
impl CrudService for Unscoped {
    async fn fetch_items(&self, filters: &Filters) -> AdminResult<ListResponse> {
        self.0.fetch_items(filters).await
    }

    async fn create_item(&self, data: Record) -> AdminResult<Record> {
        self.0.create_item(data).await
    }

    async fn update_item(&self, id: &str, data: Record) -> AdminResult<Record> {
        self.0.update_item(id, data).await
    }

    async fn delete_item(&self, id: &str) -> AdminResult<()> {
        self.0.delete_item(id).await
    }
}

// ============================================================================
// ParentKeyed
// ============================================================================

/// Parent-aware adapter over a flat service using a foreign-key field
///
/// Scoped lists filter on `key = parent_id`; scoped creates and updates
/// stamp `key` with the parent identifier. Unscoped calls pass through.
pub struct ParentKeyed {
    inner: Arc<dyn CrudService>,
    key: String,
}

impl ParentKeyed {
    pub fn new(inner: impl CrudService + 'static, key: impl Into<String>) -> Self {
        Self::from_arc(Arc::new(inner), key)
    }

    pub fn from_arc(inner: Arc<dyn CrudService>, key: impl Into<String>) -> Self {
        Self {
            inner,
            key: key.into(),
        }
    }

    /// Foreign-key field holding the parent identifier
    pub fn key(&self) -> &str {
        &self.key
    }

    fn stamp(&self, parent_id: &str, mut data: Record) -> Record {
        data.insert(self.key.clone(), Value::String(parent_id.to_string()));
        data
    }
}

#[async_trait]
impl CrudService for ParentKeyed {
    async fn fetch_items(&self, filters: &Filters) -> AdminResult<ListResponse> {
        self.inner.fetch_items(filters).await
    }

    async fn create_item(&self, data: Record) -> AdminResult<Record> {
        self.inner.create_item(data).await
    }

    async fn update_item(&self, id: &str, data: Record) -> AdminResult<Record> {
        self.inner.update_item(id, data).await
    }

    async fn delete_item(&self, id: &str) -> AdminResult<()> {
        self.inner.delete_item(id).await
    }
}

#[async_trait]
impl ParentAwareService for ParentKeyed {
    async fn fetch_items_in(
        &self,
        parent_id: &str,
        filters: &Filters,
    ) -> AdminResult<ListResponse> {
        let scoped = filters.clone().with(self.key.as_str(), parent_id);
        self.inner.fetch_items(&scoped).await
    }

    async fn create_item_in(&self, parent_id: &str, data: Record) -> AdminResult<Record> {
        self.inner.create_item(self.stamp(parent_id, data)).await
    }

    async fn update_item_in(
        &self,
        parent_id: &str,
        id: &str,
        data: Record,
    ) -> AdminResult<Record> {
        self.inner.update_item(id, self.stamp(parent_id, data)).await
    }

    async fn delete_item_in(&self, _parent_id: &str, id: &str) -> AdminResult<()> {
        self.inner.delete_item(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockService;
    use crate::ServiceBinding;
    use serde_json::json;
    use std::sync::Mutex;

    fn lessons() -> ParentKeyed {
        let mock = MockService::from_values(
            "Lesson",
            [
                json!({"id": "l1", "title": "Intro", "moduleId": "m1"}),
                json!({"id": "l2", "title": "Basics", "moduleId": "m1"}),
                json!({"id": "l3", "title": "Other", "moduleId": "m2"}),
            ],
        );
        ParentKeyed::new(mock, "moduleId")
    }

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    /// Records every call with the parent it received
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn log(&self, entry: String) {
            self.calls.lock().unwrap().push(entry);
        }
    }

    #[async_trait]
    impl CrudService for Recorder {
        async fn fetch_items(&self, _filters: &Filters) -> AdminResult<ListResponse> {
            self.log("fetch".into());
            Ok(ListResponse::default())
        }
        async fn create_item(&self, data: Record) -> AdminResult<Record> {
            self.log("create".into());
            Ok(data)
        }
        async fn update_item(&self, id: &str, data: Record) -> AdminResult<Record> {
            self.log(format!("update {id}"));
            Ok(data)
        }
        async fn delete_item(&self, id: &str) -> AdminResult<()> {
            self.log(format!("delete {id}"));
            Ok(())
        }
    }

    #[async_trait]
    impl ParentAwareService for Recorder {
        async fn fetch_items_in(&self, p: &str, _f: &Filters) -> AdminResult<ListResponse> {
            self.log(format!("fetch in {p}"));
            Ok(ListResponse::default())
        }
        async fn create_item_in(&self, p: &str, data: Record) -> AdminResult<Record> {
            self.log(format!("create in {p}"));
            Ok(data)
        }
        async fn update_item_in(&self, p: &str, id: &str, data: Record) -> AdminResult<Record> {
            self.log(format!("update {id} in {p}"));
            Ok(data)
        }
        async fn delete_item_in(&self, p: &str, id: &str) -> AdminResult<()> {
            self.log(format!("delete {id} in {p}"));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_scoped_service_passes_parent_first() {
        let recorder = Arc::new(Recorder::default());
        let scoped = ParentScopedService::new(recorder.clone(), "m7");

        scoped.fetch_items(&Filters::new()).await.unwrap();
        scoped.create_item(Record::new()).await.unwrap();
        scoped.update_item("x", Record::new()).await.unwrap();
        scoped.delete_item("x").await.unwrap();

        assert_eq!(
            *recorder.calls.lock().unwrap(),
            vec!["fetch in m7", "create in m7", "update x in m7", "delete x in m7"]
        );
    }

    #[tokio::test]
    async fn test_binding_without_parent_uses_unscoped_calls() {
        let recorder = Arc::new(Recorder::default());
        let binding = ServiceBinding::ParentAware(recorder.clone());

        let svc = binding.scoped(None);
        svc.fetch_items(&Filters::new()).await.unwrap();
        svc.delete_item("x").await.unwrap();

        assert_eq!(*recorder.calls.lock().unwrap(), vec!["fetch", "delete x"]);
    }

    #[tokio::test]
    async fn test_flat_binding_ignores_parent() {
        let recorder = Arc::new(Recorder::default());
        let binding = ServiceBinding::Flat(recorder.clone());

        binding.scoped(Some("m1")).fetch_items(&Filters::new()).await.unwrap();
        assert_eq!(*recorder.calls.lock().unwrap(), vec!["fetch"]);
    }

    #[tokio::test]
    async fn test_keyed_fetch_filters_by_parent() {
        let svc = lessons();
        let list = svc.fetch_items_in("m1", &Filters::new()).await.unwrap();
        assert_eq!(list.ids(), vec!["l1", "l2"]);

        let all = svc.fetch_items(&Filters::new()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_keyed_create_stamps_parent() {
        let svc = lessons();
        let created = svc
            .create_item_in("m2", record(json!({"title": "New"})))
            .await
            .unwrap();
        assert_eq!(created["moduleId"], json!("m2"));

        let list = svc.fetch_items_in("m2", &Filters::new()).await.unwrap();
        assert_eq!(list.len(), 2);
    }

    #[tokio::test]
    async fn test_keyed_update_moves_record_to_parent() {
        let svc = lessons();
        let updated = svc
            .update_item_in("m2", "l1", record(json!({"title": "Moved"})))
            .await
            .unwrap();
        assert_eq!(updated["moduleId"], json!("m2"));
        assert_eq!(updated["title"], json!("Moved"));
    }
}
