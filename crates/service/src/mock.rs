//! Mock binding: a CRUD service over an in-memory list
//!
//! The list lives as long as the service. Operations take the list lock
//! for their whole duration (simulated latency included), so calls issued
//! back to back complete in issuance order and never interleave.

use crate::service::CrudService;
use async_trait::async_trait;
use forge_core::{
    AdminError, AdminResult, Filters, ID_FIELD, ListResponse, Record, record_id, value_to_text,
};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Filter key selecting the 1-based page
pub const PAGE_KEY: &str = "page";

/// Filter key selecting the page size
pub const LIMIT_KEY: &str = "limit";

/// Filter key for case-insensitive text search over string fields
pub const SEARCH_KEY: &str = "search";

/// In-memory CRUD service seeded with records
#[derive(Debug)]
pub struct MockService {
    entity: String,
    items: Mutex<Vec<Record>>,
    latency: Option<Duration>,
}

impl MockService {
    /// Create a mock service from seed records
    ///
    /// Seeds without an identity get a generated one.
    pub fn new(entity: impl Into<String>, seed: Vec<Record>) -> Self {
        let mut items: Vec<Record> = Vec::with_capacity(seed.len());
        for mut record in seed {
            if record_id(&record).is_none() {
                let id = fresh_id(&items);
                record.insert(ID_FIELD.to_string(), Value::String(id));
            }
            items.push(record);
        }
        Self {
            entity: entity.into(),
            items: Mutex::new(items),
            latency: None,
        }
    }

    /// Create a mock service from JSON values (non-objects are skipped)
    pub fn from_values(entity: impl Into<String>, seed: impl IntoIterator<Item = Value>) -> Self {
        let records = seed
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        Self::new(entity, records)
    }

    /// Simulate I/O latency on every call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = (!latency.is_zero()).then_some(latency);
        self
    }

    /// Entity name used in not-found errors
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Copy of the current list
    pub async fn snapshot(&self) -> Vec<Record> {
        self.items.lock().await.clone()
    }

    /// Number of records held
    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    /// Check if no record is held
    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }

    async fn simulate_io(&self) {
        match self.latency {
            Some(latency) => tokio::time::sleep(latency).await,
            None => tokio::task::yield_now().await,
        }
    }
}

#[async_trait]
impl CrudService for MockService {
    async fn fetch_items(&self, filters: &Filters) -> AdminResult<ListResponse> {
        let items = self.items.lock().await;
        self.simulate_io().await;

        let matched: Vec<&Record> = items.iter().filter(|r| record_matches(r, filters)).collect();
        let total = matched.len();

        let limit = filters
            .get(LIMIT_KEY)
            .and_then(|l| l.parse::<usize>().ok())
            .filter(|l| *l > 0);
        let page = filters
            .get(PAGE_KEY)
            .and_then(|p| p.parse::<usize>().ok())
            .unwrap_or(1)
            .max(1);

        let (data, total_pages) = match limit {
            Some(limit) => {
                // A page past the addressable range is simply empty
                let offset = (page - 1).checked_mul(limit).unwrap_or(usize::MAX);
                let data = matched
                    .into_iter()
                    .skip(offset)
                    .take(limit)
                    .cloned()
                    .collect();
                (data, total.div_ceil(limit))
            }
            None => (
                matched.into_iter().cloned().collect(),
                usize::from(total > 0),
            ),
        };

        tracing::debug!(entity = %self.entity, total, "mock list");
        Ok(ListResponse::new(data).with_meta(total as u64, total_pages as u64))
    }

    async fn create_item(&self, mut data: Record) -> AdminResult<Record> {
        let mut items = self.items.lock().await;
        self.simulate_io().await;

        let id = fresh_id(&items);
        data.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        items.push(data.clone());

        tracing::debug!(entity = %self.entity, %id, "mock create");
        Ok(data)
    }

    async fn update_item(&self, id: &str, data: Record) -> AdminResult<Record> {
        let mut items = self.items.lock().await;
        self.simulate_io().await;

        let record = items
            .iter_mut()
            .find(|r| record_id(r).as_deref() == Some(id))
            .ok_or_else(|| AdminError::not_found(&self.entity, id))?;
        for (key, value) in data {
            if key != ID_FIELD {
                record.insert(key, value);
            }
        }

        tracing::debug!(entity = %self.entity, %id, "mock update");
        Ok(record.clone())
    }

    async fn delete_item(&self, id: &str) -> AdminResult<()> {
        let mut items = self.items.lock().await;
        self.simulate_io().await;

        let index = items
            .iter()
            .position(|r| record_id(r).as_deref() == Some(id))
            .ok_or_else(|| AdminError::not_found(&self.entity, id))?;
        items.remove(index);

        tracing::debug!(entity = %self.entity, %id, "mock delete");
        Ok(())
    }
}

/// Generate an identity not used by any record
fn fresh_id(items: &[Record]) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !items.iter().any(|r| record_id(r).as_deref() == Some(id.as_str())) {
            return id;
        }
    }
}

/// Equality match on every non-reserved filter, plus text search
fn record_matches(record: &Record, filters: &Filters) -> bool {
    filters.iter().all(|(key, expected)| match key {
        PAGE_KEY | LIMIT_KEY => true,
        SEARCH_KEY => {
            let needle = expected.to_lowercase();
            needle.is_empty()
                || record.values().any(|v| {
                    v.as_str()
                        .is_some_and(|s| s.to_lowercase().contains(&needle))
                })
        }
        _ => match record.get(key) {
            Some(Value::Array(items)) => items.iter().any(|v| value_to_text(v) == expected),
            Some(value) => value_to_text(value) == expected,
            None => false,
        },
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::ListMeta;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn routes() -> MockService {
        MockService::from_values(
            "Route",
            [
                json!({"id": "r1", "name": "Paris - Lyon", "active": true}),
                json!({"id": "r2", "name": "Lyon - Marseille", "active": false}),
                json!({"id": "r3", "name": "Paris - Lille", "active": true}),
            ],
        )
    }

    #[tokio::test]
    async fn test_seed_without_ids_gets_ids() {
        let svc = MockService::from_values("Tag", [json!({"name": "a"}), json!({"name": "b"})]);
        let items = svc.snapshot().await;
        let ids: Vec<_> = items.iter().filter_map(record_id).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn test_create_twice_yields_distinct_ids() {
        let svc = routes();
        let a = svc.create_item(record(json!({"name": "A"}))).await.unwrap();
        let b = svc.create_item(record(json!({"name": "B"}))).await.unwrap();
        assert_ne!(record_id(&a), record_id(&b));
        assert_eq!(svc.len().await, 5);
    }

    #[tokio::test]
    async fn test_create_ignores_client_id() {
        let svc = routes();
        let created = svc
            .create_item(record(json!({"id": "r1", "name": "dup"})))
            .await
            .unwrap();
        assert_ne!(record_id(&created).as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn test_delete_existing_and_unknown() {
        let svc = routes();
        svc.delete_item("r2").await.unwrap();
        assert_eq!(svc.len().await, 2);

        let err = svc.delete_item("nope").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(svc.len().await, 2);
    }

    #[tokio::test]
    async fn test_update_merges_only_given_fields() {
        let svc = routes();
        let before = svc.snapshot().await[0].clone();
        let after = svc
            .update_item("r1", record(json!({"active": false, "id": "hijack"})))
            .await
            .unwrap();

        assert_eq!(after["active"], json!(false));
        assert_eq!(after["id"], before["id"]);
        assert_eq!(after["name"], before["name"]);
        assert_eq!(after.len(), before.len());

        let err = svc
            .update_item("missing", record(json!({"active": true})))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fetch_filters_and_search() {
        let svc = routes();
        let active = svc
            .fetch_items(&Filters::new().with("active", "true"))
            .await
            .unwrap();
        assert_eq!(active.ids(), vec!["r1", "r3"]);

        let found = svc
            .fetch_items(&Filters::new().with("search", "LYON"))
            .await
            .unwrap();
        assert_eq!(found.ids(), vec!["r1", "r2"]);

        let none = svc
            .fetch_items(&Filters::new().with("depot", "x"))
            .await
            .unwrap();
        assert!(none.is_empty());
        assert_eq!(none.meta.unwrap().total_pages, 0);
    }

    #[tokio::test]
    async fn test_fetch_paging() {
        let svc = routes();
        let page = svc
            .fetch_items(&Filters::new().with("limit", "2").with("page", "2"))
            .await
            .unwrap();
        assert_eq!(page.ids(), vec!["r3"]);
        assert_eq!(
            page.meta,
            Some(ListMeta {
                total: 3,
                total_pages: 2
            })
        );

        let all = svc.fetch_items(&Filters::new()).await.unwrap();
        assert_eq!(all.meta.unwrap().total_pages, 1);
    }

    #[tokio::test]
    async fn test_fetch_page_beyond_range_is_empty() {
        let svc = routes();
        let huge = usize::MAX.to_string();
        let page = svc
            .fetch_items(&Filters::new().with("limit", "2").with("page", huge.as_str()))
            .await
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(
            page.meta,
            Some(ListMeta {
                total: 3,
                total_pages: 2
            })
        );

        let far = svc
            .fetch_items(&Filters::new().with("limit", huge.as_str()).with("page", "3"))
            .await
            .unwrap();
        assert!(far.is_empty());
    }

    #[tokio::test]
    async fn test_array_field_filter_matches_element() {
        let svc = MockService::from_values(
            "Driver",
            [json!({"id": "d1", "licenses": ["B", "D"]}), json!({"id": "d2", "licenses": ["B"]})],
        );
        let list = svc
            .fetch_items(&Filters::new().with("licenses", "D"))
            .await
            .unwrap();
        assert_eq!(list.ids(), vec!["d1"]);
    }

    #[tokio::test]
    async fn test_concurrent_creates_complete_in_issue_order() {
        let svc = std::sync::Arc::new(routes().with_latency(Duration::from_millis(5)));
        let (a, b) = tokio::join!(
            svc.create_item(record(json!({"name": "first"}))),
            svc.create_item(record(json!({"name": "second"}))),
        );
        a.unwrap();
        b.unwrap();
        let names: Vec<_> = svc
            .snapshot()
            .await
            .iter()
            .map(|r| r["name"].clone())
            .collect();
        assert_eq!(names[3], json!("first"));
        assert_eq!(names[4], json!("second"));
    }
}
