//! # Entity Query Hook
//!
//! Binds an entity config (or a bare endpoint) to the shared query cache
//! and a notifier.
//!
//! - `list(filters)` is cached under `(query key, filters)`
//! - `create`, `update` and `delete` invalidate every list under the query
//!   key on success and notify with the entity title; on failure they
//!   notify the error and leave the cache untouched
//!
//! Nothing is retried. Dropping a pending `list` future abandons the
//! fetch and nothing is cached; mutations should be awaited to completion.

use crate::config::{AdminEntityConfig, RecordTransform};
use crate::hooks::cache::{CacheEntry, QueryClient, QueryKey};
use crate::notify::{Notification, Notifier};
use forge_core::{AdminResult, Filters, ListResponse, Record};
use forge_service::{CrudService, RemoteService};
use heck::ToTitleCase;
use std::sync::Arc;

/// Mutation kinds, for notification wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

impl Mutation {
    fn past_tense(&self) -> &'static str {
        match self {
            Mutation::Create => "created",
            Mutation::Update => "updated",
            Mutation::Delete => "deleted",
        }
    }
}

/// List query and mutations for one entity
#[derive(Clone)]
pub struct EntityQuery {
    title: String,
    query_key: String,
    service: Arc<dyn CrudService>,
    /// Filters merged into every list call (the parent scope)
    scope: Filters,
    parse: Option<RecordTransform>,
    client: QueryClient,
    notifier: Arc<dyn Notifier>,
}

impl EntityQuery {
    /// Bind an entity config without a parent scope
    pub fn new(
        config: &AdminEntityConfig,
        client: QueryClient,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::bind(config, None, client, notifier)
    }

    /// Bind an entity config within a parent record
    ///
    /// Lists are filtered by the parent key, and parent-aware services
    /// receive the parent identifier on every call.
    pub fn within(
        config: &AdminEntityConfig,
        parent_id: &str,
        client: QueryClient,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::bind(config, Some(parent_id), client, notifier)
    }

    fn bind(
        config: &AdminEntityConfig,
        parent_id: Option<&str>,
        client: QueryClient,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let scope = parent_id
            .and_then(|pid| config.parent_filter(pid))
            .unwrap_or_default();
        Self {
            title: config.title.clone(),
            query_key: config.query_key.clone(),
            service: config.scoped_service(parent_id),
            scope,
            parse: config.parse_data.clone(),
            client,
            notifier,
        }
    }

    /// Bind a bare REST endpoint under `query_key`
    pub fn endpoint(
        base_url: impl Into<String>,
        query_key: impl Into<String>,
        client: QueryClient,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::from_service(Arc::new(RemoteService::new(base_url)), query_key, client, notifier)
    }

    /// Bind any service under `query_key`; the title derives from the key
    pub fn from_service(
        service: Arc<dyn CrudService>,
        query_key: impl Into<String>,
        client: QueryClient,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let query_key = query_key.into();
        Self {
            title: query_key.to_title_case(),
            query_key,
            service,
            scope: Filters::new(),
            parse: None,
            client,
            notifier,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn query_key(&self) -> &str {
        &self.query_key
    }

    fn cache_key(&self, filters: &Filters) -> QueryKey {
        let mut merged = filters.clone();
        for (key, value) in self.scope.iter() {
            merged.insert(key, value);
        }
        QueryKey::new(self.query_key.as_str(), merged)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// List records, served from the cache while it is fresh
    pub async fn list(&self, filters: &Filters) -> AdminResult<ListResponse> {
        let key = self.cache_key(filters);
        if let Some(cached) = self.client.get_fresh(&key) {
            tracing::debug!(query_key = %self.query_key, "cache hit");
            return Ok(cached);
        }
        self.fetch(key).await
    }

    /// List records bypassing the cache
    pub async fn refetch(&self, filters: &Filters) -> AdminResult<ListResponse> {
        self.fetch(self.cache_key(filters)).await
    }

    /// Cached entry for `filters`, fresh or stale
    pub fn cached(&self, filters: &Filters) -> Option<CacheEntry> {
        self.client.get(&self.cache_key(filters))
    }

    async fn fetch(&self, key: QueryKey) -> AdminResult<ListResponse> {
        let epoch = self.client.epoch(&self.query_key);
        let mut list = self
            .service
            .fetch_items(&key.filters)
            .await
            .inspect_err(|e| tracing::warn!(query_key = %self.query_key, error = %e, "fetch failed"))?;

        if let Some(parse) = &self.parse {
            list.data = list.data.into_iter().map(|r| parse.apply(r)).collect();
        }
        self.client.store(key, list.clone(), epoch);
        Ok(list)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub async fn create(&self, data: Record) -> AdminResult<Record> {
        let result = self.service.create_item(data).await;
        self.settle(Mutation::Create, result)
    }

    pub async fn update(&self, id: &str, data: Record) -> AdminResult<Record> {
        let result = self.service.update_item(id, data).await;
        self.settle(Mutation::Update, result)
    }

    pub async fn delete(&self, id: &str) -> AdminResult<()> {
        let result = self.service.delete_item(id).await;
        self.settle(Mutation::Delete, result)
    }

    fn settle<T>(&self, mutation: Mutation, result: AdminResult<T>) -> AdminResult<T> {
        match &result {
            Ok(_) => {
                self.client.invalidate(&self.query_key);
                self.notifier.notify(Notification::success(
                    &self.title,
                    format!("{} {}", self.title, mutation.past_tense()),
                ));
            }
            Err(e) => {
                self.notifier
                    .notify(Notification::error(&self.title, e.to_string()));
            }
        }
        result
    }
}

impl std::fmt::Debug for EntityQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityQuery")
            .field("title", &self.title)
            .field("query_key", &self.query_key)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
