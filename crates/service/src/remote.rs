//! Remote binding: a CRUD service over a REST resource
//!
//! `GET base?filters`, `POST base`, `PUT base/{id}`, `DELETE base/{id}`.
//! Bodies are the raw entity shape. Any non-success status surfaces as
//! [`AdminError::Http`]; nothing is retried.

use crate::http::{check_response, normalize_list, normalize_record, read_json, transport};
use crate::service::CrudService;
use async_trait::async_trait;
use forge_core::{AdminError, AdminResult, Filters, ListResponse, Record};
use std::time::Duration;

/// HTTP client bound to one resource base URL
#[derive(Debug, Clone)]
pub struct RemoteService {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteService {
    /// Create a remote service with a default client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a remote service sharing an existing client
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Create a remote service whose requests time out after `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> AdminResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdminError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(http, base_url))
    }

    /// The resource base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of one record
    pub fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(id))
    }
}

#[async_trait]
impl CrudService for RemoteService {
    async fn fetch_items(&self, filters: &Filters) -> AdminResult<ListResponse> {
        tracing::debug!(url = %self.base_url, filters = filters.len(), "GET list");
        let resp = self
            .http
            .get(&self.base_url)
            .query(filters)
            .send()
            .await
            .map_err(transport)?;
        let body = read_json(check_response(resp).await?).await?;
        normalize_list(body)
    }

    async fn create_item(&self, data: Record) -> AdminResult<Record> {
        tracing::debug!(url = %self.base_url, "POST record");
        let resp = self
            .http
            .post(&self.base_url)
            .json(&data)
            .send()
            .await
            .map_err(transport)?;
        normalize_record(read_json(check_response(resp).await?).await?)
    }

    async fn update_item(&self, id: &str, data: Record) -> AdminResult<Record> {
        let url = self.item_url(id);
        tracing::debug!(%url, "PUT record");
        let resp = self
            .http
            .put(&url)
            .json(&data)
            .send()
            .await
            .map_err(transport)?;
        normalize_record(read_json(check_response(resp).await?).await?)
    }

    async fn delete_item(&self, id: &str) -> AdminResult<()> {
        let url = self.item_url(id);
        tracing::debug!(%url, "DELETE record");
        let resp = self.http.delete(&url).send().await.map_err(transport)?;
        check_response(resp).await?;
        Ok(())
    }
}
