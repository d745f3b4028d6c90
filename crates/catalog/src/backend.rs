//! Where entity services get their data

use forge_core::{AdminError, AdminResult};
use forge_service::{CrudService, MockService, RemoteService};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Data source for every catalog entity
#[derive(Debug, Clone)]
pub enum Backend {
    /// In-memory lists seeded per entity
    Mock { latency: Option<Duration> },
    /// REST resources under `base_url`, one per entity (`{base_url}/{resource}`)
    Remote {
        base_url: String,
        http: reqwest::Client,
    },
}

impl Default for Backend {
    fn default() -> Self {
        Backend::mock()
    }
}

impl Backend {
    pub fn mock() -> Self {
        Backend::Mock { latency: None }
    }

    /// Mock backend whose calls each take `latency`
    pub fn mock_with_latency(latency: Duration) -> Self {
        Backend::Mock {
            latency: (!latency.is_zero()).then_some(latency),
        }
    }

    /// Remote backend sharing one HTTP client across resources
    pub fn remote(base_url: impl Into<String>, timeout: Duration) -> AdminResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdminError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Backend::Remote {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, Backend::Mock { .. })
    }

    /// Service for one resource; mock lists start from `seed`
    pub fn service(&self, resource: &str, entity: &str, seed: Vec<Value>) -> Arc<dyn CrudService> {
        match self {
            Backend::Mock { latency } => {
                let mock = MockService::from_values(entity, seed);
                let mock = match latency {
                    Some(latency) => mock.with_latency(*latency),
                    None => mock,
                };
                Arc::new(mock)
            }
            Backend::Remote { base_url, http } => Arc::new(RemoteService::with_client(
                http.clone(),
                format!("{base_url}/{resource}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::Filters;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_service_is_seeded() {
        let svc = Backend::mock().service("tags", "Tag", vec![json!({"name": "a"})]);
        let list = svc.fetch_items(&Filters::new()).await.unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_remote_base_url_trimmed() {
        let backend = Backend::remote("http://localhost:3000/api/", Duration::from_secs(5)).unwrap();
        match backend {
            Backend::Remote { base_url, .. } => assert_eq!(base_url, "http://localhost:3000/api"),
            Backend::Mock { .. } => panic!("expected remote backend"),
        }
    }

    #[test]
    fn test_zero_latency_is_none() {
        assert!(matches!(
            Backend::mock_with_latency(Duration::ZERO),
            Backend::Mock { latency: None }
        ));
    }
}
