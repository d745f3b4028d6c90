//! Shared HTTP response helpers for the remote binding.
//!
//! Centralizes status-code checks (non-success → [`AdminError::Http`]) and
//! the list-shape normalization so the binding itself stays focused on
//! request construction.

use forge_core::{AdminError, AdminResult, ListMeta, ListResponse, Record};
use serde_json::Value;

/// Map a transport failure (no status received) to an admin error
pub fn transport(err: reqwest::Error) -> AdminError {
    AdminError::Transport(err.to_string())
}

/// Check an HTTP response for a non-success status.
///
/// Returns the response unchanged on success. Otherwise the error message
/// is the JSON body's `message` (or `error`) field when present, the raw
/// body when not, and the canonical reason phrase for an empty body.
pub async fn check_response(resp: reqwest::Response) -> AdminResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(AdminError::Http {
        status: status.as_u16(),
        message: error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string()),
    })
}

fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(Value::String(msg)) = map.get(key) {
                return Some(msg.clone());
            }
        }
    }
    Some(body.to_string())
}

/// Read a response body as JSON
pub async fn read_json(resp: reqwest::Response) -> AdminResult<Value> {
    let body = resp.text().await.map_err(transport)?;
    serde_json::from_str(&body).map_err(|e| AdminError::Decode(e.to_string()))
}

/// Normalize a list response into the canonical envelope.
///
/// Accepts a bare array of records or a `{ data, meta? }` envelope.
pub fn normalize_list(value: Value) -> AdminResult<ListResponse> {
    match value {
        Value::Array(items) => Ok(ListResponse::new(records(items)?)),
        Value::Object(mut map) => {
            let Some(Value::Array(items)) = map.remove("data") else {
                return Err(AdminError::Decode(
                    "expected an array or a { data, meta } envelope".to_string(),
                ));
            };
            let meta = match map.remove("meta") {
                None | Some(Value::Null) => None,
                Some(raw) => match serde_json::from_value::<ListMeta>(raw) {
                    Ok(meta) => Some(meta),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring malformed list meta");
                        None
                    }
                },
            };
            Ok(ListResponse {
                data: records(items)?,
                meta,
            })
        }
        other => Err(AdminError::Decode(format!(
            "expected a list, got {}",
            json_type(&other)
        ))),
    }
}

/// Normalize a single-record response (bare record or `{ data: record }`)
pub fn normalize_record(value: Value) -> AdminResult<Record> {
    match value {
        Value::Object(mut map) => {
            if !map.contains_key("id") {
                if let Some(Value::Object(inner)) = map.remove("data") {
                    return Ok(inner);
                }
            }
            Ok(map)
        }
        other => Err(AdminError::Decode(format!(
            "expected a record, got {}",
            json_type(&other)
        ))),
    }
}

fn records(items: Vec<Value>) -> AdminResult<Vec<Record>> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(map),
            other => Err(AdminError::Decode(format!(
                "expected list items to be records, got {}",
                json_type(&other)
            ))),
        })
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn mock_response(status: u16, body: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body.to_string())
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_check_response_success() {
        let resp = mock_response(200, "[]");
        assert!(check_response(resp).await.is_ok());
    }

    #[tokio::test]
    async fn test_check_response_uses_json_message() {
        let resp = mock_response(422, r#"{"message":"name already taken"}"#);
        let err = check_response(resp).await.unwrap_err();
        match err {
            AdminError::Http { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "name already taken");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_check_response_empty_body_uses_reason() {
        let resp = mock_response(404, "");
        let err = check_response(resp).await.unwrap_err();
        assert!(matches!(err, AdminError::Http { status: 404, ref message } if message == "Not Found"));
    }

    #[tokio::test]
    async fn test_check_response_plain_text_body() {
        let resp = mock_response(500, "boom");
        let err = check_response(resp).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP error (500): boom");
    }

    #[tokio::test]
    async fn test_read_json_rejects_garbage() {
        let resp = mock_response(200, "<html>");
        assert!(matches!(read_json(resp).await, Err(AdminError::Decode(_))));
    }

    #[test]
    fn test_normalize_bare_array() {
        let list = normalize_list(json!([{"id": "1"}, {"id": "2"}])).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.meta.is_none());
    }

    #[test]
    fn test_normalize_envelope_with_meta() {
        let list = normalize_list(json!({
            "data": [{"id": "1"}],
            "meta": {"total": 11, "totalPages": 2}
        }))
        .unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.meta, Some(ListMeta { total: 11, total_pages: 2 }));
    }

    #[test]
    fn test_normalize_keeps_data_when_meta_malformed() {
        let list = normalize_list(json!({
            "data": [{"id": "1"}, {"id": "2"}],
            "meta": {"count": "many"}
        }))
        .unwrap();
        assert_eq!(list.ids(), vec!["1", "2"]);
        assert!(list.meta.is_none());
    }

    #[test]
    fn test_normalize_rejects_other_shapes() {
        assert!(normalize_list(json!({"items": []})).is_err());
        assert!(normalize_list(json!("nope")).is_err());
        assert!(normalize_list(json!([1, 2])).is_err());
    }

    #[test]
    fn test_normalize_record_unwraps_data() {
        let rec = normalize_record(json!({"data": {"id": "9", "name": "x"}})).unwrap();
        assert_eq!(rec["id"], json!("9"));
        let bare = normalize_record(json!({"id": "9", "data": {"a": 1}})).unwrap();
        assert_eq!(bare["data"], json!({"a": 1}));
    }
}
