//! Envelope response format for all API responses.
//!
//! Every response is wrapped in a consistent envelope:
//! ```json
//! {
//!   "data": { ... },
//!   "meta": { "request_id": "...", "timestamp": "...", "response_time_ms": 5 },
//!   "errors": [],
//!   "_links": { "self": "..." }
//! }
//! ```

use std::collections::HashMap;
use std::time::Instant;

use serde::Serialize;

/// Envelope response wrapping all API data.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// The main response payload. Serialized as `null` on error.
    pub data: Option<T>,

    pub meta: ApiMeta,

    /// Error list (empty on success).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiErrorDetail>,

    /// Links to related resources.
    #[serde(rename = "_links", skip_serializing_if = "HashMap::is_empty")]
    pub links: HashMap<String, String>,
}

/// Metadata included in every response.
#[derive(Debug, Serialize)]
pub struct ApiMeta {
    pub request_id: String,
    /// RFC 3339 timestamp of the response.
    pub timestamp: String,
    pub response_time_ms: u64,
}

/// Individual error detail.
#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    pub message: String,
}

/// Request id and start time captured at the top of each handler.
pub struct RequestMeta {
    pub request_id: String,
    start: Instant,
}

impl RequestMeta {
    pub fn start() -> Self {
        Self {
            request_id: uuid::Uuid::now_v7().to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl ApiMeta {
    fn new(request_id: String, response_time_ms: u64) -> Self {
        Self {
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
            response_time_ms,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response with data.
    pub fn success(data: T, meta: &RequestMeta) -> Self {
        Self {
            data: Some(data),
            meta: ApiMeta::new(meta.request_id.clone(), meta.elapsed_ms()),
            errors: Vec::new(),
            links: HashMap::new(),
        }
    }

    /// Add a link to a related resource.
    pub fn with_link(mut self, rel: &str, href: impl Into<String>) -> Self {
        self.links.insert(rel.to_string(), href.into());
        self
    }
}

impl ApiResponse<()> {
    /// Create an error response (no data).
    pub fn error(code: &str, message: impl Into<String>, request_id: String) -> Self {
        Self {
            data: None,
            meta: ApiMeta::new(request_id, 0),
            errors: vec![ApiErrorDetail {
                code: code.to_string(),
                message: message.into(),
            }],
            links: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let meta = RequestMeta::start();
        let resp = ApiResponse::success(serde_json::json!({"message": "hi"}), &meta)
            .with_link("self", "/api/v1/agents/1");

        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["data"]["message"], "hi");
        assert_eq!(value["meta"]["request_id"], meta.request_id.as_str());
        assert_eq!(value["_links"]["self"], "/api/v1/agents/1");
        assert!(value.get("errors").is_none());
    }

    #[test]
    fn test_error_envelope_shape() {
        let resp = ApiResponse::error("NOT_FOUND", "agent 7", "req-1".to_string());

        let value = serde_json::to_value(&resp).unwrap();
        assert!(value["data"].is_null());
        assert_eq!(value["errors"][0]["code"], "NOT_FOUND");
        assert_eq!(value["errors"][0]["message"], "agent 7");
        assert_eq!(value["meta"]["request_id"], "req-1");
        assert!(value.get("_links").is_none());
    }
}
