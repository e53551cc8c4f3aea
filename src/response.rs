//! Normalized JSON success/error envelopes.
//!
//! Every API response body has the same shape:
//!
//! ```json
//! {"status": "success", "status_code": 200, "message": "...", "data": {...}}
//! ```
//!
//! `data` is omitted when there is nothing to send. The body travels with the
//! transport status code in a [`JsonResponse`], which any HTTP framework can
//! turn into its own response type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome label carried in the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// `"success"`
    Success,
    /// `"failed"`
    Failed,
}

/// The JSON body of a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    /// Success or failure.
    pub status: ResponseStatus,
    /// Mirrors the transport status code.
    pub status_code: u16,
    /// Human-readable message.
    pub message: String,
    /// Optional payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

/// A response body paired with the status code to send it with.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonResponse {
    status_code: u16,
    body: ResponseBody,
}

impl JsonResponse {
    fn new(
        status: ResponseStatus,
        message: impl Into<String>,
        status_code: u16,
        data: Option<Map<String, Value>>,
    ) -> Self {
        Self {
            status_code,
            body: ResponseBody {
                status,
                status_code,
                message: message.into(),
                data: data.filter(|d| !d.is_empty()),
            },
        }
    }

    /// The transport status code.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// The body.
    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// Consume the response, returning the body.
    pub fn into_body(self) -> ResponseBody {
        self.body
    }

    /// The body as a JSON value.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(&self.body)
    }

    /// The body serialized to a JSON string.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.body)
    }
}

/// Build a success envelope.
///
/// ```rust
/// use quas_utils::success_response;
/// use serde_json::{json, Map};
///
/// let mut data = Map::new();
/// data.insert("id".into(), json!(7));
///
/// let resp = success_response("created", 201, Some(data));
/// assert_eq!(resp.status_code(), 201);
/// assert_eq!(
///     resp.to_value().unwrap(),
///     json!({"status": "success", "status_code": 201, "message": "created", "data": {"id": 7}})
/// );
/// ```
pub fn success_response(
    message: impl Into<String>,
    status_code: u16,
    data: Option<Map<String, Value>>,
) -> JsonResponse {
    JsonResponse::new(ResponseStatus::Success, message, status_code, data)
}

/// Build an error envelope.
///
/// ```rust
/// use quas_utils::error_response;
/// use serde_json::json;
///
/// let resp = error_response("not found", 404, None);
/// assert_eq!(
///     resp.to_value().unwrap(),
///     json!({"status": "failed", "status_code": 404, "message": "not found"})
/// );
/// ```
pub fn error_response(
    message: impl Into<String>,
    status_code: u16,
    data: Option<Map<String, Value>>,
) -> JsonResponse {
    JsonResponse::new(ResponseStatus::Failed, message, status_code, data)
}
