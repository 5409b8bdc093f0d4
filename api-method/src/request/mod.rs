//! The transport-agnostic request descriptor.
//!
//! A [`Request`] is what [`ApiMethod::build_request`](crate::ApiMethod::build_request)
//! produces and what a [`Transport`](crate::client::Transport) consumes. At most one
//! of `params`, `data` and `json_payload` is populated.

mod url_template;

pub use url_template::format_url;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RequestError;
use crate::method::RestMethod;

/// Top-level key that survives falsy pruning even when empty.
const HEADERS_KEY: &str = "headers";

/// A request ready to be handed to a transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Endpoint after URL template substitution.
    pub endpoint: String,
    /// HTTP verb.
    #[serde(default)]
    pub http_method: RestMethod,
    /// Query parameters (GET only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
    /// Flat body fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    /// Templated JSON body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_payload: Option<Map<String, Value>>,
    /// Request headers.
    #[serde(default)]
    pub headers: Map<String, Value>,
}

impl Request {
    /// Assembles a request from its raw key/value form.
    ///
    /// Every top-level key whose value is falsy (see [`is_falsy`]) is dropped
    /// first; `headers` is exempt.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use api_method::Request;
    /// use serde_json::json;
    ///
    /// let request = Request::from_value(json!({
    ///     "endpoint": "/x",
    ///     "params": {},
    ///     "data": null,
    ///     "headers": {"H": "1"},
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(request.endpoint, "/x");
    /// assert!(request.params.is_none());
    /// assert!(request.data.is_none());
    /// assert_eq!(request.headers["H"], "1");
    /// ```
    ///
    /// ## Errors
    ///
    /// Returns [`RequestError::NotAnObject`] if `value` is not an object and
    /// [`RequestError::Serialize`] if the remaining keys do not form a request.
    pub fn from_value(value: Value) -> Result<Self, RequestError> {
        let Value::Object(mut raw) = value else {
            return Err(RequestError::NotAnObject { method: "Request" });
        };
        prune_falsy(&mut raw);
        Ok(serde_json::from_value(Value::Object(raw))?)
    }

    /// Returns `true` if the request carries any body.
    pub fn has_body(&self) -> bool {
        self.data.is_some() || self.json_payload.is_some()
    }
}

/// Returns `true` for `null`, empty objects, empty arrays and empty strings.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn prune_falsy(raw: &mut Map<String, Value>) {
    raw.retain(|key, value| key == HEADERS_KEY || !is_falsy(value));
}
