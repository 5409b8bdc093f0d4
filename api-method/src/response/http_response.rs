use std::collections::BTreeMap;

use bytes::Bytes;
use serde_json::Value;

use crate::error::{DecodeError, TransportError};

/// A raw HTTP response, detached from the client library that produced it.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response headers with lowercase names.
    pub headers: BTreeMap<String, String>,
    /// Media type from the `content-type` header, e.g. `application/json`.
    pub content_type: Option<String>,
    /// Raw body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Creates a response with the given status and body.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
            ..Self::default()
        }
    }

    /// Creates a JSON response from a value.
    pub fn json_body(status: u16, value: &Value) -> Self {
        Self {
            content_type: Some("application/json".to_string()),
            ..Self::new(status, value.to_string())
        }
    }

    /// Adds a header, keeping `content_type` in sync.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        let name = name.as_ref().to_ascii_lowercase();
        let value = value.into();
        if name == "content-type" {
            self.content_type = Some(media_type(&value));
        }
        self.headers.insert(name, value);
        self
    }

    /// Returns `true` for any status below 400.
    pub fn is_success(&self) -> bool {
        self.status < 400
    }

    /// Decodes the body as a JSON value.
    ///
    /// ## Errors
    ///
    /// Returns [`DecodeError::InvalidJson`] if the body is not valid JSON.
    pub fn json(&self) -> Result<Value, DecodeError> {
        serde_json::from_slice(&self.body).map_err(DecodeError::InvalidJson)
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Reads a `reqwest` response to completion.
    ///
    /// ## Errors
    ///
    /// Returns [`TransportError::Request`] if the body cannot be read.
    pub async fn from_reqwest(response: reqwest::Response) -> Result<Self, TransportError> {
        let status = response.status().as_u16();
        let mut converted = Self::new(status, Bytes::new());
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                converted = converted.with_header(name.as_str(), value);
            }
        }
        converted.body = response.bytes().await?;
        Ok(converted)
    }
}

fn media_type(header: &str) -> String {
    header
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_means_below_400() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(302, "").is_success());
        assert!(!HttpResponse::new(400, "").is_success());
        assert!(!HttpResponse::new(503, "").is_success());
    }

    #[test]
    fn json_decodes_body() {
        let response = HttpResponse::json_body(200, &json!({"a": [1, 2]}));
        assert_eq!(response.json().unwrap(), json!({"a": [1, 2]}));
        assert_eq!(response.content_type.as_deref(), Some("application/json"));
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        let response = HttpResponse::new(200, "not json");
        assert!(matches!(response.json(), Err(DecodeError::InvalidJson(_))));
    }

    #[test]
    fn content_type_header_sets_media_type() {
        let response = HttpResponse::new(200, "")
            .with_header("Content-Type", "Application/JSON; charset=utf-8");
        assert_eq!(response.content_type.as_deref(), Some("application/json"));
        assert!(response.headers.contains_key("content-type"));
    }

    #[test]
    fn text_is_lossy() {
        let response = HttpResponse::new(200, vec![b'h', b'i', 0xff]);
        assert_eq!(response.text(), "hi\u{fffd}");
    }
}
