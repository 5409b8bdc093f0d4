//! Transport contract and the stock `reqwest` implementation.
//!
//! A [`Transport`] executes [`Request`] descriptors and hands back raw
//! [`HttpResponse`]s; it does not judge status codes. Judging is the job of
//! each method's validation hook.

use std::future::Future;
use std::pin::Pin;

use reqwest::header::{HeaderName, HeaderValue};
use serde_json::{Map, Value};
use tracing::{instrument, Span};
use url::Url;

use super::ClientConfig;
use crate::error::TransportError;
use crate::request::Request;
use crate::response::HttpResponse;

/// Boxed future type for async trait methods.
///
/// This type alias provides dyn-compatible async method returns.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Executes requests over HTTP.
///
/// This trait is dyn-compatible (object-safe) by using boxed futures.
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the raw response, whatever its status.
    fn send<'a>(
        &'a self,
        request: &'a Request,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>>;

    /// Releases the resources held by the transport.
    fn shutdown(&self) -> BoxFuture<'_, ()>;
}

/// [`Transport`] backed by a pooled `reqwest::Client`.
///
/// ## Examples
///
/// ```rust,ignore
/// use api_method::client::{ClientConfig, ReqwestTransport, Transport};
///
/// let config = ClientConfig::builder().base_url("https://api.example.com")?.build();
/// let transport = ReqwestTransport::new(&config)?;
/// let response = transport.send(&request).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl ReqwestTransport {
    /// Creates a transport from `config`.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(config.default_headers().clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().cloned(),
        })
    }

    /// Returns the base URL relative endpoints are joined onto.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Resolves an endpoint into a full URL.
    ///
    /// Absolute endpoints are used as-is; relative ones need a base URL.
    ///
    /// ## Errors
    ///
    /// Returns [`TransportError::InvalidEndpoint`] if the endpoint is relative
    /// and no base URL is configured, or if joining fails.
    pub fn resolve(&self, endpoint: &str) -> Result<Url, TransportError> {
        let invalid = |reason: String| TransportError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };

        match Url::parse(endpoint) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = self
                    .base_url
                    .as_ref()
                    .ok_or_else(|| invalid("relative endpoint and no base URL configured".into()))?;
                base.join(endpoint).map_err(|e| invalid(e.to_string()))
            }
            Err(e) => Err(invalid(e.to_string())),
        }
    }

    #[instrument(
        name = "api_request",
        skip(self, request),
        fields(
            http.method = %request.http_method,
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    async fn execute(&self, request: &Request) -> Result<HttpResponse, TransportError> {
        let url = self.resolve(&request.endpoint)?;
        Span::current().record("http.url", url.as_str());

        let mut builder = self.client.request(request.http_method.to_reqwest(), url);

        for (name, value) in &request.headers {
            let header_name = HeaderName::try_from(name.as_str())
                .map_err(|_| TransportError::InvalidHeader(name.clone()))?;
            let header_value = HeaderValue::try_from(scalar_text(value))
                .map_err(|_| TransportError::InvalidHeader(name.clone()))?;
            builder = builder.header(header_name, header_value);
        }

        if let Some(params) = &request.params {
            builder = builder.query(&pairs(params));
        }
        if let Some(data) = &request.data {
            builder = builder.form(&pairs(data));
        }
        if let Some(payload) = &request.json_payload {
            builder = builder.json(payload);
        }

        let response = builder.send().await?;
        let status = response.status();
        Span::current().record("http.status_code", status.as_u16());

        let otel_status = if status.is_server_error() {
            "ERROR"
        } else if status.is_success() {
            "OK"
        } else {
            "UNSET"
        };
        Span::current().record("otel.status_code", otel_status);

        HttpResponse::from_reqwest(response).await
    }
}

impl Transport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: &'a Request,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(self.execute(request))
    }

    fn shutdown(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            // reqwest closes pooled connections when the last client handle drops.
            tracing::debug!(base_url = ?self.base_url, "reqwest transport shut down");
        })
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn pairs(fields: &Map<String, Value>) -> Vec<(&str, String)> {
    fields
        .iter()
        .map(|(key, value)| (key.as_str(), scalar_text(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::RestMethod;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport_for(server: &MockServer) -> ReqwestTransport {
        let config = ClientConfig::builder()
            .base_url(&server.uri())
            .unwrap()
            .build();
        ReqwestTransport::new(&config).unwrap()
    }

    fn request(value: Value) -> Request {
        Request::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn get_sends_params_as_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/42"))
            .and(query_param("name", "ann"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42})))
            .mount(&mock_server)
            .await;

        let transport = transport_for(&mock_server);
        let response = transport
            .send(&request(json!({
                "endpoint": "/users/42",
                "http_method": "GET",
                "params": {"name": "ann", "page": 2},
            })))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.json().unwrap(), json!({"id": 42}));
        assert_eq!(response.content_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn post_sends_data_as_form() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/personal/webhook"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("webHookUrl=https%3A%2F%2Fhooks.example.com"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let transport = transport_for(&mock_server);
        let response = transport
            .send(&request(json!({
                "endpoint": "/personal/webhook",
                "http_method": "POST",
                "data": {"webHookUrl": "https://hooks.example.com"},
            })))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn post_sends_json_payload_and_headers() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/merchant/invoice"))
            .and(header("x-token", "secret"))
            .and(body_json(json!({"amount": 4200, "ccy": 980})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"invoiceId": "i-1"})))
            .mount(&mock_server)
            .await;

        let transport = transport_for(&mock_server);
        let response = transport
            .send(&request(json!({
                "endpoint": "/merchant/invoice",
                "http_method": "POST",
                "json_payload": {"amount": 4200, "ccy": 980},
                "headers": {"X-Token": "secret"},
            })))
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(response.json().unwrap()["invoiceId"], "i-1");
    }

    #[tokio::test]
    async fn error_statuses_are_returned_not_raised() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        let transport = transport_for(&mock_server);
        let response = transport
            .send(&request(json!({"endpoint": "/broken", "http_method": "DELETE"})))
            .await
            .unwrap();

        assert_eq!(response.status, 500);
        assert!(!response.is_success());
        assert_eq!(response.text(), "Internal Server Error");
    }

    #[tokio::test]
    async fn absolute_endpoint_ignores_base_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/bank/currency"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&mock_server)
            .await;

        let transport = ReqwestTransport::new(&ClientConfig::default()).unwrap();
        let endpoint = format!("{}/bank/currency", mock_server.uri());
        let response = transport
            .send(&request(json!({"endpoint": endpoint})))
            .await
            .unwrap();

        assert_eq!(response.json().unwrap(), json!([]));
    }

    #[tokio::test]
    async fn default_headers_are_sent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/with-header"))
            .and(header("x-custom-header", "custom-value"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let config = ClientConfig::builder()
            .base_url(&mock_server.uri())
            .unwrap()
            .timeout(Duration::from_secs(5))
            .default_header("X-Custom-Header", "custom-value")
            .unwrap()
            .build();
        let transport = ReqwestTransport::new(&config).unwrap();

        let response = transport
            .send(&request(json!({"endpoint": "/with-header"})))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
    }

    #[test]
    fn relative_endpoint_needs_base_url() {
        let transport = ReqwestTransport::new(&ClientConfig::default()).unwrap();
        assert!(matches!(
            transport.resolve("/users/1"),
            Err(TransportError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn relative_endpoint_is_joined() {
        let config = ClientConfig::builder()
            .base_url("https://api.example.com")
            .unwrap()
            .build();
        let transport = ReqwestTransport::new(&config).unwrap();
        assert_eq!(
            transport.resolve("/users/1").unwrap().as_str(),
            "https://api.example.com/users/1"
        );
        assert_eq!(transport.base_url().unwrap().as_str(), "https://api.example.com/");
    }

    #[tokio::test]
    async fn invalid_header_name_is_rejected() {
        let mock_server = MockServer::start().await;
        let transport = transport_for(&mock_server);

        let mut req = request(json!({"endpoint": "/x"}));
        req.http_method = RestMethod::Get;
        req.headers.insert("bad header".into(), json!("v"));

        assert!(matches!(
            transport.send(&req).await,
            Err(TransportError::InvalidHeader(name)) if name == "bad header"
        ));
    }
}
