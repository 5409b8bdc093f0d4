//! Client configuration.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::error::ConfigError;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the base URL.
pub const BASE_URL_ENV: &str = "API_METHOD_BASE_URL";

/// Environment variable holding the timeout in whole seconds.
pub const TIMEOUT_ENV: &str = "API_METHOD_TIMEOUT_SECS";

/// Settings used to create a [`ReqwestTransport`](super::ReqwestTransport).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Option<Url>,
    timeout: Duration,
    default_headers: HeaderMap,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: HeaderMap::new(),
        }
    }
}

impl ClientConfig {
    /// Starts a configuration with defaults: no base URL, 30 second timeout.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Reads `API_METHOD_BASE_URL` and `API_METHOD_TIMEOUT_SECS`.
    ///
    /// Unset variables keep their defaults.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] or [`ConfigError::InvalidEnv`]
    /// for values that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut builder = Self::builder();

        if let Some(url) = lookup(BASE_URL_ENV) {
            builder = builder.base_url(&url)?;
        }
        if let Some(secs) = lookup(TIMEOUT_ENV) {
            let parsed = secs.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnv {
                var: TIMEOUT_ENV,
                value: secs.clone(),
            })?;
            builder = builder.timeout(Duration::from_secs(parsed));
        }

        Ok(builder.build())
    }

    /// Base URL relative endpoints are joined onto.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Headers added to every request.
    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Sets the base URL.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if `url` does not parse.
    pub fn base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: url.to_string(),
            source,
        })?;
        self.config.base_url = Some(parsed);
        Ok(self)
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Adds a default header to all requests.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::InvalidHeader`] if the name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidHeader {
            name: name.as_ref().to_string(),
            reason,
        };
        let header_name =
            HeaderName::try_from(name.as_ref()).map_err(|e| invalid(e.to_string()))?;
        let header_value =
            HeaderValue::try_from(value.as_ref()).map_err(|e| invalid(e.to_string()))?;
        self.config.default_headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Finishes the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
