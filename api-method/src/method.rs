//! HTTP verbs an API method can be declared with.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// HTTP method of a declared API operation.
///
/// Serializes (and displays) as the uppercase verb, which is also the form
/// carried by [`Request::http_method`](crate::Request).
///
/// ## Examples
///
/// ```rust
/// use api_method::RestMethod;
///
/// let method: RestMethod = "POST".parse().unwrap();
/// assert_eq!(method, RestMethod::Post);
/// assert!(method.allows_json_payload());
/// assert!(!RestMethod::Get.allows_json_payload());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum RestMethod {
    /// HTTP GET. Fields travel as query parameters.
    #[default]
    Get,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP PATCH.
    Patch,
    /// HTTP DELETE.
    Delete,
}

impl RestMethod {
    /// Returns `true` if this method typically has a request body.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    /// Returns `true` if a method of this verb may be declared with a
    /// non-empty JSON payload template.
    ///
    /// Only GET is rejected: it cannot transfer a structured body.
    pub fn allows_json_payload(&self) -> bool {
        !matches!(self, Self::Get)
    }

    /// Converts to the equivalent `reqwest::Method`.
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl From<RestMethod> for reqwest::Method {
    fn from(method: RestMethod) -> Self {
        method.to_reqwest()
    }
}
