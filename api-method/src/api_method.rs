//! Declarative API methods.
//!
//! An API method is a plain `Serialize` struct whose fields are the
//! operation's parameters. Implementing [`ApiMethod`] attaches the URL
//! template, HTTP verb, optional JSON payload template and return type; the
//! provided methods then turn an instance into a [`Request`] and a raw
//! [`HttpResponse`] back into the typed result.
//!
//! ## Examples
//!
//! ```rust
//! use api_method::{ApiMethod, ConfigError, DomainError, FieldSpec, HttpResponse};
//! use api_method::{RestMethod, ReturnBinding};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct GetUser {
//!     user_id: String,
//!     name: Option<String>,
//! }
//!
//! impl ApiMethod for GetUser {
//!     type Output = serde_json::Value;
//!
//!     const URL: &'static str = "/users/{id}";
//!     const HTTP_METHOD: RestMethod = RestMethod::Get;
//!     const FIELDS: &'static [FieldSpec] =
//!         &[FieldSpec::new("user_id").alias("id").path_runtime()];
//!
//!     fn returning() -> Result<ReturnBinding, ConfigError> {
//!         Ok(ReturnBinding::of::<serde_json::Value>())
//!     }
//!
//!     fn validate_response(response: &HttpResponse) -> Result<(), DomainError> {
//!         api_method::response::policy::require_success_status(response)
//!     }
//! }
//!
//! let request = GetUser { user_id: "42".into(), name: Some("ann".into()) }
//!     .build_request()
//!     .unwrap();
//! assert_eq!(request.endpoint, "/users/42");
//! assert_eq!(request.params.unwrap()["name"], "ann");
//! ```

use std::any::type_name;
use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ApiError, ConfigError, DecodeError, DomainError, RequestError};
use crate::method::RestMethod;
use crate::request::{format_url, Request};
use crate::response::HttpResponse;
use crate::returning::{resolve_binding, ReturnBinding, Shape};
use crate::template::{fill_template, Template, EMPTY_TEMPLATE};

/// Field names that are never serialized into params, data or payloads.
pub const DEFAULT_EXCLUDE: [&str; 3] = ["request_schema", "endpoint", "http_method"];

/// Where a field's value goes in the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldLocation {
    /// Query parameter, form field or payload value.
    #[default]
    Normal,
    /// Substituted into the URL template; never serialized into the body or query.
    PathRuntime,
}

/// Metadata for one field of a method struct.
///
/// Fields without an entry in [`ApiMethod::FIELDS`] are normal fields whose
/// wire alias and schema path are their own name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    name: &'static str,
    alias: Option<&'static str>,
    location: FieldLocation,
    schema_path: Option<&'static str>,
}

impl FieldSpec {
    /// Describes the field serialized under `name`.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            alias: None,
            location: FieldLocation::Normal,
            schema_path: None,
        }
    }

    /// Uses `alias` as the name on the wire.
    pub const fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Marks the field as a URL path value.
    pub const fn path_runtime(mut self) -> Self {
        self.location = FieldLocation::PathRuntime;
        self
    }

    /// Places the value at the dotted `path` of the JSON payload template.
    pub const fn schema_path(mut self, path: &'static str) -> Self {
        self.schema_path = Some(path);
        self
    }

    /// Field name as serialized by the method struct.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name on the wire.
    pub fn wire_alias(&self) -> &'static str {
        self.alias.unwrap_or(self.name)
    }

    /// Dotted location inside the payload template.
    pub fn scheme_path(&self) -> &'static str {
        self.schema_path.unwrap_or(self.name)
    }

    /// Where the value goes.
    pub fn location(&self) -> FieldLocation {
        self.location
    }
}

/// One serialized field joined with its metadata.
struct Field<'a> {
    name: &'a str,
    alias: &'a str,
    scheme_path: &'a str,
    location: FieldLocation,
    value: &'a Value,
}

impl Field<'_> {
    fn is_excluded(&self) -> bool {
        self.location == FieldLocation::PathRuntime || DEFAULT_EXCLUDE.contains(&self.name)
    }

    fn is_absent(&self) -> bool {
        self.value.is_null()
    }
}

/// A declared API operation.
///
/// Implementors supply the per-type constants and the validation hook; the
/// provided methods implement request construction and response decoding.
pub trait ApiMethod: Serialize + Sized + 'static {
    /// Type responses decode into.
    type Output: DeserializeOwned;

    /// URL template with `{name}` placeholders.
    const URL: &'static str;

    /// HTTP verb.
    const HTTP_METHOD: RestMethod = RestMethod::Get;

    /// Field metadata table.
    const FIELDS: &'static [FieldSpec] = &[];

    /// Static JSON payload template. Empty for methods that send flat data.
    fn json_payload_template() -> &'static Template {
        &EMPTY_TEMPLATE
    }

    /// Runtime witness of [`Output`](Self::Output), resolved once per type.
    ///
    /// Defaults to [`ReturnBinding::Unbound`]; decoding an unbound method fails
    /// with [`ConfigError::UnboundReturnType`].
    ///
    /// The binding must describe [`Output`](Self::Output); decoding does not
    /// compare the two. [`check_binding`](crate::returning::check_binding)
    /// verifies it for outputs that implement
    /// [`Returnable`](crate::returning::Returnable).
    fn returning() -> Result<ReturnBinding, ConfigError> {
        Ok(ReturnBinding::Unbound)
    }

    /// Inspects a raw response for API-level failures before decoding.
    fn validate_response(response: &HttpResponse) -> Result<(), DomainError>;

    /// Custom decoding. `None` means the method has no hook and generic
    /// decoding applies; `Some` is returned as-is, errors included.
    fn decode_hook(_response: &HttpResponse) -> Option<Result<Self::Output, ApiError>> {
        None
    }

    /// Headers sent with every request of this method.
    fn headers(&self) -> Map<String, Value> {
        Map::new()
    }

    /// Builds the request with no extra URL substitutions.
    ///
    /// ## Errors
    ///
    /// See [`build_request_with`](Self::build_request_with).
    fn build_request(&self) -> Result<Request, ApiError> {
        self.build_request_with(&Map::new())
    }

    /// Builds the request, merging `substitutions` into the URL template.
    ///
    /// Path-runtime fields win over `substitutions` on key collisions.
    ///
    /// ## Errors
    ///
    /// - [`RequestError::IncompatibleMethod`] for a GET method with a payload template,
    ///   raised before any field is serialized
    /// - [`RequestError::MissingPathParameter`] / [`RequestError::MalformedTemplate`]
    ///   from URL formatting
    /// - [`RequestError::MissingRuntimeValue`] for an unfilled mandatory placeholder
    fn build_request_with(&self, substitutions: &Map<String, Value>) -> Result<Request, ApiError> {
        Ok(build(self, substitutions)?)
    }

    /// Decodes a raw response into [`Output`](Self::Output).
    ///
    /// Order: binding check, [`validate_response`](Self::validate_response),
    /// [`decode_hook`](Self::decode_hook), then generic JSON decoding.
    ///
    /// ## Errors
    ///
    /// - [`ConfigError::UnboundReturnType`] if no return type is bound; the
    ///   response is not looked at
    /// - [`DomainError`] from the validation hook
    /// - [`DecodeError`] if the body does not fit the bound type
    fn parse_response(response: &HttpResponse) -> Result<Self::Output, ApiError> {
        parse::<Self>(response)
    }
}

fn build<M: ApiMethod>(
    method: &M,
    substitutions: &Map<String, Value>,
) -> Result<Request, RequestError> {
    let template = M::json_payload_template();
    if !M::HTTP_METHOD.allows_json_payload() && !template.is_empty() {
        return Err(RequestError::IncompatibleMethod {
            method: M::HTTP_METHOD,
        });
    }

    // Unit structs serialize to null: a method without parameters.
    let serialized = match serde_json::to_value(method)? {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        _ => {
            return Err(RequestError::NotAnObject {
                method: type_name::<M>(),
            })
        }
    };
    let fields = join_fields::<M>(&serialized);

    let mut url_values = substitutions.clone();
    for field in fields
        .iter()
        .filter(|f| f.location == FieldLocation::PathRuntime && !f.is_absent())
    {
        url_values.insert(field.alias.to_string(), field.value.clone());
    }
    let endpoint = format_url(M::URL, &url_values)?;

    let mut raw = Map::new();
    raw.insert("endpoint".into(), Value::String(endpoint));
    raw.insert("http_method".into(), serde_json::to_value(M::HTTP_METHOD)?);
    raw.insert("headers".into(), Value::Object(method.headers()));

    if M::HTTP_METHOD == RestMethod::Get {
        raw.insert("params".into(), Value::Object(flat_fields(&fields)));
    } else if !template.is_empty() {
        let supplied: BTreeSet<String> = fields
            .iter()
            .filter(|f| !f.is_absent())
            .map(|f| f.scheme_path.to_string())
            .collect();
        let overlays = fields
            .iter()
            .filter(|f| !f.is_excluded() && !f.is_absent())
            .map(|f| (f.scheme_path.to_string(), f.value.clone()))
            .collect();
        let payload = fill_template(template, &supplied, overlays)?;
        raw.insert("json_payload".into(), Value::Object(payload));
    } else {
        raw.insert("data".into(), Value::Object(flat_fields(&fields)));
    }

    let request = Request::from_value(Value::Object(raw))?;
    tracing::debug!(
        method = type_name::<M>(),
        http.method = %request.http_method,
        endpoint = %request.endpoint,
        "built request"
    );
    Ok(request)
}

fn join_fields<M: ApiMethod>(serialized: &Map<String, Value>) -> Vec<Field<'_>> {
    serialized
        .iter()
        .map(|(name, value)| {
            let spec = M::FIELDS.iter().find(|spec| spec.name == name);
            Field {
                name,
                alias: spec.map_or(name.as_str(), |spec| spec.wire_alias()),
                scheme_path: spec.map_or(name.as_str(), |spec| spec.scheme_path()),
                location: spec.map_or(FieldLocation::Normal, |spec| spec.location()),
                value,
            }
        })
        .collect()
}

fn flat_fields(fields: &[Field<'_>]) -> Map<String, Value> {
    fields
        .iter()
        .filter(|f| !f.is_excluded() && !f.is_absent())
        .map(|f| (f.alias.to_string(), f.value.clone()))
        .collect()
}

fn parse<M: ApiMethod>(response: &HttpResponse) -> Result<M::Output, ApiError> {
    let binding = resolve_binding::<M>()?;
    let Some(target) = binding.bound() else {
        return Err(ConfigError::UnboundReturnType {
            method: type_name::<M>(),
        }
        .into());
    };

    M::validate_response(response)?;

    if let Some(decoded) = M::decode_hook(response) {
        return decoded;
    }

    let empty_body = response.body.iter().all(u8::is_ascii_whitespace);
    let json = if target.shape() == Shape::Unit && empty_body {
        Value::Null
    } else {
        response.json()?
    };

    let decoded = if target.is_model() {
        serde_json::from_value(json).map_err(|source| DecodeError::Model {
            model: target.to_string(),
            source,
        })
    } else {
        serde_json::from_value(json).map_err(|source| DecodeError::Value {
            expected: target.to_string(),
            source,
        })
    };

    if let Err(err) = &decoded {
        tracing::warn!(method = type_name::<M>(), error = %err, "response decoding failed");
    }
    Ok(decoded?)
}
