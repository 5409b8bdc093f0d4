use thiserror::Error;

use crate::method::RestMethod;

/// Failures while turning a method description into a [`Request`](crate::Request).
///
/// All of these are raised before any I/O takes place.
#[derive(Debug, Error)]
pub enum RequestError {
    /// A JSON payload template was declared on a method that cannot carry a body.
    #[error("json payload template declared on {method}, which cannot transfer a json payload")]
    IncompatibleMethod {
        /// The declared verb.
        method: RestMethod,
    },

    /// The URL template names a placeholder nobody supplied.
    #[error("no value supplied for URL placeholder '{{{name}}}'")]
    MissingPathParameter {
        /// Placeholder name.
        name: String,
    },

    /// The URL template has an unmatched brace.
    #[error("malformed URL template '{template}'")]
    MalformedTemplate {
        /// The template text.
        template: String,
    },

    /// A mandatory runtime value in the payload template was never filled.
    #[error("mandatory runtime value at '{path}' was not supplied")]
    MissingRuntimeValue {
        /// Dotted path of the placeholder inside the template.
        path: String,
    },

    /// The method did not serialize to a JSON object.
    #[error("{method} must serialize to a JSON object")]
    NotAnObject {
        /// Type name of the method.
        method: &'static str,
    },

    /// Field serialization failed.
    #[error("failed to serialize method fields: {0}")]
    Serialize(#[from] serde_json::Error),
}
