use thiserror::Error;

/// The response could not be decoded into the bound return type.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not valid JSON.
    #[error("invalid JSON response: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The body is JSON but does not match the model's fields.
    #[error("response does not match model {model}: {source}")]
    Model {
        /// Model type name.
        model: String,
        /// Field-level mismatch reported by serde.
        source: serde_json::Error,
    },

    /// The body is JSON but does not match a non-model return type.
    #[error("response is not a valid {expected}: {source}")]
    Value {
        /// Rendered return type.
        expected: String,
        /// Mismatch reported by serde.
        source: serde_json::Error,
    },
}
