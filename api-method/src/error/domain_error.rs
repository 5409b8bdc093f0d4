use thiserror::Error;

/// The API call completed at the HTTP level but failed logically.
///
/// Raised by a method's response validation hook before any decoding.
#[derive(Debug, Error)]
#[error("API call failed with status {status}: {message}")]
pub struct DomainError {
    /// HTTP status code of the response.
    pub status: u16,
    /// Error description extracted from the response, or the raw body.
    pub message: String,
}

impl DomainError {
    /// Creates a domain error for the given status and message.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}
