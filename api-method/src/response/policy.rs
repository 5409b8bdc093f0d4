//! Response validation checks shared between method types.
//!
//! Method types call these from
//! [`ApiMethod::validate_response`](crate::ApiMethod::validate_response).

use serde_json::Value;

use super::HttpResponse;
use crate::error::DomainError;

/// Fails on any status of 400 or above.
///
/// ## Errors
///
/// Returns a [`DomainError`] carrying the status and the response text.
pub fn require_success_status(response: &HttpResponse) -> Result<(), DomainError> {
    if response.is_success() {
        return Ok(());
    }
    Err(DomainError::new(response.status, response.text()))
}

/// Fails when a JSON object body carries a non-null `field`.
///
/// Array bodies and bodies that are not JSON pass; decoding reports the
/// latter.
///
/// ## Errors
///
/// Returns a [`DomainError`] whose message is the field's text.
pub fn reject_error_field(response: &HttpResponse, field: &str) -> Result<(), DomainError> {
    let Ok(Value::Object(body)) = response.json() else {
        return Ok(());
    };

    match body.get(field) {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(message)) => Err(DomainError::new(response.status, message.clone())),
        Some(other) => Err(DomainError::new(response.status, other.to_string())),
    }
}
