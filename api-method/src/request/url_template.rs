use serde_json::{Map, Value};

use crate::error::RequestError;

/// Formats a URL template by substituting `{name}` placeholders.
///
/// `{{` and `}}` produce literal braces. String values are inserted as-is,
/// any other JSON value as its JSON text.
///
/// ## Examples
///
/// ```rust
/// use api_method::request::format_url;
/// use serde_json::json;
///
/// let values = json!({"id": "42", "page": 3});
/// let url = format_url("/users/{id}/posts?page={page}", values.as_object().unwrap()).unwrap();
/// assert_eq!(url, "/users/42/posts?page=3");
/// ```
///
/// ## Errors
///
/// - [`RequestError::MissingPathParameter`] if a placeholder has no value
///   or its value is `null`
/// - [`RequestError::MalformedTemplate`] on an unmatched brace
pub fn format_url(template: &str, values: &Map<String, Value>) -> Result<String, RequestError> {
    let malformed = || RequestError::MalformedTemplate {
        template: template.to_string(),
    };

    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => return Err(malformed()),
                        Some(ch) => name.push(ch),
                    }
                }
                match values.get(&name) {
                    None | Some(Value::Null) => {
                        return Err(RequestError::MissingPathParameter { name })
                    }
                    Some(Value::String(s)) => out.push_str(s),
                    Some(other) => out.push_str(&other.to_string()),
                }
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(malformed()),
            _ => out.push(c),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn substitutes_named_placeholders() {
        let url = format_url(
            "https://api.example.com/{account}/statement/{from}",
            &values(json!({"account": "0", "from": 1700000000})),
        )
        .unwrap();
        assert_eq!(url, "https://api.example.com/0/statement/1700000000");
    }

    #[test]
    fn template_without_placeholders_is_unchanged() {
        let url = format_url("/bank/currency", &Map::new()).unwrap();
        assert_eq!(url, "/bank/currency");
    }

    #[test]
    fn doubled_braces_are_literal() {
        let url = format_url("/a/{{literal}}/{id}", &values(json!({"id": 7}))).unwrap();
        assert_eq!(url, "/a/{literal}/7");
    }

    #[test]
    fn missing_value_is_reported_by_name() {
        let err = format_url("/users/{id}", &Map::new()).unwrap_err();
        assert!(matches!(err, RequestError::MissingPathParameter { name } if name == "id"));
    }

    #[test]
    fn null_value_counts_as_missing() {
        let err = format_url("/u/{id}", &values(json!({"id": null}))).unwrap_err();
        assert!(matches!(err, RequestError::MissingPathParameter { name } if name == "id"));
    }

    #[test]
    fn unmatched_braces_are_malformed() {
        assert!(matches!(
            format_url("/users/{id", &Map::new()),
            Err(RequestError::MalformedTemplate { .. })
        ));
        assert!(matches!(
            format_url("/users/id}", &Map::new()),
            Err(RequestError::MalformedTemplate { .. })
        ));
    }
}
