use serde_json::{Map, Value};

/// Writes `value` into `container` following `path`.
///
/// The last segment is set directly, creating the key at that level if
/// needed. Every earlier segment must already name a nested object:
/// intermediate containers are never created, and a path that runs into a
/// missing or non-object key leaves `container` untouched.
///
/// Returns `true` if the value was written.
///
/// ## Examples
///
/// ```rust
/// use api_method::template::insert_at_path;
/// use serde_json::json;
///
/// let mut doc = json!({"a": {"b": {"c": 1}}}).as_object().cloned().unwrap();
///
/// assert!(insert_at_path(&mut doc, &["a", "b", "d"], json!(2)));
/// assert!(!insert_at_path(&mut doc, &["a", "x", "y"], json!(100)));
/// assert_eq!(serde_json::Value::Object(doc), json!({"a": {"b": {"c": 1, "d": 2}}}));
/// ```
pub fn insert_at_path(container: &mut Map<String, Value>, path: &[&str], value: Value) -> bool {
    match path {
        [] => false,
        [last] => {
            container.insert((*last).to_string(), value);
            true
        }
        [head, rest @ ..] => match container.get_mut(*head) {
            Some(Value::Object(inner)) => insert_at_path(inner, rest, value),
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Map<String, Value> {
        json!({"a": {"b": {"c": 1}}}).as_object().cloned().unwrap()
    }

    #[test]
    fn inserts_next_to_existing_keys() {
        let mut d = doc();
        assert!(insert_at_path(&mut d, &["a", "b", "d"], json!(2)));
        assert_eq!(Value::Object(d), json!({"a": {"b": {"c": 1, "d": 2}}}));
    }

    #[test]
    fn overwrites_final_segment() {
        let mut d = doc();
        assert!(insert_at_path(&mut d, &["a", "b", "c"], json!("new")));
        assert_eq!(Value::Object(d), json!({"a": {"b": {"c": "new"}}}));
    }

    #[test]
    fn creates_top_level_key() {
        let mut d = doc();
        assert!(insert_at_path(&mut d, &["z"], json!(true)));
        assert_eq!(d["z"], json!(true));
    }

    // Intermediate containers are not auto-created; the write is dropped.
    #[test]
    fn missing_intermediate_is_a_silent_no_op() {
        let mut d = doc();
        assert!(!insert_at_path(&mut d, &["a", "x", "y"], json!(100)));
        assert_eq!(d, doc());
    }

    #[test]
    fn non_object_intermediate_is_a_silent_no_op() {
        let mut d = doc();
        assert!(!insert_at_path(&mut d, &["a", "b", "c", "deeper"], json!(100)));
        assert_eq!(d, doc());
    }

    #[test]
    fn empty_path_does_nothing() {
        let mut d = doc();
        assert!(!insert_at_path(&mut d, &[], json!(1)));
        assert_eq!(d, doc());
    }
}
