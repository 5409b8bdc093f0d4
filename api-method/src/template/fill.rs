use std::collections::BTreeSet;

use serde_json::{Map, Value};

use super::{insert_at_path, Template, TemplateNode};
use crate::error::RequestError;

/// Fills a payload template with defaults and field values.
///
/// `supplied_paths` are the schema paths of every field that currently holds
/// a value; `overlays` are `(schema path, serialized value)` pairs to write.
///
/// The template itself is never modified. Filling runs in two passes over a
/// fresh copy:
///
/// 1. Every [`RuntimeValue`](super::RuntimeValue) leaf whose path was not
///    supplied is replaced by its default; one without a default that is not
///    mandatory is removed. Mandatory leaves stay as pending placeholders.
/// 2. Each overlay is written at its dotted path with [`insert_at_path`].
///
/// ## Errors
///
/// Returns [`RequestError::MissingRuntimeValue`] if a mandatory placeholder
/// is still unresolved after the overlay pass.
pub fn fill_template(
    template: &Template,
    supplied_paths: &BTreeSet<String>,
    overlays: Vec<(String, Value)>,
) -> Result<Map<String, Value>, RequestError> {
    let mut pending = BTreeSet::new();
    let mut payload = apply_defaults(template, "", supplied_paths, &mut pending);

    for (path, value) in overlays {
        let segments: Vec<&str> = path.split('.').collect();
        if insert_at_path(&mut payload, &segments, value) {
            pending.remove(&path);
        } else {
            tracing::debug!(
                path = %path,
                "schema path not present in payload template, value dropped"
            );
        }
    }

    match pending.into_iter().next() {
        Some(path) => Err(RequestError::MissingRuntimeValue { path }),
        None => Ok(payload),
    }
}

fn apply_defaults(
    template: &Template,
    prefix: &str,
    supplied_paths: &BTreeSet<String>,
    pending: &mut BTreeSet<String>,
) -> Map<String, Value> {
    let mut out = Map::new();

    for (key, node) in template.iter() {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match node {
            TemplateNode::Value(value) => {
                out.insert(key.clone(), value.clone());
            }
            TemplateNode::Object(inner) => {
                let filled = apply_defaults(inner, &path, supplied_paths, pending);
                out.insert(key.clone(), Value::Object(filled));
            }
            TemplateNode::Runtime(runtime) => {
                if runtime.has_default() && !supplied_paths.contains(&path) {
                    let default = runtime.default_value().unwrap_or(Value::Null);
                    out.insert(key.clone(), default);
                } else if runtime.is_mandatory() {
                    out.insert(key.clone(), Value::Null);
                    pending.insert(path);
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::RuntimeValue;
    use serde_json::json;

    fn now() -> Value {
        json!(1_700_000_000)
    }

    fn transfer_template() -> Template {
        Template::new().with("type", json!("transfer")).with(
            "payment",
            Template::new()
                .with("amount", RuntimeValue::mandatory())
                .with("currency", RuntimeValue::optional().with_default(json!("UAH")))
                .with("comment", RuntimeValue::optional())
                .with("created", RuntimeValue::mandatory().with_default_factory(now)),
        )
    }

    fn paths(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_fill_unsupplied_and_optional_leaves_vanish() {
        let payload = fill_template(
            &transfer_template(),
            &paths(&["payment.amount"]),
            vec![("payment.amount".into(), json!(100))],
        )
        .unwrap();

        assert_eq!(
            Value::Object(payload),
            json!({
                "type": "transfer",
                "payment": {"amount": 100, "currency": "UAH", "created": 1_700_000_000},
            })
        );
    }

    #[test]
    fn supplied_values_override_defaults() {
        let payload = fill_template(
            &transfer_template(),
            &paths(&["payment.amount", "payment.currency", "payment.comment"]),
            vec![
                ("payment.amount".into(), json!(5)),
                ("payment.currency".into(), json!("EUR")),
                ("payment.comment".into(), json!("rent")),
            ],
        )
        .unwrap();

        assert_eq!(payload["payment"]["currency"], json!("EUR"));
        assert_eq!(payload["payment"]["comment"], json!("rent"));
    }

    #[test]
    fn unresolved_mandatory_placeholder_is_an_error() {
        let err = fill_template(&transfer_template(), &BTreeSet::new(), vec![]).unwrap_err();
        assert!(matches!(
            err,
            RequestError::MissingRuntimeValue { path } if path == "payment.amount"
        ));
    }

    #[test]
    fn template_is_left_untouched() {
        let template = transfer_template();
        fill_template(
            &template,
            &paths(&["payment.amount"]),
            vec![("payment.amount".into(), json!(1))],
        )
        .unwrap();

        let Some(TemplateNode::Object(payment)) = template.get("payment") else {
            panic!("payment should stay a nested template");
        };
        assert!(matches!(payment.get("amount"), Some(TemplateNode::Runtime(_))));
        assert!(matches!(payment.get("comment"), Some(TemplateNode::Runtime(_))));
    }

    #[test]
    fn overlay_into_missing_intermediate_is_dropped() {
        let template = Template::new().with("a", json!(1));
        let payload = fill_template(
            &template,
            &paths(&["nested.value"]),
            vec![("nested.value".into(), json!(2))],
        )
        .unwrap();
        assert_eq!(Value::Object(payload), json!({"a": 1}));
    }

    #[test]
    fn top_level_overlay_may_add_new_keys() {
        let template = Template::new().with("a", json!(1));
        let payload =
            fill_template(&template, &paths(&["b"]), vec![("b".into(), json!(2))]).unwrap();
        assert_eq!(Value::Object(payload), json!({"a": 1, "b": 2}));
    }
}
