//! Static JSON payload templates and the algorithm that fills them.
//!
//! A method with a structured body declares a [`Template`]: a nested mapping
//! whose leaves are either literal JSON or [`RuntimeValue`] placeholders.
//! [`fill_template`] turns it into the concrete `json_payload` of a request.

mod fill;
mod insert;
mod runtime_value;

pub use fill::fill_template;
pub use insert::insert_at_path;
pub use runtime_value::RuntimeValue;

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// One node of a [`Template`].
#[derive(Debug, Clone)]
pub enum TemplateNode {
    /// Literal JSON, copied into the payload unchanged.
    Value(Value),
    /// A nested mapping that field values can be overlaid into.
    Object(Template),
    /// A placeholder resolved from a default or a field value.
    Runtime(RuntimeValue),
}

impl From<Value> for TemplateNode {
    /// JSON objects become [`TemplateNode::Object`] so their keys stay reachable
    /// by schema paths.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Object(Template::from(map)),
            other => Self::Value(other),
        }
    }
}

impl From<RuntimeValue> for TemplateNode {
    fn from(value: RuntimeValue) -> Self {
        Self::Runtime(value)
    }
}

impl From<Template> for TemplateNode {
    fn from(template: Template) -> Self {
        Self::Object(template)
    }
}

/// A static nested JSON payload template.
///
/// ## Examples
///
/// ```rust
/// use api_method::{RuntimeValue, Template};
/// use serde_json::json;
///
/// let template = Template::new()
///     .with("version", json!(2))
///     .with(
///         "transfer",
///         Template::new()
///             .with("amount", RuntimeValue::mandatory())
///             .with("currency", RuntimeValue::optional().with_default(json!("UAH"))),
///     );
///
/// assert!(!template.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Template(BTreeMap<String, TemplateNode>);

impl Template {
    /// Creates an empty template.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds (or replaces) a node under `key`.
    pub fn with(mut self, key: impl Into<String>, node: impl Into<TemplateNode>) -> Self {
        self.0.insert(key.into(), node.into());
        self
    }

    /// Returns `true` if the template declares nothing.
    ///
    /// Methods with an empty template send flat `params`/`data` instead of a
    /// JSON payload.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the node stored under `key`.
    pub fn get(&self, key: &str) -> Option<&TemplateNode> {
        self.0.get(key)
    }

    /// Iterates over top-level entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &TemplateNode)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for Template {
    fn from(map: Map<String, Value>) -> Self {
        Self(
            map.into_iter()
                .map(|(key, value)| (key, TemplateNode::from(value)))
                .collect(),
        )
    }
}

/// The template of methods that send flat `params`/`data`.
pub static EMPTY_TEMPLATE: Template = Template::new();

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_objects_become_nested_templates() {
        let template = Template::from(
            json!({"a": {"b": 1}, "c": [1, 2]})
                .as_object()
                .cloned()
                .unwrap(),
        );

        let Some(TemplateNode::Object(inner)) = template.get("a") else {
            panic!("expected nested template");
        };
        assert!(matches!(inner.get("b"), Some(TemplateNode::Value(v)) if *v == json!(1)));
        assert!(matches!(template.get("c"), Some(TemplateNode::Value(_))));
    }

    #[test]
    fn empty_template() {
        assert!(EMPTY_TEMPLATE.is_empty());
        assert!(!Template::new().with("x", RuntimeValue::optional()).is_empty());
    }
}
