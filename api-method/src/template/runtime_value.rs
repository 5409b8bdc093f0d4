use serde_json::Value;

/// A placeholder leaf inside a static JSON payload [`Template`](super::Template).
///
/// It is a template node of its own rather than a JSON value, so it can never
/// be confused with a legitimate field value, `null` included.
///
/// ## Examples
///
/// ```rust
/// use api_method::RuntimeValue;
/// use serde_json::json;
///
/// let currency = RuntimeValue::optional().with_default(json!("UAH"));
/// assert!(currency.has_default());
/// assert_eq!(currency.default_value(), Some(json!("UAH")));
/// ```
#[derive(Debug, Clone)]
pub struct RuntimeValue {
    default: Option<Value>,
    default_factory: Option<fn() -> Value>,
    mandatory: bool,
}

impl RuntimeValue {
    /// A placeholder that the caller must supply.
    pub fn mandatory() -> Self {
        Self {
            default: None,
            default_factory: None,
            mandatory: true,
        }
    }

    /// A placeholder that is dropped from the payload when not supplied.
    pub fn optional() -> Self {
        Self {
            mandatory: false,
            ..Self::mandatory()
        }
    }

    /// Uses `value` when the caller does not supply one.
    ///
    /// `null` counts as a default too.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Calls `factory` for a default when the caller does not supply one.
    ///
    /// A direct default set with [`with_default`](Self::with_default) wins.
    pub fn with_default_factory(mut self, factory: fn() -> Value) -> Self {
        self.default_factory = Some(factory);
        self
    }

    /// Returns `true` if the placeholder must be filled.
    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    /// Returns `true` if a default value or factory is set.
    pub fn has_default(&self) -> bool {
        self.default.is_some() || self.default_factory.is_some()
    }

    /// Produces the default, preferring the direct value over the factory.
    pub fn default_value(&self) -> Option<Value> {
        if let Some(value) = &self.default {
            return Some(value.clone());
        }
        self.default_factory.map(|factory| factory())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn zero() -> Value {
        json!(0)
    }

    #[test]
    fn plain_placeholders_have_no_default() {
        assert!(!RuntimeValue::mandatory().has_default());
        assert!(RuntimeValue::mandatory().is_mandatory());
        assert!(!RuntimeValue::optional().is_mandatory());
        assert_eq!(RuntimeValue::optional().default_value(), None);
    }

    #[test]
    fn factory_supplies_default() {
        let value = RuntimeValue::mandatory().with_default_factory(zero);
        assert!(value.has_default());
        assert_eq!(value.default_value(), Some(json!(0)));
    }

    #[test]
    fn direct_default_wins_over_factory() {
        let value = RuntimeValue::optional()
            .with_default_factory(zero)
            .with_default(json!("UAH"));
        assert_eq!(value.default_value(), Some(json!("UAH")));
    }

    #[test]
    fn null_default_is_still_a_default() {
        let value = RuntimeValue::optional().with_default(Value::Null);
        assert!(value.has_default());
        assert_eq!(value.default_value(), Some(Value::Null));
    }
}
