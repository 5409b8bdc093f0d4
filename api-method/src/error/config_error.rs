use thiserror::Error;

/// Declaration-time mistakes. These are programmer errors and are never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Response decoding was requested for a method whose return type was never bound.
    #[error("{method}: return type is not bound")]
    UnboundReturnType {
        /// Type name of the offending method.
        method: &'static str,
    },

    /// The runtime return binding describes a different type than the method's output.
    #[error("{method}: return type bound as {bound} but the method decodes into {output}")]
    BindingMismatch {
        /// Type name of the offending method.
        method: &'static str,
        /// Type described by the binding.
        bound: String,
        /// Type described by the method's output.
        output: String,
    },

    /// A return type binding was attempted with no type parameters.
    #[error("parameter list to {target}[...] cannot be empty")]
    EmptyTypeParameters {
        /// What the parameters were being bound to.
        target: String,
    },

    /// The configured base URL could not be parsed.
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        /// The rejected URL text.
        url: String,
        /// Parser error.
        source: url::ParseError,
    },

    /// A default header name or value is not valid HTTP.
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader {
        /// Header name as supplied.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An environment variable holds a value that cannot be used.
    #[error("invalid value for {var}: {value}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Rejected value.
        value: String,
    },
}
