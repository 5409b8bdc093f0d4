//! Return-type binding for API methods.
//!
//! Every method type decodes into its `ApiMethod::Output`. Alongside that
//! compile-time type, a method declares a runtime witness, a [`ReturnBinding`],
//! which tells the decoder whether the target is a structured model or a
//! plain value and lets "never bound" be detected as a configuration error.
//! The binding is resolved once per method type and cached for the life of
//! the process.

use std::any::TypeId;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::api_method::ApiMethod;
use crate::error::ConfigError;

/// The broad kind of a return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A struct decoded field by field.
    Model,
    /// A single JSON scalar (string, number, bool).
    Scalar,
    /// Any JSON value, kept as-is.
    Json,
    /// No useful return value.
    Unit,
    /// `Option<T>`.
    Optional,
    /// `Vec<T>`.
    List,
    /// A string-keyed map of `T`.
    Map,
    /// A fixed group of types.
    Tuple,
}

impl Shape {
    fn is_container(self) -> bool {
        matches!(self, Self::Optional | Self::List | Self::Map)
    }
}

/// Runtime description of a decode target type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnType {
    name: Cow<'static, str>,
    shape: Shape,
    params: Vec<ReturnType>,
}

impl ReturnType {
    fn new(name: impl Into<Cow<'static, str>>, shape: Shape, params: Vec<ReturnType>) -> Self {
        Self {
            name: name.into(),
            shape,
            params,
        }
    }

    /// A structured model such as a response struct.
    pub fn model(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, Shape::Model, Vec::new())
    }

    /// A JSON scalar.
    pub fn scalar(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, Shape::Scalar, Vec::new())
    }

    /// The unit type: the call returns nothing useful.
    pub fn unit() -> Self {
        Self::new("()", Shape::Unit, Vec::new())
    }

    /// An untyped JSON value.
    pub fn json() -> Self {
        Self::new("Value", Shape::Json, Vec::new())
    }

    /// `Option<inner>`.
    pub fn optional(inner: ReturnType) -> Self {
        Self::new("Option", Shape::Optional, vec![inner])
    }

    /// `Vec<inner>`.
    pub fn list(inner: ReturnType) -> Self {
        Self::new("Vec", Shape::List, vec![inner])
    }

    /// A string-keyed map of `value`.
    pub fn map(value: ReturnType) -> Self {
        Self::new("Map", Shape::Map, vec![value])
    }

    /// A tuple of `items`.
    pub fn tuple(items: Vec<ReturnType>) -> Self {
        Self::new("Tuple", Shape::Tuple, items)
    }

    /// A generic container whose element type is not known yet.
    ///
    /// Binding a type parameter to a [`ReturnBinding`] holding an open
    /// container specializes it instead of replacing it.
    ///
    /// Returns `None` for shapes that are not containers.
    pub fn open(shape: Shape) -> Option<Self> {
        let name = match shape {
            Shape::Optional => "Option",
            Shape::List => "Vec",
            Shape::Map => "Map",
            _ => return None,
        };
        Some(Self::new(name, shape, Vec::new()))
    }

    /// The kind of this type.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Type parameters, outermost first.
    pub fn params(&self) -> &[ReturnType] {
        &self.params
    }

    /// Returns `true` for structured models.
    pub fn is_model(&self) -> bool {
        self.shape == Shape::Model
    }

    /// Returns `true` for a container still waiting for its element type.
    pub fn is_open(&self) -> bool {
        self.shape.is_container() && self.params.is_empty()
    }

    /// Fills an open container with `params`.
    ///
    /// Returns `None` when specialization is not meaningful: the type is not
    /// an open container, or the containers take exactly one parameter and
    /// `params` has a different length.
    pub fn specialize(&self, params: &[ReturnType]) -> Option<Self> {
        if !self.is_open() || params.len() != 1 {
            return None;
        }
        Some(Self::new(self.name.clone(), self.shape, params.to_vec()))
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape {
            Shape::Tuple => {
                write!(f, "(")?;
                for (i, item) in self.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Shape::Map => match self.params.first() {
                Some(value) => write!(f, "{}<String, {value}>", self.name),
                None => write!(f, "{}<String, _>", self.name),
            },
            shape if shape.is_container() => match self.params.first() {
                Some(inner) => write!(f, "{}<{inner}>", self.name),
                None => write!(f, "{}<_>", self.name),
            },
            _ => write!(f, "{}", self.name),
        }
    }
}

/// Types that can describe themselves as a [`ReturnType`].
///
/// Implemented for JSON scalars, `()`, `serde_json::Value` and the standard
/// containers. Response models implement it with [`ReturnType::model`]:
///
/// ```rust
/// use api_method::{ReturnType, Returnable};
///
/// #[derive(serde::Deserialize)]
/// struct ClientInfo {
///     name: String,
/// }
///
/// impl Returnable for ClientInfo {
///     fn return_type() -> ReturnType {
///         ReturnType::model("ClientInfo")
///     }
/// }
///
/// assert_eq!(Vec::<ClientInfo>::return_type().to_string(), "Vec<ClientInfo>");
/// ```
pub trait Returnable {
    /// Describes `Self`.
    fn return_type() -> ReturnType;
}

macro_rules! scalar_returnable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Returnable for $ty {
                fn return_type() -> ReturnType {
                    ReturnType::scalar(stringify!($ty))
                }
            }
        )*
    };
}

scalar_returnable!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, String);

impl Returnable for () {
    fn return_type() -> ReturnType {
        ReturnType::unit()
    }
}

impl Returnable for Value {
    fn return_type() -> ReturnType {
        ReturnType::json()
    }
}

impl<T: Returnable> Returnable for Option<T> {
    fn return_type() -> ReturnType {
        ReturnType::optional(T::return_type())
    }
}

impl<T: Returnable> Returnable for Vec<T> {
    fn return_type() -> ReturnType {
        ReturnType::list(T::return_type())
    }
}

impl<T: Returnable> Returnable for HashMap<String, T> {
    fn return_type() -> ReturnType {
        ReturnType::map(T::return_type())
    }
}

impl<T: Returnable> Returnable for BTreeMap<String, T> {
    fn return_type() -> ReturnType {
        ReturnType::map(T::return_type())
    }
}

/// The decode target bound to a method type.
///
/// `Unbound` is its own state: it is never represented by a placeholder type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReturnBinding {
    /// No return type has been bound.
    #[default]
    Unbound,
    /// Responses decode into this type.
    Bound(ReturnType),
}

impl ReturnBinding {
    /// Binds `T` directly.
    pub fn of<T: Returnable>() -> Self {
        Self::Bound(T::return_type())
    }

    /// Binds type parameters onto this binding.
    ///
    /// - An unbound binding takes `params` as its type (a tuple when more
    ///   than one is given).
    /// - A binding holding an open container is specialized with `params`.
    /// - Any other binding is replaced.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::EmptyTypeParameters`] if `params` is empty.
    pub fn bind(self, mut params: Vec<ReturnType>) -> Result<Self, ConfigError> {
        if params.is_empty() {
            let target = match &self {
                Self::Unbound => "ReturnBinding".to_string(),
                Self::Bound(ty) => ty.to_string(),
            };
            return Err(ConfigError::EmptyTypeParameters { target });
        }

        let key = if params.len() == 1 {
            params.remove(0)
        } else {
            ReturnType::tuple(params)
        };

        Ok(match self {
            Self::Unbound => Self::Bound(key),
            Self::Bound(existing) => {
                let params = match key.shape() {
                    Shape::Tuple => key.params().to_vec(),
                    _ => vec![key.clone()],
                };
                Self::Bound(existing.specialize(&params).unwrap_or(key))
            }
        })
    }

    /// The bound type, if any.
    pub fn bound(&self) -> Option<&ReturnType> {
        match self {
            Self::Unbound => None,
            Self::Bound(ty) => Some(ty),
        }
    }

    /// Returns `true` once a type has been bound.
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound(_))
    }
}

static BINDINGS: Lazy<RwLock<HashMap<TypeId, ReturnBinding>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Returns the binding of method type `M`, resolving it on first use.
///
/// The first successful resolution is cached; later calls never consult
/// [`ApiMethod::returning`] again.
///
/// ## Errors
///
/// Propagates the [`ConfigError`] raised by `M::returning()`. Failed
/// resolutions are not cached.
pub fn resolve_binding<M: ApiMethod>() -> Result<ReturnBinding, ConfigError> {
    let id = TypeId::of::<M>();

    if let Some(binding) = BINDINGS
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(&id)
    {
        return Ok(binding.clone());
    }

    let binding = M::returning()?;
    tracing::debug!(
        method = std::any::type_name::<M>(),
        binding = ?binding,
        "resolved return type binding"
    );

    let mut bindings = BINDINGS
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    Ok(bindings.entry(id).or_insert(binding).clone())
}

/// Checks that the runtime binding of `M` describes `M::Output`.
///
/// Decoding only consults the binding for error labels and the unit/model
/// distinction, so a mismatch goes unnoticed until it mislabels an error.
/// Call this from a test for each method whose output is [`Returnable`].
///
/// An unbound method passes; decoding reports that case itself.
///
/// ## Errors
///
/// - [`ConfigError::BindingMismatch`] if the bound type differs from the output
/// - whatever `M::returning()` raises
pub fn check_binding<M>() -> Result<(), ConfigError>
where
    M: ApiMethod,
    M::Output: Returnable,
{
    let expected = M::Output::return_type();
    match resolve_binding::<M>()? {
        ReturnBinding::Bound(bound) if bound != expected => Err(ConfigError::BindingMismatch {
            method: std::any::type_name::<M>(),
            bound: bound.to_string(),
            output: expected.to_string(),
        }),
        _ => Ok(()),
    }
}
