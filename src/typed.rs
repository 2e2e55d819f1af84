use crate::error::{ReverseError, RouteError};
use crate::map::RouteMap;
use crate::params::{ParamValue, Params};
use crate::pattern::Pattern;
use crate::reverse::{self, Resolver};

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Declares the route parameters a type supplies.
///
/// [`TypedRoute`] compares these names with the keys of its route when it is
/// created, so a parameter type that does not fit its route is rejected
/// before any URL is generated.
///
/// ```rust
/// use routemap::RouteParams;
///
/// struct LastParams {
///     id: u32,
///     last: Option<u32>,
/// }
///
/// impl RouteParams for LastParams {
///     const REQUIRED: &'static [&'static str] = &["id"];
///     const OPTIONAL: &'static [&'static str] = &["last"];
/// }
/// ```
pub trait RouteParams {
    /// Parameters every value of the type supplies.
    const REQUIRED: &'static [&'static str];
    /// Parameters the type may leave out, such as `Option` fields.
    const OPTIONAL: &'static [&'static str] = &[];
}

/// A route whose parameters are described by the type `P`.
///
/// Creating a `TypedRoute` checks `P` against the route: every required key
/// of the route must be one of `P`'s required parameters, every optional key
/// must be declared by `P`, and `P` may not declare parameters the route does
/// not have. Since a path from [`RouteMap::build`] already holds the
/// placeholders of every enclosing map, the check covers the parent and child
/// parameters together.
///
/// After that the compiler checks every call site: the caller has to supply
/// a `P`, so a typo in a parameter name or a forgotten parameter is a type
/// error rather than a failed request.
///
/// ```rust
/// use routemap::{routes, RouteParams, TypedRoute};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct LastParams {
///     id: u32,
///     param: &'static str,
///     last: Option<u32>,
/// }
///
/// impl RouteParams for LastParams {
///     const REQUIRED: &'static [&'static str] = &["id", "param"];
///     const OPTIONAL: &'static [&'static str] = &["last"];
/// }
///
/// let routes = routes!("", {
///     page2: routes!("/:id", {
///         sub: routes!("/sub/:param", { last: "/:last?" }),
///     }),
/// });
///
/// let last: TypedRoute<LastParams> = routes.typed("page2.sub.last").unwrap();
/// assert_eq!(last.reverse(&LastParams { id: 1, param: "test", last: None }).unwrap(), "/1/sub/test");
/// assert_eq!(last.reverse(&LastParams { id: 1, param: "test", last: Some(5) }).unwrap(), "/1/sub/test/5");
/// ```
pub struct TypedRoute<P> {
    path: String,
    _params: PhantomData<fn(&P)>,
}

impl<P: RouteParams> TypedRoute<P> {
    /// Attaches `P` to a route path, failing if `P` does not declare exactly
    /// the parameters of the route.
    pub fn new(path: impl Into<String>) -> Result<Self, RouteError> {
        let path = path.into();
        let pattern = Pattern::parse(path.as_str())?;

        let declares = |names: &[&str], name: &str| names.iter().any(|&n| n == name);

        let missing = pattern
            .keys()
            .filter(|key| {
                !declares(P::REQUIRED, &key.name)
                    && (!key.modifier.is_optional() || !declares(P::OPTIONAL, &key.name))
            })
            .map(|key| key.name.clone())
            .collect::<Vec<_>>();

        let unexpected = P::REQUIRED
            .iter()
            .chain(P::OPTIONAL)
            .filter(|&&name| !pattern.keys().any(|key| key.name == name))
            .map(|&name| name.to_owned())
            .collect::<Vec<_>>();

        if !missing.is_empty() || !unexpected.is_empty() {
            debug!("parameter type does not fit route `{}`", path);
            return Err(RouteError::ParamMismatch {
                route: path,
                missing,
                unexpected,
            });
        }

        Ok(Self {
            path,
            _params: PhantomData,
        })
    }
}

impl<P> TypedRoute<P> {
    /// Returns the underlying route path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl<P: Serialize> TypedRoute<P> {
    /// Generates a URL using the process-wide resolver.
    pub fn reverse(&self, params: &P) -> Result<String, ReverseError> {
        reverse::reverse_url(&self.path, &Params::from_serialize(params)?)
    }

    /// Generates a URL using the given resolver.
    pub fn reverse_with(&self, resolver: &Resolver, params: &P) -> Result<String, ReverseError> {
        resolver.reverse(&self.path, &Params::from_serialize(params)?)
    }
}

impl<P> Clone for TypedRoute<P> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _params: PhantomData,
        }
    }
}

impl<P> fmt::Debug for TypedRoute<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedRoute").field(&self.path).finish()
    }
}

impl RouteMap {
    /// Looks up a path by its dotted name and attaches the parameter type `P`
    /// to it. See [`TypedRoute::new`] for how `P` is checked.
    pub fn typed<P: RouteParams>(&self, dotted: &str) -> Result<TypedRoute<P>, RouteError> {
        let path = self.path(dotted).ok_or_else(|| RouteError::NotFound {
            name: dotted.to_owned(),
        })?;

        TypedRoute::new(path)
    }
}

impl Params {
    /// Builds parameters from any value that serializes to a map, such as a
    /// struct deriving `Serialize`.
    ///
    /// `null` values (`None`) are left out. Strings and numbers become single
    /// values, sequences of them become lists.
    ///
    /// ```rust
    /// use routemap::{ParamValue, Params};
    /// use std::collections::HashMap;
    ///
    /// let map = HashMap::from([("id", Some(1)), ("tab", None)]);
    /// let params = Params::from_serialize(&map).unwrap();
    /// assert_eq!(params.get("id"), Some(&ParamValue::Single("1".into())));
    /// assert_eq!(params.get("tab"), None);
    /// ```
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Params, ReverseError> {
        let object = match serde_json::to_value(value) {
            Ok(Value::Object(object)) => object,
            Ok(Value::Null) => return Ok(Params::new()),
            Ok(other) => {
                return Err(ReverseError::InvalidParams(format!(
                    "expected a map of parameters, found {}",
                    other
                )))
            }
            Err(err) => return Err(ReverseError::InvalidParams(err.to_string())),
        };

        let mut params = Params::new();
        for (name, value) in object {
            let value = match value {
                Value::Null => continue,
                Value::Array(items) => ParamValue::List(
                    items
                        .into_iter()
                        .map(|item| scalar(item).ok_or_else(|| unsupported(&name)))
                        .collect::<Result<_, _>>()?,
                ),
                other => ParamValue::Single(scalar(other).ok_or_else(|| unsupported(&name))?),
            };

            params.insert(name, value);
        }

        Ok(params)
    }
}

fn scalar(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        // floats format like the numeric `From` impls of `ParamValue`
        Value::Number(n) => Some(match n.as_f64() {
            Some(float) if n.is_f64() => float.to_string(),
            _ => n.to_string(),
        }),
        _ => None,
    }
}

fn unsupported(name: &str) -> ReverseError {
    ReverseError::UnsupportedValue {
        name: name.to_owned(),
    }
}
