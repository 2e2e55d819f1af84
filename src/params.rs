use std::borrow::Cow;
use std::{fmt, slice};

/// The value of a single route parameter.
///
/// Strings and numbers convert into [`ParamValue::Single`], vectors and
/// slices into [`ParamValue::List`]. Lists are only accepted by repeatable
/// parameters (`:name*` and `:name+`).
///
/// Numbers are written with their `Display` impl, so `5.0` becomes `"5"` and
/// `1.5` becomes `"1.5"`. Non-finite floats come out as `inf`, `-inf` and
/// `NaN`, and large floats are written out in full (`1e21` gives
/// `"1000000000000000000000"`), unlike JavaScript's `Infinity` and `1e+21`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamValue {
    Single(String),
    List(Vec<String>),
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_owned())
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Single(value.clone())
    }
}

impl From<Cow<'_, str>> for ParamValue {
    fn from(value: Cow<'_, str>) -> Self {
        ParamValue::Single(value.into_owned())
    }
}

macro_rules! display_values {
    ($($ty:ty),* $(,)?) => { $(
        impl From<$ty> for ParamValue {
            fn from(value: $ty) -> Self {
                ParamValue::Single(value.to_string())
            }
        }
    )* };
}

display_values!(char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

impl<T: ToString> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::List(values.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString> From<&[T]> for ParamValue {
    fn from(values: &[T]) -> Self {
        ParamValue::List(values.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString, const N: usize> From<[T; N]> for ParamValue {
    fn from(values: [T; N]) -> Self {
        ParamValue::List(values.iter().map(ToString::to_string).collect())
    }
}

/// The parameters used to generate a URL from a route.
///
/// ```rust
/// use routemap::{params, ParamValue, Params};
///
/// let params = params! { "id" => 1, "tab" => "info" };
/// assert_eq!(params.get("id"), Some(&ParamValue::Single("1".into())));
///
/// let same = Params::new().with("id", 1).with("tab", "info");
/// assert_eq!(params, same);
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Params {
    // Routes rarely carry more than a handful of parameters, so a flat list
    // with linear lookup beats hashing.
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    /// Creates an empty parameter list.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds a parameter, replacing any previous value under the same name.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts a parameter, returning the value it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        let name = name.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Returns the value registered under the given name.
    pub fn get(&self, name: impl AsRef<str>) -> Option<&ParamValue> {
        let name = name.as_ref();
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Removes a parameter, returning its value.
    pub fn remove(&mut self, name: impl AsRef<str>) -> Option<ParamValue> {
        let name = name.as_ref();
        let position = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(position).1)
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the names and values, in insertion order.
    pub fn iter(&self) -> ParamsIter<'_> {
        ParamsIter {
            inner: self.entries.iter(),
        }
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        params.extend(iter);
        params
    }
}

impl<K, V> Extend<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a str, &'a ParamValue);
    type IntoIter = ParamsIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the names and values of [`Params`].
pub struct ParamsIter<'a> {
    inner: slice::Iter<'a, (String, ParamValue)>,
}

impl<'a> Iterator for ParamsIter<'a> {
    type Item = (&'a str, &'a ParamValue);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (key.as_str(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ParamsIter<'_> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// Builds [`Params`] from `name => value` pairs.
///
/// ```rust
/// use routemap::params;
///
/// let params = params! { "id" => 1, "path" => vec!["a", "b"] };
/// assert_eq!(params.len(), 2);
/// assert!(params! {}.is_empty());
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Params::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {
        $crate::Params::new()$(.with($name, $value))+
    };
}
