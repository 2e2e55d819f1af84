use indexmap::map::{self, IndexMap};
use std::fmt;
use std::ops::Index;

/// The name of the entry every built map carries for its own base path.
pub const INDEX: &str = "index";

/// A value in a [`RouteMap`]: either a path or a nested map.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum Entry {
    Path(String),
    Map(RouteMap),
}

impl Entry {
    /// Returns the path if this entry is a leaf.
    pub fn as_path(&self) -> Option<&str> {
        match self {
            Entry::Path(path) => Some(path),
            Entry::Map(_) => None,
        }
    }

    /// Returns the nested map if this entry is not a leaf.
    pub fn as_map(&self) -> Option<&RouteMap> {
        match self {
            Entry::Map(map) => Some(map),
            Entry::Path(_) => None,
        }
    }

    // Rebuilds the entry under `base`.
    fn prefixed(self, base: &str) -> Entry {
        match self {
            Entry::Path(path) => Entry::Path(format!("{}{}", base, path)),
            Entry::Map(map) => Entry::Map(RouteMap::build(base, map.entries)),
        }
    }
}

impl From<&str> for Entry {
    fn from(path: &str) -> Self {
        Entry::Path(path.to_owned())
    }
}

impl From<String> for Entry {
    fn from(path: String) -> Self {
        Entry::Path(path)
    }
}

impl From<&String> for Entry {
    fn from(path: &String) -> Self {
        Entry::Path(path.clone())
    }
}

impl From<RouteMap> for Entry {
    fn from(map: RouteMap) -> Self {
        Entry::Map(map)
    }
}

impl PartialEq<str> for Entry {
    fn eq(&self, other: &str) -> bool {
        self.as_path() == Some(other)
    }
}

impl PartialEq<&str> for Entry {
    fn eq(&self, other: &&str) -> bool {
        self.as_path() == Some(*other)
    }
}

impl Index<&str> for Entry {
    type Output = Entry;

    /// Returns the child entry with the given name.
    ///
    /// # Panics
    ///
    /// Panics if this entry is a path or has no child with that name.
    fn index(&self, name: &str) -> &Entry {
        match self {
            Entry::Map(map) => &map[name],
            Entry::Path(path) => panic!("route `{}` is a path, not a map", path),
        }
    }
}

/// A tree of named routes, where every path is prefixed with the base paths
/// of all the maps above it.
///
/// ```rust
/// use routemap::{reverse_url, params, routes};
///
/// let routes = routes!("", {
///     page1: "/page1",
///     page2: routes!("/page2", {
///         info: "/info",
///         sub: routes!("/sub/:param", {
///             info: "/info",
///             last: "/:last?",
///         }),
///     }),
/// });
///
/// assert_eq!(routes["page2"]["index"], "/page2");
/// assert_eq!(routes["page2"]["sub"]["info"], "/page2/sub/:param/info");
///
/// let last = routes.path("page2.sub.last").unwrap();
/// assert_eq!(reverse_url(last, &params! { "param" => "test" }).unwrap(), "/page2/sub/test");
/// ```
///
/// A built map never changes afterwards and can be shared freely between
/// threads, typically from a `static`:
///
/// ```rust
/// use once_cell::sync::Lazy;
/// use routemap::{routes, RouteMap};
///
/// static ROUTES: Lazy<RouteMap> = Lazy::new(|| routes!("", { home: "/" }));
///
/// assert_eq!(ROUTES["home"], "/");
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct RouteMap {
    entries: IndexMap<String, Entry>,
}

impl RouteMap {
    /// Builds a map whose paths are all prefixed with `base`.
    ///
    /// The result starts with an [`INDEX`] entry set to `base`. Every string
    /// entry becomes `base` followed by the string, with no separator
    /// normalization. Every nested map is rebuilt under `base`, so its paths
    /// (its own `index` included) gain the prefix as well; under an empty
    /// `base` nested maps are copied through unchanged.
    ///
    /// Entries keep their input order. When a name appears twice, the later
    /// entry replaces the earlier one in the earlier one's position. In
    /// particular an explicit `index` entry replaces the synthesized one,
    /// and is prefixed like any other path.
    ///
    /// ```rust
    /// use routemap::{Entry, RouteMap};
    ///
    /// let routes = RouteMap::build("/sub/:param", [
    ///     ("index", Entry::from("/index")),
    ///     ("info", Entry::from("/info")),
    /// ]);
    /// assert_eq!(routes["index"], "/sub/:param/index");
    /// assert_eq!(routes.keys().collect::<Vec<_>>(), ["index", "info"]);
    /// ```
    pub fn build<I, K, V>(base: &str, entries: I) -> RouteMap
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Entry>,
    {
        let mut map = IndexMap::new();
        map.insert(INDEX.to_owned(), Entry::Path(base.to_owned()));

        for (name, entry) in entries {
            map.insert(name.into(), entry.into().prefixed(base));
        }

        trace!("built route map under `{}` with {} entries", base, map.len());
        RouteMap { entries: map }
    }

    /// Returns the entry with the given name.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Looks up a path by its dotted name, such as `"page2.sub.info"`.
    ///
    /// Returns `None` if any part is missing or the name points at a map.
    pub fn path(&self, dotted: &str) -> Option<&str> {
        self.lookup(dotted)?.as_path()
    }

    /// Looks up an entry by its dotted name.
    ///
    /// The name is split on every `.`, so entries whose own name contains a
    /// dot can only be reached through [`RouteMap::lookup_path`].
    pub fn lookup(&self, dotted: &str) -> Option<&Entry> {
        self.lookup_path(dotted.split('.'))
    }

    /// Looks up an entry by the names of its enclosing maps and its own name.
    ///
    /// ```rust
    /// use routemap::RouteMap;
    ///
    /// let routes = RouteMap::build("/api", [("v1.2", "/x")]);
    /// assert!(routes.lookup("v1.2").is_none());
    /// assert_eq!(routes.lookup_path(["v1.2"]).and_then(|entry| entry.as_path()), Some("/api/x"));
    /// ```
    pub fn lookup_path<I>(&self, names: I) -> Option<&Entry>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut names = names.into_iter();
        let mut entry = self.get(names.next()?.as_ref())?;

        for name in names {
            entry = entry.as_map()?.get(name.as_ref())?;
        }

        Some(entry)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the number of direct entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    ///
    /// A map produced by [`RouteMap::build`] always has its `index`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the names of the direct entries, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns an iterator over the direct entries, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Returns a depth-first iterator over every path in the tree, paired
    /// with its dotted name.
    ///
    /// Names are joined with `.` as they are, so a name that itself contains
    /// a dot yields a dotted name [`RouteMap::lookup`] cannot resolve.
    ///
    /// ```rust
    /// use routemap::routes;
    ///
    /// let routes = routes!("/app", { users: routes!("/users", { show: "/:id" }) });
    /// let leaves = routes.leaves().collect::<Vec<_>>();
    /// assert_eq!(leaves, [
    ///     ("index".to_owned(), "/app"),
    ///     ("users.index".to_owned(), "/app/users"),
    ///     ("users.show".to_owned(), "/app/users/:id"),
    /// ]);
    /// ```
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            stack: vec![(String::new(), self.entries.iter())],
        }
    }
}

impl fmt::Debug for RouteMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl Index<&str> for RouteMap {
    type Output = Entry;

    /// # Panics
    ///
    /// Panics if there is no entry with the given name.
    fn index(&self, name: &str) -> &Entry {
        match self.get(name) {
            Some(entry) => entry,
            None => panic!("no route named `{}`", name),
        }
    }
}

impl<'a> IntoIterator for &'a RouteMap {
    type Item = (&'a String, &'a Entry);
    type IntoIter = map::Iter<'a, String, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A depth-first iterator over the paths of a [`RouteMap`].
pub struct Leaves<'a> {
    stack: Vec<(String, map::Iter<'a, String, Entry>)>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = (String, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (parent, iter) = self.stack.last_mut()?;

            let Some((name, entry)) = iter.next() else {
                self.stack.pop();
                continue;
            };

            let dotted = if parent.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", parent, name)
            };

            match entry {
                Entry::Path(path) => return Some((dotted, path)),
                Entry::Map(map) => self.stack.push((dotted, map.entries.iter())),
            }
        }
    }
}

/// Builds a [`RouteMap`] from a base path and `name: entry` pairs.
///
/// Entries are string paths or nested `routes!` invocations.
///
/// ```rust
/// use routemap::routes;
///
/// let routes = routes!("/page2", {
///     base: "/",
///     info: "/info",
/// });
/// assert_eq!(routes["index"], "/page2");
/// assert_eq!(routes["base"], "/page2/");
/// ```
#[macro_export]
macro_rules! routes {
    ($base:expr, { $($name:ident : $entry:expr),* $(,)? }) => {{
        let entries: ::std::vec::Vec<(&'static str, $crate::Entry)> =
            ::std::vec![$((stringify!($name), $crate::Entry::from($entry))),*];
        $crate::RouteMap::build($base, entries)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_first() {
        let routes = RouteMap::build("/base", [("b", "/b"), ("a", "/a")]);
        assert_eq!(routes.keys().collect::<Vec<_>>(), ["index", "b", "a"]);
    }

    #[test]
    fn explicit_index_keeps_position() {
        let routes = RouteMap::build("/base", [("a", "/a"), ("index", "/home")]);
        assert_eq!(routes.keys().collect::<Vec<_>>(), ["index", "a"]);
        assert_eq!(routes["index"], "/base/home");
    }

    #[test]
    fn last_write_wins() {
        let routes = RouteMap::build("", [("a", "/first"), ("a", "/second")]);
        assert_eq!(routes.len(), 2);
        assert_eq!(routes["a"], "/second");
    }

    #[test]
    fn lookup() {
        let routes = routes!("", { a: routes!("/a", { b: "/b" }) });
        assert_eq!(routes.path("a.b"), Some("/a/b"));
        assert_eq!(routes.path("a"), None);
        assert_eq!(routes.path("a.b.c"), None);
        assert_eq!(routes.path("missing"), None);
        assert!(routes.lookup("a").and_then(Entry::as_map).is_some());
    }

    #[test]
    #[should_panic(expected = "no route named `missing`")]
    fn index_missing() {
        let routes = routes!("", {});
        let _ = &routes["missing"];
    }

    #[test]
    #[should_panic(expected = "is a path, not a map")]
    fn index_into_path() {
        let routes = routes!("", { a: "/a" });
        let _ = &routes["a"]["b"];
    }

    #[test]
    fn empty_leaves() {
        let routes = RouteMap::default();
        assert!(routes.is_empty());
        assert_eq!(routes.leaves().count(), 0);
    }
}
