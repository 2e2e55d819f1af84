use crate::error::{PatternError, ReverseError};
use crate::options::Options;
use crate::params::Params;
use crate::pattern::{self, PathFunction};

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

static DEFAULT: Lazy<Resolver> = Lazy::new(Resolver::new);

/// Generates a URL from a route path, using a process-wide [`Resolver`]
/// with the default [`Options`].
///
/// Routes without any parameter syntax are returned as they are, whatever
/// the parameters.
///
/// ```rust
/// use routemap::{params, reverse_url, Params};
///
/// assert_eq!(reverse_url("/url/next", &params! { "param" => 1 }).unwrap(), "/url/next");
/// assert_eq!(reverse_url("/:id", &params! { "id" => 1 }).unwrap(), "/1");
///
/// let err = reverse_url("/:id", &Params::new()).unwrap_err();
/// assert_eq!(err.to_string(), "Expected \"id\" to be a string");
/// ```
pub fn reverse_url(route: &str, params: &Params) -> Result<String, ReverseError> {
    DEFAULT.reverse(route, params)
}

/// Generates URLs from route paths, caching every compiled route.
///
/// The cache is keyed by the exact route string and is never evicted, so
/// it grows with the number of distinct routes resolved. Routes come from a
/// fixed route tree in practice, which keeps it bounded.
#[derive(Debug, Default)]
pub struct Resolver {
    options: Options,
    cache: RwLock<HashMap<String, Arc<PathFunction>>>,
}

impl Resolver {
    /// Creates a resolver with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver that compiles routes with the given options.
    pub fn with_options(options: Options) -> Self {
        Self {
            options,
            cache: RwLock::default(),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the compiled generator for a route, compiling it on first use.
    pub fn compile(&self, route: &str) -> Result<Arc<PathFunction>, PatternError> {
        if let Some(compiled) = self.cache.read().get(route) {
            return Ok(Arc::clone(compiled));
        }

        let compiled = match pattern::compile(route, &self.options) {
            Ok(compiled) => Arc::new(compiled),
            Err(err) => {
                debug!("failed to compile route `{}`: {}", route, err);
                return Err(err);
            }
        };

        trace!("compiled route `{}`", route);

        // another thread may have compiled the same route in the meantime
        let mut cache = self.cache.write();
        Ok(Arc::clone(
            cache.entry(route.to_owned()).or_insert(compiled),
        ))
    }

    /// Generates a URL from a route path and its parameters.
    ///
    /// ```rust
    /// use routemap::{params, Resolver};
    ///
    /// let resolver = Resolver::new();
    /// let route = "/:id/sub/:next/:optional?";
    ///
    /// assert_eq!(resolver.reverse(route, &params! { "id" => 1, "next" => "test" }).unwrap(), "/1/sub/test");
    /// assert_eq!(
    ///     resolver.reverse(route, &params! { "id" => 1, "next" => "test", "optional" => 5 }).unwrap(),
    ///     "/1/sub/test/5"
    /// );
    /// ```
    pub fn reverse(&self, route: &str, params: &Params) -> Result<String, ReverseError> {
        if pattern::is_static(route) {
            return Ok(route.to_owned());
        }

        self.compile(route)?.call(params)
    }

    /// Returns the number of compiled routes held in the cache.
    pub fn cached(&self) -> usize {
        self.cache.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    #[test]
    fn static_routes_skip_the_cache() {
        let resolver = Resolver::new();
        assert_eq!(resolver.reverse("/url/next", &params! { "param" => 1 }), Ok("/url/next".into()));
        assert_eq!(resolver.cached(), 0);
    }

    #[test]
    fn cache_hit_matches_miss() {
        let resolver = Resolver::new();
        let params = params! { "id" => 1, "next" => "test" };

        let miss = resolver.reverse("/:id/sub/:next", &params);
        let hit = resolver.reverse("/:id/sub/:next", &params);

        assert_eq!(miss, Ok("/1/sub/test".into()));
        assert_eq!(miss, hit);
        assert_eq!(resolver.cached(), 1);
    }

    #[test]
    fn shared_compiled_route() {
        let resolver = Resolver::new();
        let first = resolver.compile("/:id").unwrap();
        let second = resolver.compile("/:id").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn failures_are_not_cached() {
        let resolver = Resolver::new();
        assert_eq!(
            resolver.reverse("/:", &Params::new()),
            Err(ReverseError::Pattern(PatternError::MissingName { index: 1 }))
        );
        assert_eq!(resolver.cached(), 0);
    }
}
