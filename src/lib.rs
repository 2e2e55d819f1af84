//! Declare a tree of URL routes once, then generate concrete URLs from it.
//!
//! A [`RouteMap`] is built bottom-up: every map prefixes the paths it holds,
//! nested maps included, with its own base path, and records that base path
//! under `index`. The result is an immutable tree of fully-qualified route
//! patterns that can live in a `static` for the lifetime of the process.
//!
//! ```rust
//! use routemap::{params, reverse_url, routes};
//!
//! let routes = routes!("", {
//!     page1: "/page1",
//!     page2: routes!("/page2", {
//!         info: "/info",
//!         sub: routes!("/sub/:param", {
//!             info: "/info",
//!         }),
//!     }),
//! });
//!
//! assert_eq!(routes["page2"]["sub"]["index"], "/page2/sub/:param");
//! assert_eq!(routes["page2"]["sub"]["info"], "/page2/sub/:param/info");
//!
//! let url = reverse_url(routes.path("page2.sub.info").unwrap(), &params! { "param" => 42 })?;
//! assert_eq!(url, "/page2/sub/42/info");
//! # Ok::<(), routemap::ReverseError>(())
//! ```
//!
//! Route patterns support required (`:id`), optional (`:id?`) and repeated
//! (`:path*`, `:path+`) parameters, custom value patterns (`:id(\d+)`) and
//! groups (`{-:suffix}?`); see [`parse`] for the full syntax. A missing
//! required parameter is an error naming the parameter. Optional parameters
//! that are left out disappear together with the separator in front of them:
//!
//! ```rust
//! use routemap::{params, reverse_url};
//!
//! let route = "/:id/sub/:next/:optional?";
//! assert_eq!(reverse_url(route, &params! { "id" => 1, "next" => "test" }).unwrap(), "/1/sub/test");
//! assert!(reverse_url(route, &params! { "next" => "test" }).is_err());
//! ```
#![deny(clippy::all)]
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

mod error;
mod map;
mod options;
mod params;
mod pattern;
mod reverse;
#[cfg(feature = "serde")]
mod typed;

pub use error::{PatternError, ReverseError, RouteError};
pub use map::{Entry, Leaves, RouteMap, INDEX};
pub use options::{encode_uri_component, identity, Encode, Options};
pub use params::{ParamValue, Params, ParamsIter};
pub use pattern::{compile, parse, Key, Modifier, PathFunction, Pattern, Token};
pub use reverse::{reverse_url, Resolver};
#[cfg(feature = "serde")]
pub use typed::{RouteParams, TypedRoute};
