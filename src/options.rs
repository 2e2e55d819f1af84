use std::borrow::Cow;
use std::fmt;

/// A function applied to every parameter value before it is validated and
/// written into the generated path.
pub type Encode = fn(&str) -> Cow<'_, str>;

/// Writes values as they are.
pub fn identity(value: &str) -> Cow<'_, str> {
    Cow::Borrowed(value)
}

/// Percent-encodes every character except the unreserved ones
/// (`A-Z a-z 0-9 - _ . ~`).
///
/// ```rust
/// use routemap::{encode_uri_component, params, Options, Resolver};
///
/// let resolver = Resolver::with_options(Options::new().with_encode(encode_uri_component));
/// let url = resolver.reverse("/search/:query", &params! { "query" => "a/b c" }).unwrap();
/// assert_eq!(url, "/search/a%2Fb%20c");
/// ```
pub fn encode_uri_component(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Settings used when parsing and compiling route patterns.
///
/// ```rust
/// use routemap::Options;
///
/// let options = Options::new().with_sensitive(true).with_validate(false);
/// assert!(options.sensitive());
/// assert!(!options.validate());
/// assert_eq!(options.delimiter(), "/#?");
/// ```
#[derive(Clone)]
pub struct Options {
    sensitive: bool,
    validate: bool,
    encode: Encode,
    prefixes: String,
    delimiter: String,
}

impl Options {
    /// Creates the default options: case-insensitive validation, no encoding,
    /// `./` as parameter prefixes and `/#?` as segment delimiters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes value validation case-sensitive.
    pub fn with_sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    /// Turns checking values against their parameter pattern on or off.
    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Sets the function applied to every value before it is written.
    pub fn with_encode(mut self, encode: Encode) -> Self {
        self.encode = encode;
        self
    }

    /// Sets the characters that are absorbed as a parameter's prefix when
    /// they directly precede it.
    pub fn with_prefixes(mut self, prefixes: impl Into<String>) -> Self {
        self.prefixes = prefixes.into();
        self
    }

    /// Sets the characters a default parameter value may not contain.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn sensitive(&self) -> bool {
        self.sensitive
    }

    pub fn validate(&self) -> bool {
        self.validate
    }

    pub fn encode(&self) -> Encode {
        self.encode
    }

    pub fn prefixes(&self) -> &str {
        &self.prefixes
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("sensitive", &self.sensitive)
            .field("validate", &self.validate)
            .field("prefixes", &self.prefixes)
            .field("delimiter", &self.delimiter)
            .finish_non_exhaustive()
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sensitive: false,
            validate: true,
            encode: identity,
            prefixes: "./".to_owned(),
            delimiter: "/#?".to_owned(),
        }
    }
}
