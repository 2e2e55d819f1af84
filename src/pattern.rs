//! Parsing and compiling of route patterns.
//!
//! A pattern is static text interleaved with keys:
//!
//! ```text
//!  Syntax          Meaning
//!  :name           required parameter
//!  :name?          optional parameter
//!  :name*          zero or more values
//!  :name+          one or more values
//!  :name(\d+)      parameter with a custom value pattern
//!  (\d+)           unnamed parameter, looked up as "0", "1", ...
//!  {-:name}?       group with an explicit prefix and suffix
//!  \:              escaped character
//! ```
//!
//! A parameter directly preceded by one of the prefix characters (`.` or `/`
//! by default) owns that character: when the parameter is optional and
//! absent, the prefix is dropped with it.
use crate::error::{PatternError, ReverseError};
use crate::options::{Encode, Options};
use crate::params::{ParamValue, Params};

use regex::Regex;
use std::{fmt, mem};

/// How many values a key accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Exactly one value.
    None,
    /// `?`: zero or one value.
    Optional,
    /// `*`: zero or more values.
    ZeroOrMore,
    /// `+`: one or more values.
    OneOrMore,
}

impl Modifier {
    fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("?") => Modifier::Optional,
            Some("*") => Modifier::ZeroOrMore,
            Some("+") => Modifier::OneOrMore,
            _ => Modifier::None,
        }
    }

    /// Returns `true` if the key may be left out.
    pub fn is_optional(self) -> bool {
        matches!(self, Modifier::Optional | Modifier::ZeroOrMore)
    }

    /// Returns `true` if the key accepts a list of values.
    pub fn is_repeat(self) -> bool {
        matches!(self, Modifier::ZeroOrMore | Modifier::OneOrMore)
    }
}

/// A parameter slot in a pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key {
    pub name: String,
    pub prefix: String,
    pub suffix: String,
    /// The regular expression a value must match.
    pub pattern: String,
    pub modifier: Modifier,
}

/// A parsed piece of a pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    Static(String),
    Key(Key),
}

/// Returns `true` if the route contains no pattern syntax at all, in which
/// case it generates itself regardless of the parameters.
pub(crate) fn is_static(route: &str) -> bool {
    !route.contains(|c| matches!(c, ':' | '(' | '{' | '}' | '\\' | '*' | '+' | '?'))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lexeme {
    Open,
    Close,
    Pattern,
    Name,
    Char,
    EscapedChar,
    Modifier,
    End,
}

impl Lexeme {
    fn as_str(self) -> &'static str {
        match self {
            Lexeme::Open => "OPEN",
            Lexeme::Close => "CLOSE",
            Lexeme::Pattern => "PATTERN",
            Lexeme::Name => "NAME",
            Lexeme::Char => "CHAR",
            Lexeme::EscapedChar => "ESCAPED_CHAR",
            Lexeme::Modifier => "MODIFIER",
            Lexeme::End => "END",
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct LexToken<'p> {
    kind: Lexeme,
    index: usize,
    value: &'p str,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn lex(pattern: &str) -> Result<Vec<LexToken<'_>>, PatternError> {
    let chars = pattern.char_indices().collect::<Vec<_>>();
    // byte offset of the char at position `i`, or the end of the pattern
    let offset = |i: usize| chars.get(i).map_or(pattern.len(), |&(offset, _)| offset);

    let mut tokens = Vec::new();
    let mut i = 0;

    while let Some(&(index, c)) = chars.get(i) {
        let single = &pattern[index..offset(i + 1)];

        match c {
            '*' | '+' | '?' => {
                tokens.push(LexToken {
                    kind: Lexeme::Modifier,
                    index,
                    value: single,
                });
                i += 1;
            }
            '\\' => {
                // a trailing backslash escapes nothing and is dropped
                if i + 1 < chars.len() {
                    tokens.push(LexToken {
                        kind: Lexeme::EscapedChar,
                        index,
                        value: &pattern[offset(i + 1)..offset(i + 2)],
                    });
                }
                i += 2;
            }
            '{' => {
                tokens.push(LexToken {
                    kind: Lexeme::Open,
                    index,
                    value: single,
                });
                i += 1;
            }
            '}' => {
                tokens.push(LexToken {
                    kind: Lexeme::Close,
                    index,
                    value: single,
                });
                i += 1;
            }
            ':' => {
                let mut j = i + 1;
                while chars.get(j).is_some_and(|&(_, c)| is_name_char(c)) {
                    j += 1;
                }

                if j == i + 1 {
                    return Err(PatternError::MissingName { index });
                }

                tokens.push(LexToken {
                    kind: Lexeme::Name,
                    index,
                    value: &pattern[offset(i + 1)..offset(j)],
                });
                i = j;
            }
            '(' => {
                let mut depth = 1;
                let mut j = i + 1;

                if chars.get(j).is_some_and(|&(_, c)| c == '?') {
                    return Err(PatternError::PatternStartsWithQuestion { index: offset(j) });
                }

                let start = offset(j);
                let mut end = start;

                while let Some(&(at, c)) = chars.get(j) {
                    match c {
                        '\\' => {
                            j += 2;
                            end = offset(j);
                            continue;
                        }
                        ')' => {
                            depth -= 1;
                            if depth == 0 {
                                j += 1;
                                break;
                            }
                        }
                        '(' => {
                            depth += 1;
                            if !chars.get(j + 1).is_some_and(|&(_, c)| c == '?') {
                                return Err(PatternError::CapturingGroup { index: at });
                            }
                        }
                        _ => {}
                    }

                    j += 1;
                    end = offset(j);
                }

                if depth != 0 {
                    return Err(PatternError::UnbalancedPattern { index });
                }

                if start == end {
                    return Err(PatternError::MissingPattern { index });
                }

                tokens.push(LexToken {
                    kind: Lexeme::Pattern,
                    index,
                    value: &pattern[start..end],
                });
                i = j;
            }
            _ => {
                tokens.push(LexToken {
                    kind: Lexeme::Char,
                    index,
                    value: single,
                });
                i += 1;
            }
        }
    }

    tokens.push(LexToken {
        kind: Lexeme::End,
        index: pattern.len(),
        value: "",
    });

    Ok(tokens)
}

// Escapes the characters that have a meaning inside a regular expression.
fn escape_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if ".+*?=^!:${}()[]|/\\".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

struct Parser<'p> {
    tokens: Vec<LexToken<'p>>,
    pos: usize,
}

impl<'p> Parser<'p> {
    fn has_next(&self) -> bool {
        self.pos < self.tokens.len()
    }

    fn try_consume(&mut self, kind: Lexeme) -> Option<&'p str> {
        match self.tokens.get(self.pos) {
            Some(token) if token.kind == kind => {
                self.pos += 1;
                Some(token.value)
            }
            _ => None,
        }
    }

    fn must_consume(&mut self, kind: Lexeme) -> Result<&'p str, PatternError> {
        if let Some(value) = self.try_consume(kind) {
            return Ok(value);
        }

        let (found, index) = self
            .tokens
            .get(self.pos)
            .map_or((Lexeme::End, 0), |token| (token.kind, token.index));

        Err(PatternError::Unexpected {
            found: found.as_str(),
            index,
            expected: kind.as_str(),
        })
    }

    fn consume_text(&mut self) -> String {
        let mut text = String::new();
        while let Some(value) = self
            .try_consume(Lexeme::Char)
            .or_else(|| self.try_consume(Lexeme::EscapedChar))
        {
            text.push_str(value);
        }
        text
    }

    fn modifier(&mut self) -> Modifier {
        Modifier::from_token(self.try_consume(Lexeme::Modifier))
    }
}

/// Parses a pattern into its static and parameter tokens.
///
/// ```rust
/// use routemap::{parse, Modifier, Options, Token};
///
/// let tokens = parse("/users/:id?", &Options::default()).unwrap();
/// assert_eq!(tokens[0], Token::Static("/users".into()));
/// match &tokens[1] {
///     Token::Key(key) => {
///         assert_eq!(key.name, "id");
///         assert_eq!(key.prefix, "/");
///         assert_eq!(key.modifier, Modifier::Optional);
///     }
///     token => panic!("unexpected token: {:?}", token),
/// }
/// ```
pub fn parse(pattern: &str, options: &Options) -> Result<Vec<Token>, PatternError> {
    let mut parser = Parser {
        tokens: lex(pattern)?,
        pos: 0,
    };

    let default_pattern = format!("[^{}]+?", escape_string(options.delimiter()));
    let mut result = Vec::new();
    let mut unnamed = 0;
    let mut path = String::new();

    let mut next_unnamed = || {
        let name = unnamed.to_string();
        unnamed += 1;
        name
    };

    while parser.has_next() {
        let c = parser.try_consume(Lexeme::Char);
        let name = parser.try_consume(Lexeme::Name);
        let custom = parser.try_consume(Lexeme::Pattern);

        if name.is_some() || custom.is_some() {
            let mut prefix = c.unwrap_or("");

            if !options.prefixes().contains(prefix) {
                path.push_str(prefix);
                prefix = "";
            }

            if !path.is_empty() {
                result.push(Token::Static(mem::take(&mut path)));
            }

            result.push(Token::Key(Key {
                name: name.map_or_else(&mut next_unnamed, str::to_owned),
                prefix: prefix.to_owned(),
                suffix: String::new(),
                pattern: custom.map_or_else(|| default_pattern.clone(), str::to_owned),
                modifier: parser.modifier(),
            }));
            continue;
        }

        if let Some(value) = c.or_else(|| parser.try_consume(Lexeme::EscapedChar)) {
            path.push_str(value);
            continue;
        }

        if !path.is_empty() {
            result.push(Token::Static(mem::take(&mut path)));
        }

        if parser.try_consume(Lexeme::Open).is_some() {
            let prefix = parser.consume_text();
            let name = parser.try_consume(Lexeme::Name).unwrap_or("");
            let custom = parser.try_consume(Lexeme::Pattern).unwrap_or("");
            let suffix = parser.consume_text();

            parser.must_consume(Lexeme::Close)?;

            let pattern = if !name.is_empty() && custom.is_empty() {
                default_pattern.clone()
            } else {
                custom.to_owned()
            };

            let name = if !name.is_empty() {
                name.to_owned()
            } else if !custom.is_empty() {
                next_unnamed()
            } else {
                String::new()
            };

            result.push(Token::Key(Key {
                name,
                prefix,
                suffix,
                pattern,
                modifier: parser.modifier(),
            }));
            continue;
        }

        parser.must_consume(Lexeme::End)?;
    }

    Ok(result)
}

/// A parsed route pattern.
///
/// ```rust
/// use routemap::Pattern;
///
/// let pattern = Pattern::parse("/:id/sub/:next/:optional?").unwrap();
/// assert_eq!(pattern.required_params().collect::<Vec<_>>(), ["id", "next"]);
/// assert_eq!(pattern.optional_params().collect::<Vec<_>>(), ["optional"]);
/// assert!(!pattern.is_static());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    tokens: Vec<Token>,
}

impl Pattern {
    /// Parses a pattern with the default options.
    pub fn parse(source: impl Into<String>) -> Result<Self, PatternError> {
        Self::parse_with(source, &Options::default())
    }

    /// Parses a pattern with the given options.
    pub fn parse_with(source: impl Into<String>, options: &Options) -> Result<Self, PatternError> {
        let source = source.into();
        let tokens = parse(&source, options)?;
        Ok(Self { source, tokens })
    }

    /// Returns the pattern this was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Returns the parameter slots, in order of appearance.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.tokens.iter().filter_map(|token| match token {
            Token::Key(key) => Some(key),
            Token::Static(_) => None,
        })
    }

    /// Returns the names of the parameters that must be supplied.
    pub fn required_params(&self) -> impl Iterator<Item = &str> {
        self.keys()
            .filter(|key| !key.modifier.is_optional())
            .map(|key| key.name.as_str())
    }

    /// Returns the names of the parameters that may be left out.
    pub fn optional_params(&self) -> impl Iterator<Item = &str> {
        self.keys()
            .filter(|key| key.modifier.is_optional())
            .map(|key| key.name.as_str())
    }

    /// Returns `true` if the pattern has no parameters.
    pub fn is_static(&self) -> bool {
        self.keys().next().is_none()
    }

    /// Compiles the pattern into a URL generator.
    pub fn compile(&self, options: &Options) -> Result<PathFunction, PatternError> {
        PathFunction::new(&self.tokens, options)
    }
}

#[derive(Clone, Debug)]
enum Segment {
    Static(String),
    Key(Key, Regex),
}

/// A compiled route pattern that generates URLs from parameters.
///
/// ```rust
/// use routemap::{compile, params, Options};
///
/// let generate = compile("/:id/sub/:next/:optional?", &Options::default()).unwrap();
/// assert_eq!(generate.call(&params! { "id" => 1, "next" => "test" }).unwrap(), "/1/sub/test");
/// assert_eq!(
///     generate.call(&params! { "id" => 1, "next" => "test", "optional" => 5 }).unwrap(),
///     "/1/sub/test/5"
/// );
/// ```
#[derive(Clone)]
pub struct PathFunction {
    segments: Vec<Segment>,
    encode: Encode,
    validate: bool,
}

impl fmt::Debug for PathFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathFunction")
            .field("segments", &self.segments)
            .field("validate", &self.validate)
            .finish_non_exhaustive()
    }
}

/// Parses and compiles a pattern in one step.
pub fn compile(pattern: &str, options: &Options) -> Result<PathFunction, PatternError> {
    PathFunction::new(&parse(pattern, options)?, options)
}

impl PathFunction {
    fn new(tokens: &[Token], options: &Options) -> Result<Self, PatternError> {
        let flags = if options.sensitive() { "" } else { "(?i)" };

        let segments = tokens
            .iter()
            .map(|token| match token {
                Token::Static(text) => Ok(Segment::Static(text.clone())),
                Token::Key(key) => Regex::new(&format!("{}^(?:{})$", flags, key.pattern))
                    .map(|matcher| Segment::Key(key.clone(), matcher))
                    .map_err(|err| PatternError::InvalidRegex {
                        name: key.name.clone(),
                        message: err.to_string(),
                    }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            segments,
            encode: options.encode(),
            validate: options.validate(),
        })
    }

    /// Generates a path from the given parameters.
    ///
    /// Parameters that the pattern does not mention are ignored.
    pub fn call(&self, params: &Params) -> Result<String, ReverseError> {
        let mut path = String::new();

        for segment in &self.segments {
            let (key, matcher) = match segment {
                Segment::Static(text) => {
                    path.push_str(text);
                    continue;
                }
                Segment::Key(key, matcher) => (key, matcher),
            };

            let optional = key.modifier.is_optional();
            let repeat = key.modifier.is_repeat();

            match params.get(&key.name) {
                Some(ParamValue::List(values)) => {
                    if !repeat {
                        return Err(ReverseError::UnexpectedRepeat {
                            name: key.name.clone(),
                        });
                    }

                    if values.is_empty() {
                        if optional {
                            continue;
                        }

                        return Err(ReverseError::EmptyRepeat {
                            name: key.name.clone(),
                        });
                    }

                    for value in values {
                        self.push_value(&mut path, key, matcher, value, true)?;
                    }
                }
                Some(ParamValue::Single(value)) => {
                    self.push_value(&mut path, key, matcher, value, false)?;
                }
                None if optional => {}
                None => {
                    return Err(ReverseError::MissingParameter {
                        name: key.name.clone(),
                        repeat,
                    })
                }
            }
        }

        Ok(path)
    }

    fn push_value(
        &self,
        path: &mut String,
        key: &Key,
        matcher: &Regex,
        value: &str,
        repeat: bool,
    ) -> Result<(), ReverseError> {
        let segment = (self.encode)(value);

        if self.validate && !matcher.is_match(&segment) {
            return Err(ReverseError::InvalidValue {
                name: key.name.clone(),
                pattern: key.pattern.clone(),
                value: segment.into_owned(),
                repeat,
            });
        }

        path.push_str(&key.prefix);
        path.push_str(&segment);
        path.push_str(&key.suffix);
        Ok(())
    }
}
