use thiserror::Error;

/// Represents errors that can occur when parsing a route pattern.
///
/// Every variant that points into the pattern carries the byte offset of the
/// offending character.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Hash, PartialEq, Error)]
pub enum PatternError {
    /// A `:` was not followed by a parameter name.
    #[error("Missing parameter name at {index}")]
    MissingName { index: usize },
    /// A custom parameter pattern started with `?`.
    #[error("Pattern cannot start with \"?\" at {index}")]
    PatternStartsWithQuestion { index: usize },
    /// Groups nested in a custom pattern must be non-capturing (`(?:...)`).
    #[error("Capturing groups are not allowed at {index}")]
    CapturingGroup { index: usize },
    /// A custom pattern was opened with `(` but never closed.
    #[error("Unbalanced pattern at {index}")]
    UnbalancedPattern { index: usize },
    /// A custom pattern was empty, as in `()`.
    #[error("Missing pattern at {index}")]
    MissingPattern { index: usize },
    /// The parser found a token it did not expect.
    #[error("Unexpected {found} at {index}, expected {expected}")]
    Unexpected {
        /// The kind of token that was found.
        found: &'static str,
        index: usize,
        /// The kind of token the parser required at this position.
        expected: &'static str,
    },
    /// A custom parameter pattern is not a valid regular expression.
    #[error("Invalid pattern for \"{name}\": {message}")]
    InvalidRegex { name: String, message: String },
}

/// Represents errors that can occur when generating a URL from a route.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ReverseError {
    /// A required parameter has no value.
    #[error("Expected \"{name}\" to be {}", expected_kind(.repeat))]
    MissingParameter {
        name: String,
        /// Whether the parameter is repeatable (`:name+`).
        repeat: bool,
    },
    /// A list was supplied for a required repeatable parameter but it was empty.
    #[error("Expected \"{name}\" to not be empty")]
    EmptyRepeat { name: String },
    /// A list was supplied for a parameter that does not repeat.
    #[error("Expected \"{name}\" to not repeat, but got an array")]
    UnexpectedRepeat { name: String },
    /// A value does not match the pattern of its parameter.
    #[error(
        "Expected {}\"{name}\" to match \"{pattern}\", but got \"{value}\"",
        all(.repeat)
    )]
    InvalidValue {
        name: String,
        pattern: String,
        value: String,
        repeat: bool,
    },
    /// A value cannot be used as a parameter (booleans, nested objects).
    #[error("Expected \"{name}\" to be a string, a number or a list of them")]
    UnsupportedValue { name: String },
    /// A parameter struct did not serialize to a map.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
    /// The route itself could not be compiled.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

impl ReverseError {
    /// Returns the name of the parameter this error is about, if any.
    pub fn param(&self) -> Option<&str> {
        match self {
            Self::MissingParameter { name, .. }
            | Self::EmptyRepeat { name }
            | Self::UnexpectedRepeat { name }
            | Self::InvalidValue { name, .. }
            | Self::UnsupportedValue { name } => Some(name),
            Self::InvalidParams(_) | Self::Pattern(_) => None,
        }
    }
}

/// Represents errors that can occur when attaching a parameter type to a route.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum RouteError {
    /// No path is registered under the dotted name.
    #[error("no route named `{name}`")]
    NotFound { name: String },
    /// The parameter type does not declare the parameters of the route.
    #[error(
        "parameters do not fit route `{route}` (missing: {missing:?}, unexpected: {unexpected:?})"
    )]
    ParamMismatch {
        route: String,
        /// Route keys the type does not supply, or leaves optional although
        /// the route requires them.
        missing: Vec<String>,
        /// Names the type declares that the route does not have.
        unexpected: Vec<String>,
    },
    /// The route itself could not be parsed.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

fn expected_kind(repeat: &bool) -> &'static str {
    if *repeat {
        "an array"
    } else {
        "a string"
    }
}

fn all(repeat: &bool) -> &'static str {
    if *repeat {
        "all "
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameter_message() {
        let err = ReverseError::MissingParameter {
            name: "id".into(),
            repeat: false,
        };
        assert_eq!(err.to_string(), "Expected \"id\" to be a string");

        let err = ReverseError::MissingParameter {
            name: "segments".into(),
            repeat: true,
        };
        assert_eq!(err.to_string(), "Expected \"segments\" to be an array");
    }

    #[test]
    fn invalid_value_message() {
        let err = ReverseError::InvalidValue {
            name: "id".into(),
            pattern: "\\d+".into(),
            value: "abc".into(),
            repeat: true,
        };
        assert_eq!(
            err.to_string(),
            "Expected all \"id\" to match \"\\d+\", but got \"abc\""
        );
        assert_eq!(err.param(), Some("id"));
    }

    #[test]
    fn param_mismatch_message() {
        let err = RouteError::ParamMismatch {
            route: "/:id/sub/:param".into(),
            missing: vec!["param".into()],
            unexpected: vec!["nothing".into()],
        };
        assert_eq!(
            err.to_string(),
            "parameters do not fit route `/:id/sub/:param` (missing: [\"param\"], unexpected: [\"nothing\"])"
        );
    }

    #[test]
    fn pattern_errors_are_transparent() {
        let err = ReverseError::from(PatternError::MissingName { index: 1 });
        assert_eq!(err.to_string(), "Missing parameter name at 1");
        assert_eq!(err.param(), None);
    }
}
