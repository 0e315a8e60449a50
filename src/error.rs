//! Error types for query validation, parsing and payload decoding.

use std::path::PathBuf;

use thiserror::Error;

use crate::token::Span;

/// A user-facing problem with a query string.
///
/// Raised synchronously while a [`Query`](crate::Query) is built. Callers should
/// treat it as a fatal configuration error: the query has to be fixed, not retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryValidationError {
    #[error("Query cannot be empty")]
    EmptyQuery,
    #[error("Unbalanced square brackets")]
    UnbalancedBrackets,
    #[error("Unbalanced parentheses")]
    UnbalancedParentheses,
    #[error("Terms cannot be empty")]
    EmptyTerm,
    #[error("Terms cannot contain double quotes: [{0}]")]
    TermContainsQuotes(String),
    #[error("Wildcards cannot be used at the start of a search term: [{0}]")]
    WildcardAtStart(String),
    #[error("Only one wildcard can be included in a search term: [{0}]")]
    MultipleWildcards(String),
    #[error("The asterisk wildcard can only be used at the end of a search term: [{0}]")]
    AsteriskNotAtEnd(String),
    #[error("A minimum of 3 characters preceding the asterisk wildcard is required: [{0}]")]
    TooFewCharsBeforeAsterisk(String),
    #[error("Wildcards can be used only in single terms (no spaces): [{0}]")]
    WildcardInMultiWordTerm(String),
    #[error("Terms must be separated by boolean operators (AND, OR, AND NOT)")]
    MissingOperator,
    #[error("NOT operator must be preceded by AND: use 'AND NOT' instead of 'OR NOT' or just 'NOT'")]
    NotWithoutAnd,
    #[error("Invalid boolean operator: {0}")]
    InvalidOperator(String),
    #[error("Operators must have whitespace before and after them")]
    MissingWhitespace,
    #[error("Connectors cannot appear at the beginning of a query or subquery")]
    ConnectorAtStart,
    #[error("Connectors cannot appear at the end of a query or subquery")]
    ConnectorAtEnd,
    #[error("Connectors must be between terms or groups, not consecutive")]
    ConsecutiveConnectors,
    #[error("Query must contain at least one term enclosed in []")]
    NoTerm,
    #[error("All terms must be enclosed in square brackets: found '{0}'")]
    UnbracketedText(String),
    #[error("Invalid field code: {0}")]
    InvalidFieldCode(String),
}

/// An internal parser invariant failure.
///
/// Validated input never produces one of these except when the nesting
/// depth limit is exceeded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub span: Option<Span>,
}

impl ParseError {
    pub(crate) fn new(message: String, span: Option<Span>) -> Self {
        Self { message, span }
    }

    pub(crate) fn at_position(message: String, span: Span) -> Self {
        Self { message, span: Some(span) }
    }
}

/// A connector string that is not `AND`, `OR` or `AND NOT`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown connector: {0}")]
pub struct UnknownConnector(pub String);

/// A field code outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown field code: {0}")]
pub struct UnknownFieldCode(pub String);

/// A corrupted tree payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),
    #[error(transparent)]
    UnknownConnector(#[from] UnknownConnector),
    #[error("Connector node without a value")]
    MissingConnector,
    #[error(transparent)]
    UnknownField(#[from] UnknownFieldCode),
    #[error("Payload tree must start with a root node, found {0}")]
    NotRoot(String),
    #[error("Malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything that can go wrong while building a [`Query`](crate::Query) from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error(transparent)]
    Validation(#[from] QueryValidationError),
    #[error("Internal parser error: {0}")]
    Parse(#[from] ParseError),
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file does not exist: {}", .0.display())]
    Missing(PathBuf),
    #[error("Cannot read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot parse config file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid config value: {0}")]
    Invalid(String),
}
