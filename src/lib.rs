//! Boolean query compiler for academic paper searches.
//!
//! Turns a query such as
//!
//! ```text
//! [happiness] AND abs([joy] OR [peace of mind]) AND NOT ti[stressful]
//! ```
//!
//! into a validated, field-propagated syntax tree that every database
//! searcher translates into its own vendor syntax.

pub mod ast;
pub mod codec;
pub mod config;
pub mod error;
pub mod field;
pub mod lexer;
pub mod parser;
pub mod propagate;
pub mod query;
pub mod render;
pub mod token;
pub mod validator;
pub mod wildcard;

pub use ast::{Connector, NodeType, QueryNode};
pub use codec::{NodePayload, QueryPayload};
pub use config::CompilerConfig;
pub use error::{
    ConfigError, DecodeError, ParseError, QueryError, QueryValidationError, UnknownConnector,
    UnknownFieldCode,
};
pub use field::FieldCode;
pub use query::Query;
pub use wildcard::Wildcard;
