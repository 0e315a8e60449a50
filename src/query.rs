//! The public query facade.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::{NodeType, QueryNode};
use crate::codec::{decode_node, encode_node, QueryPayload};
use crate::config::CompilerConfig;
use crate::error::{DecodeError, QueryError};
use crate::field::FieldCode;
use crate::parser::parse_with_config;
use crate::propagate::propagate_fields;
use crate::render::{Enclosures, Renderer};
use crate::validator::validate;

/// A parsed, validated and field-propagated search query.
///
/// A `Query` is immutable once built and can be shared across threads freely.
/// Two queries are equal when their raw strings are identical; the trees are
/// not compared.
///
/// ```
/// use paper_query::Query;
///
/// let query = Query::new("[happiness] AND ([joy] OR [peace of mind]) AND NOT [stressful]").unwrap();
/// assert_eq!(query.get_all_terms(), vec!["happiness", "joy", "peace of mind", "stressful"]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "QueryPayload", into = "QueryPayload")]
pub struct Query {
    raw_query: String,
    root: QueryNode,
}

impl Query {
    /// Validates, parses and propagates fields using the default configuration.
    pub fn new(raw: &str) -> Result<Self, QueryError> {
        Self::with_config(raw, &CompilerConfig::default())
    }

    pub fn with_config(raw: &str, config: &CompilerConfig) -> Result<Self, QueryError> {
        let raw_query = raw.trim();
        validate(raw_query)?;

        let mut root = parse_with_config(raw_query, config)?;
        propagate_fields(&mut root);

        debug!(query = raw_query, "parsed query");
        Ok(Self {
            raw_query: raw_query.to_string(),
            root,
        })
    }

    /// Rebuilds a query from a trusted payload. No validation is performed.
    pub fn from_payload(payload: &QueryPayload) -> Result<Self, DecodeError> {
        let root = decode_node(&payload.tree)?;
        if root.node_type() != NodeType::Root {
            return Err(DecodeError::NotRoot(payload.tree.node_type.clone()));
        }
        debug!(query = %payload.raw_query, "decoded query payload");
        Ok(Self {
            raw_query: payload.raw_query.clone(),
            root,
        })
    }

    pub fn to_payload(&self) -> QueryPayload {
        QueryPayload {
            raw_query: self.raw_query.clone(),
            tree: encode_node(&self.root),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        let payload: QueryPayload = serde_json::from_str(json)?;
        Self::from_payload(&payload)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_payload())
    }

    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    pub fn root(&self) -> &QueryNode {
        &self.root
    }

    /// Term values in pre-order, left to right.
    pub fn get_all_terms(&self) -> Vec<&str> {
        self.root.get_all_terms()
    }

    /// Field codes present on terms after propagation.
    pub fn get_all_fields(&self) -> BTreeSet<FieldCode> {
        self.root.get_all_fields()
    }

    pub fn has_wildcards(&self) -> bool {
        fn any_wildcard(node: &QueryNode) -> bool {
            node.wildcard().is_some() || node.children().iter().any(any_wildcard)
        }
        any_wildcard(&self.root)
    }

    /// Renders the tree back to query syntax with every term's effective field.
    pub fn to_canonical_string(&self) -> String {
        Renderer::canonical().render(&self.root)
    }

    /// Renders the query with each term's brackets replaced by `open`/`close`.
    /// With `only_wildcards`, only terms holding a wildcard are rewritten.
    pub fn replace_term_enclosures(&self, open: &str, close: &str, only_wildcards: bool) -> String {
        Renderer::with_enclosures(Enclosures {
            open,
            close,
            only_wildcards,
        })
        .render(&self.root)
    }
}

impl PartialEq for Query {
    fn eq(&self, other: &Self) -> bool {
        self.raw_query == other.raw_query
    }
}

impl Eq for Query {}

impl Hash for Query {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw_query.hash(state);
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw_query)
    }
}

impl FromStr for Query {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Query::new(s)
    }
}

impl TryFrom<QueryPayload> for Query {
    type Error = DecodeError;

    fn try_from(payload: QueryPayload) -> Result<Self, Self::Error> {
        Query::from_payload(&payload)
    }
}

impl From<Query> for QueryPayload {
    fn from(query: Query) -> Self {
        query.to_payload()
    }
}
