//! Tree codec: converts query trees to and from the plain payload used for
//! persistence and transport.
//!
//! ```json
//! {
//!   "raw_query": "abs([a] OR [b])",
//!   "tree": {
//!     "node_type": "root",
//!     "children": [
//!       { "node_type": "group", "children": [
//!         { "node_type": "term", "value": "a", "field": "abs" },
//!         { "node_type": "connector", "value": "OR" },
//!         { "node_type": "term", "value": "b", "field": "abs" }
//!       ] }
//!     ]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::ast::{Connector, NodeType, QueryNode};
use crate::error::DecodeError;
use crate::field::FieldCode;

/// Top-level payload: the original string plus the encoded tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPayload {
    pub raw_query: String,
    pub tree: NodePayload,
}

/// One encoded node. Optional parts are omitted when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePayload {
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodePayload>,
}

impl NodePayload {
    fn new(node_type: NodeType) -> Self {
        Self {
            node_type: node_type.as_str().to_string(),
            value: None,
            field: None,
            children: Vec::new(),
        }
    }
}

pub fn encode_node(node: &QueryNode) -> NodePayload {
    let mut payload = NodePayload::new(node.node_type());
    match node {
        QueryNode::Term { value, field } => {
            payload.value = Some(value.clone()).filter(|v| !v.is_empty());
            payload.field = field.map(|f| f.as_str().to_string());
        }
        QueryNode::Connector { value } => {
            payload.value = Some(value.as_str().to_string());
        }
        QueryNode::Group { field, .. } => {
            payload.field = field.map(|f| f.as_str().to_string());
        }
        QueryNode::Root { .. } => {}
    }
    payload.children = node.children().iter().map(encode_node).collect();
    payload
}

/// Structural reconstruction of a node. No grammar validation is performed.
pub fn decode_node(payload: &NodePayload) -> Result<QueryNode, DecodeError> {
    let node_type = NodeType::lookup(&payload.node_type)
        .ok_or_else(|| DecodeError::UnknownNodeType(payload.node_type.clone()))?;

    let node = match node_type {
        NodeType::Root => QueryNode::root(decode_children(payload)?),
        NodeType::Term => QueryNode::term(
            payload.value.clone().unwrap_or_default(),
            decode_field(payload.field.as_deref())?,
        ),
        NodeType::Connector => {
            let value = payload.value.as_deref().ok_or(DecodeError::MissingConnector)?;
            QueryNode::connector(value.parse::<Connector>()?)
        }
        NodeType::Group => QueryNode::group(
            decode_children(payload)?,
            decode_field(payload.field.as_deref())?,
        ),
    };
    Ok(node)
}

fn decode_children(payload: &NodePayload) -> Result<Vec<QueryNode>, DecodeError> {
    payload.children.iter().map(decode_node).collect()
}

fn decode_field(field: Option<&str>) -> Result<Option<FieldCode>, DecodeError> {
    Ok(field.map(str::parse::<FieldCode>).transpose()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnknownFieldCode;
    use serde_json::json;

    #[test]
    fn test_encoding_omits_empty_parts() {
        let root = QueryNode::root(vec![
            QueryNode::term("a", Some(FieldCode::Title)),
            QueryNode::connector(Connector::AndNot),
            QueryNode::term("b", None),
        ]);
        let value = serde_json::to_value(encode_node(&root)).unwrap();
        assert_eq!(
            value,
            json!({
                "node_type": "root",
                "children": [
                    { "node_type": "term", "value": "a", "field": "ti" },
                    { "node_type": "connector", "value": "AND NOT" },
                    { "node_type": "term", "value": "b" }
                ]
            })
        );
    }

    #[test]
    fn test_decode_structure() {
        let payload: NodePayload = serde_json::from_value(json!({
            "node_type": "root",
            "children": [
                { "node_type": "group", "children": [
                    { "node_type": "term", "value": "x", "field": "TIABS" }
                ] }
            ]
        }))
        .unwrap();
        let node = decode_node(&payload).unwrap();
        assert_eq!(
            node,
            QueryNode::root(vec![QueryNode::group(
                vec![QueryNode::term("x", Some(FieldCode::TitleAbstract))],
                None,
            )])
        );
    }

    #[test]
    fn test_decode_rejects_unknown_node_type() {
        let payload: NodePayload =
            serde_json::from_value(json!({ "node_type": "phrase", "value": "x" })).unwrap();
        assert!(matches!(
            decode_node(&payload),
            Err(DecodeError::UnknownNodeType(name)) if name == "phrase"
        ));
    }

    #[test]
    fn test_decode_rejects_bad_connector_and_field() {
        let payload: NodePayload =
            serde_json::from_value(json!({ "node_type": "connector", "value": "XOR" })).unwrap();
        assert!(matches!(decode_node(&payload), Err(DecodeError::UnknownConnector(_))));

        let payload: NodePayload =
            serde_json::from_value(json!({ "node_type": "connector" })).unwrap();
        assert!(matches!(decode_node(&payload), Err(DecodeError::MissingConnector)));

        let payload: NodePayload =
            serde_json::from_value(json!({ "node_type": "term", "value": "x", "field": "body" }))
                .unwrap();
        assert!(matches!(
            decode_node(&payload),
            Err(DecodeError::UnknownField(UnknownFieldCode(code))) if code == "body"
        ));
    }

    #[test]
    fn test_term_without_value_decodes_as_empty() {
        let payload: NodePayload = serde_json::from_value(json!({ "node_type": "term" })).unwrap();
        assert_eq!(decode_node(&payload).unwrap(), QueryNode::term("", None));
    }
}
