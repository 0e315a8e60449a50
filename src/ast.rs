use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownConnector;
use crate::field::FieldCode;
use crate::wildcard::Wildcard;

/// 语法树节点
///
/// `Root` 与 `Group` 的子节点严格交替：操作数、连接符、操作数……
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    /// 顶层容器，每棵树只有一个
    Root { children: Vec<QueryNode> },
    /// 方括号中的检索词, 例如：`ti[machine learning]`
    Term {
        /// 方括号内的原始文本（保留大小写和空白）
        value: String,
        field: Option<FieldCode>,
    },
    /// 布尔连接符
    Connector { value: Connector },
    /// 圆括号分组；字段传播之后 `field` 总是为空
    Group {
        children: Vec<QueryNode>,
        field: Option<FieldCode>,
    },
}

/// 连接符，总是以大写形式输出
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connector {
    And,    // AND
    Or,     // OR
    AndNot, // AND NOT
}

impl Connector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
            Connector::AndNot => "AND NOT",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Connector {
    type Err = UnknownConnector;

    /// 大小写不敏感，多个空白视为一个
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_uppercase();
        match normalized.as_str() {
            "AND" => Ok(Connector::And),
            "OR" => Ok(Connector::Or),
            "AND NOT" => Ok(Connector::AndNot),
            _ => Err(UnknownConnector(s.to_string())),
        }
    }
}

/// 节点类型标签，与载荷中的 `node_type` 字段一一对应
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Root,
    Term,
    Connector,
    Group,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Root => "root",
            NodeType::Term => "term",
            NodeType::Connector => "connector",
            NodeType::Group => "group",
        }
    }

    pub fn lookup(name: &str) -> Option<NodeType> {
        match name {
            "root" => Some(NodeType::Root),
            "term" => Some(NodeType::Term),
            "connector" => Some(NodeType::Connector),
            "group" => Some(NodeType::Group),
            _ => None,
        }
    }
}

impl QueryNode {
    pub fn root(children: Vec<QueryNode>) -> Self {
        QueryNode::Root { children }
    }

    pub fn term(value: impl Into<String>, field: Option<FieldCode>) -> Self {
        QueryNode::Term { value: value.into(), field }
    }

    pub fn connector(value: Connector) -> Self {
        QueryNode::Connector { value }
    }

    pub fn group(children: Vec<QueryNode>, field: Option<FieldCode>) -> Self {
        QueryNode::Group { children, field }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            QueryNode::Root { .. } => NodeType::Root,
            QueryNode::Term { .. } => NodeType::Term,
            QueryNode::Connector { .. } => NodeType::Connector,
            QueryNode::Group { .. } => NodeType::Group,
        }
    }

    /// 子节点；叶子节点返回空切片
    pub fn children(&self) -> &[QueryNode] {
        match self {
            QueryNode::Root { children } | QueryNode::Group { children, .. } => children,
            QueryNode::Term { .. } | QueryNode::Connector { .. } => &[],
        }
    }

    pub fn field(&self) -> Option<FieldCode> {
        match self {
            QueryNode::Term { field, .. } | QueryNode::Group { field, .. } => *field,
            QueryNode::Root { .. } | QueryNode::Connector { .. } => None,
        }
    }

    /// 检索词的通配符类型；非检索词节点返回 `None`
    pub fn wildcard(&self) -> Option<Wildcard> {
        match self {
            QueryNode::Term { value, .. } => Wildcard::detect(value),
            _ => None,
        }
    }

    /// 先序遍历收集所有检索词
    pub fn get_all_terms(&self) -> Vec<&str> {
        let mut terms = Vec::new();
        self.collect_terms(&mut terms);
        terms
    }

    fn collect_terms<'a>(&'a self, terms: &mut Vec<&'a str>) {
        match self {
            QueryNode::Term { value, .. } => {
                if !value.is_empty() {
                    terms.push(value);
                }
            }
            QueryNode::Connector { .. } => {}
            QueryNode::Root { children } | QueryNode::Group { children, .. } => {
                for child in children {
                    child.collect_terms(terms);
                }
            }
        }
    }

    /// 检索词上实际出现的字段代码（去重）
    pub fn get_all_fields(&self) -> BTreeSet<FieldCode> {
        let mut fields = BTreeSet::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields(&self, fields: &mut BTreeSet<FieldCode>) {
        match self {
            QueryNode::Term { field, .. } => fields.extend(*field),
            QueryNode::Connector { .. } => {}
            QueryNode::Root { children } | QueryNode::Group { children, .. } => {
                for child in children {
                    child.collect_fields(fields);
                }
            }
        }
    }
}
