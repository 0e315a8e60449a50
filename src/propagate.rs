//! 字段传播：把分组上的字段代码下推到其中的检索词

use crate::ast::QueryNode;
use crate::field::FieldCode;

/// 自顶向下传播字段代码
///
/// 检索词或分组自身的字段优先，否则继承父节点传下来的字段。
/// 分组把字段分发给子节点后清空自身的 `field`。重复调用不会改变结果。
pub fn propagate_fields(root: &mut QueryNode) {
    propagate(root, None);
}

fn propagate(node: &mut QueryNode, inherited: Option<FieldCode>) {
    match node {
        QueryNode::Root { children } => {
            for child in children {
                propagate(child, inherited);
            }
        }
        QueryNode::Term { field, .. } => {
            if field.is_none() {
                *field = inherited;
            }
        }
        QueryNode::Group { children, field } => {
            let effective = field.take().or(inherited);
            for child in children {
                propagate(child, effective);
            }
        }
        QueryNode::Connector { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Connector;

    fn group_with_override() -> QueryNode {
        // abs(ti[a] OR [b]) AND [c]
        QueryNode::root(vec![
            QueryNode::group(
                vec![
                    QueryNode::term("a", Some(FieldCode::Title)),
                    QueryNode::connector(Connector::Or),
                    QueryNode::term("b", None),
                ],
                Some(FieldCode::Abstract),
            ),
            QueryNode::connector(Connector::And),
            QueryNode::term("c", None),
        ])
    }

    #[test]
    fn test_explicit_field_wins_and_group_is_cleared() {
        let mut root = group_with_override();
        propagate_fields(&mut root);

        let group = &root.children()[0];
        assert_eq!(group.field(), None);
        assert_eq!(group.children()[0].field(), Some(FieldCode::Title));
        assert_eq!(group.children()[2].field(), Some(FieldCode::Abstract));
        assert_eq!(root.children()[2].field(), None);
    }

    #[test]
    fn test_nested_group_override() {
        // key(ti([a]) OR [b])
        let mut root = QueryNode::root(vec![QueryNode::group(
            vec![
                QueryNode::group(vec![QueryNode::term("a", None)], Some(FieldCode::Title)),
                QueryNode::connector(Connector::Or),
                QueryNode::term("b", None),
            ],
            Some(FieldCode::Keyword),
        )]);
        propagate_fields(&mut root);

        let outer = &root.children()[0];
        assert_eq!(outer.children()[0].children()[0].field(), Some(FieldCode::Title));
        assert_eq!(outer.children()[0].field(), None);
        assert_eq!(outer.children()[2].field(), Some(FieldCode::Keyword));
    }

    #[test]
    fn test_idempotent() {
        let mut once = group_with_override();
        propagate_fields(&mut once);
        let mut twice = once.clone();
        propagate_fields(&mut twice);
        assert_eq!(once, twice);
    }
}
