//! 把语法树重新渲染为检索式文本

use crate::ast::QueryNode;

/// 检索词两侧的包围符号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enclosures<'a> {
    pub open: &'a str,
    pub close: &'a str,
    /// 为 true 时只替换含通配符的检索词，其余检索词保留方括号
    pub only_wildcards: bool,
}

impl Default for Enclosures<'_> {
    fn default() -> Self {
        Self {
            open: "[",
            close: "]",
            only_wildcards: false,
        }
    }
}

pub struct Renderer<'a> {
    enclosures: Enclosures<'a>,
    with_fields: bool,
}

impl<'a> Renderer<'a> {
    /// 规范形式：带字段前缀、大写连接符
    pub fn canonical() -> Self {
        Self {
            enclosures: Enclosures::default(),
            with_fields: true,
        }
    }

    /// 替换检索词的包围符号，不输出字段前缀
    pub fn with_enclosures(enclosures: Enclosures<'a>) -> Self {
        Self {
            enclosures,
            with_fields: false,
        }
    }

    pub fn render(&self, node: &QueryNode) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    fn write_node(&self, node: &QueryNode, out: &mut String) {
        match node {
            QueryNode::Root { children } => self.write_sequence(children, out),
            QueryNode::Group { children, field } => {
                if self.with_fields {
                    if let Some(field) = field {
                        out.push_str(field.as_str());
                    }
                }
                out.push('(');
                self.write_sequence(children, out);
                out.push(')');
            }
            QueryNode::Term { value, field } => {
                if self.with_fields {
                    if let Some(field) = field {
                        out.push_str(field.as_str());
                    }
                }
                let replace = !self.enclosures.only_wildcards || node.wildcard().is_some();
                let (open, close) = if replace {
                    (self.enclosures.open, self.enclosures.close)
                } else {
                    ("[", "]")
                };
                out.push_str(open);
                out.push_str(value);
                out.push_str(close);
            }
            QueryNode::Connector { value } => out.push_str(value.as_str()),
        }
    }

    fn write_sequence(&self, children: &[QueryNode], out: &mut String) {
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            self.write_node(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Connector;
    use crate::field::FieldCode;

    fn sample() -> QueryNode {
        QueryNode::root(vec![
            QueryNode::term("learn*", Some(FieldCode::Title)),
            QueryNode::connector(Connector::AndNot),
            QueryNode::group(
                vec![
                    QueryNode::term("son?", None),
                    QueryNode::connector(Connector::Or),
                    QueryNode::term("peace of mind", None),
                ],
                Some(FieldCode::Abstract),
            ),
        ])
    }

    #[test]
    fn test_canonical() {
        assert_eq!(
            Renderer::canonical().render(&sample()),
            "ti[learn*] AND NOT abs([son?] OR [peace of mind])"
        );
    }

    #[test]
    fn test_replace_all_enclosures() {
        let renderer = Renderer::with_enclosures(Enclosures {
            open: "\"",
            close: "\"",
            only_wildcards: false,
        });
        assert_eq!(
            renderer.render(&sample()),
            r#""learn*" AND NOT ("son?" OR "peace of mind")"#
        );
    }

    #[test]
    fn test_replace_only_wildcard_enclosures() {
        let renderer = Renderer::with_enclosures(Enclosures {
            open: "{",
            close: "}",
            only_wildcards: true,
        });
        assert_eq!(
            renderer.render(&sample()),
            "{learn*} AND NOT ({son?} OR [peace of mind])"
        );
    }
}
