//! 检索式的语法分析器
//!
//! ## 解析流程图
//!
//! ```text
//! parse()
//!   └─ parse_sequence(depth = 0)
//!        ├─ AND / OR / NOT   → 放入连接符缓冲区
//!        ├─ 字段前缀         → parse_operand(Some(field))
//!        ├─ "[" 检索词 / "(" → parse_operand(None)
//!        │    ├─ 先把缓冲区输出为 Connector 节点
//!        │    ├─ 检索词 → Term { value, field }
//!        │    └─ 分组   → parse_sequence(depth + 1) → Group { children, field }
//!        └─ ")"              → 结束当前分组
//! ```
//!
//! 解析器只接受已经通过 [`validate`](crate::validator::validate) 的输入，
//! 自身不做语法层面的拒绝。这里返回的 [`ParseError`] 都表示内部不变量被破坏，
//! 唯一可以由合法输入触发的是嵌套深度超限。连续的连接符在任意深度上都已被
//! 校验器拒绝，所以缓冲区里只会出现 `AND`、`OR` 或 `AND NOT`。

use tracing::trace;

use crate::ast::{Connector, QueryNode};
use crate::config::{CompilerConfig, DEFAULT_MAX_NESTING_DEPTH};
use crate::error::ParseError;
use crate::field::FieldCode;
use crate::lexer::Lexer;
use crate::token::{Span, Token, TokenKind};

pub struct Parser<'a> {
    tokens: &'a [Token<'a>],
    position: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token<'a>]) -> Self {
        Self::with_max_depth(tokens, DEFAULT_MAX_NESTING_DEPTH)
    }

    pub fn with_max_depth(tokens: &'a [Token<'a>], max_depth: usize) -> Self {
        Self {
            tokens,
            position: 0,
            max_depth,
        }
    }

    /// 返回当前 token 并推进位置
    fn advance(&mut self) -> Option<&'a Token<'a>> {
        let tokens = self.tokens;
        let token = tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    pub fn parse(&mut self) -> Result<QueryNode, ParseError> {
        let children = self.parse_sequence(0)?;
        Ok(QueryNode::root(children))
    }

    /// 解析一层节点序列，直到输入结束或遇到闭合的 `)`
    fn parse_sequence(&mut self, depth: usize) -> Result<Vec<QueryNode>, ParseError> {
        let mut nodes = Vec::new();
        let mut pending: Vec<&'a Token<'a>> = Vec::new();

        while let Some(token) = self.advance() {
            match token.kind {
                TokenKind::And | TokenKind::Or | TokenKind::Not => pending.push(token),
                TokenKind::FieldPrefix(code) => {
                    let field = FieldCode::lookup(code).ok_or_else(|| {
                        ParseError::at_position(format!("Unknown field code: {}", code), token.span)
                    })?;
                    self.parse_operand(Some(field), depth, &mut pending, &mut nodes)?;
                }
                TokenKind::Term(_) | TokenKind::LParen => {
                    self.position -= 1; // 交给 parse_operand 重新消费
                    self.parse_operand(None, depth, &mut pending, &mut nodes)?;
                }
                TokenKind::RParen => {
                    if depth == 0 {
                        return Err(ParseError::at_position(
                            "Unexpected ')'".to_string(),
                            token.span,
                        ));
                    }
                    // 分组末尾残留的连接符没有右操作数，直接丢弃
                    return Ok(nodes);
                }
                TokenKind::Word(_) | TokenKind::Illegal => {
                    return Err(ParseError::at_position(
                        format!("Unexpected token: {:?}", token.kind),
                        token.span,
                    ));
                }
            }
        }

        if depth > 0 {
            return Err(ParseError::new(
                "Unexpected end of input: unterminated group".to_string(),
                None,
            ));
        }
        Ok(nodes)
    }

    /// 解析一个检索词或分组，并在它之前输出缓冲的连接符
    fn parse_operand(
        &mut self,
        field: Option<FieldCode>,
        depth: usize,
        pending: &mut Vec<&'a Token<'a>>,
        nodes: &mut Vec<QueryNode>,
    ) -> Result<(), ParseError> {
        let token = self.advance().ok_or_else(|| {
            ParseError::new("Unexpected end of input after field prefix".to_string(), None)
        })?;

        match token.kind {
            TokenKind::Term(value) => {
                flush_connector(pending, nodes)?;
                nodes.push(QueryNode::term(value, field));
            }
            TokenKind::LParen => {
                flush_connector(pending, nodes)?;
                if depth + 1 > self.max_depth {
                    return Err(ParseError::at_position(
                        format!("Maximum nesting depth of {} exceeded", self.max_depth),
                        token.span,
                    ));
                }
                let children = self.parse_sequence(depth + 1)?;
                nodes.push(QueryNode::group(children, field));
            }
            _ => {
                return Err(ParseError::at_position(
                    format!("Expected a term or a group, found {:?}", token.kind),
                    token.span,
                ));
            }
        }
        Ok(())
    }
}

/// 把缓冲区中的关键字输出为一个 Connector 节点
fn flush_connector(
    pending: &mut Vec<&Token<'_>>,
    nodes: &mut Vec<QueryNode>,
) -> Result<(), ParseError> {
    let (Some(first), Some(last)) = (pending.first(), pending.last()) else {
        return Ok(());
    };
    let span = Span::new(first.span.start, last.span.end);

    let kinds: Vec<&TokenKind<'_>> = pending.iter().map(|t| &t.kind).collect();
    let connector = match kinds.as_slice() {
        [TokenKind::And] => Connector::And,
        [TokenKind::Or] => Connector::Or,
        [TokenKind::And, TokenKind::Not] => Connector::AndNot,
        _ => {
            return Err(ParseError::at_position(
                format!("Invalid connector sequence: {:?}", kinds),
                span,
            ));
        }
    };

    trace!(%connector, "emit connector");
    nodes.push(QueryNode::connector(connector));
    pending.clear();
    Ok(())
}

/// 词法分析并解析一个已通过校验的检索式
pub fn parse(raw: &str) -> Result<QueryNode, ParseError> {
    parse_with_config(raw, &CompilerConfig::default())
}

pub fn parse_with_config(raw: &str, config: &CompilerConfig) -> Result<QueryNode, ParseError> {
    let tokens: Vec<Token<'_>> = Lexer::new(raw).collect();
    Parser::with_max_depth(&tokens, config.max_nesting_depth).parse()
}
