//! 检索式语法校验
//!
//! 在构建语法树之前拒绝格式错误的输入。每条规则都是一个独立的纯函数，
//! [`validate`] 按固定顺序依次调用，遇到第一个错误立即返回。
//!
//! ## 校验顺序
//!
//! ```text
//! validate()
//!   ├─ check_not_empty()            去掉首尾空白后不能为空
//!   ├─ check_balanced_brackets()    方括号配对
//!   ├─ check_balanced_parentheses() 圆括号配对（忽略检索词内部）
//!   ├─ check_no_empty_brackets()    不允许 `[]`
//!   ├─ check_terms()                每个检索词的内容与通配符规则
//!   ├─ check_terms_separated()      `]` 与 `[` 之间必须有运算符
//!   ├─ check_operator_spacing()     运算符两侧必须有空白
//!   ├─ check_bare_words()           方括号外只能是运算符、括号或字段前缀
//!   ├─ check_not_placement()        NOT 之前必须是 AND
//!   ├─ check_connector_placement()  顶层连接符位置（分组折叠为一个操作数）
//!   ├─ check_connector_runs()       任意深度都不允许连续连接符
//!   ├─ check_has_term()             至少包含一个检索词
//!   └─ check_field_codes()          字段前缀必须是已知代码
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::error::QueryValidationError;
use crate::field::FieldCode;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

lazy_static! {
    static ref TERM_PATTERN: Regex = Regex::new(r"\[([^\]]*)\]").unwrap();
    static ref ADJACENT_TERMS_PATTERN: Regex = Regex::new(r"\]\s*\[").unwrap();
}

/// 星号通配符之前至少需要的字符数
pub const MIN_CHARS_BEFORE_ASTERISK: usize = 3;

/// 看起来像布尔运算符但不被支持的单词
const UNSUPPORTED_OPERATORS: [&str; 3] = ["XOR", "NAND", "NOR"];

type Result<T> = std::result::Result<T, QueryValidationError>;

/// 校验原始检索式
pub fn validate(raw: &str) -> Result<()> {
    let query = raw.trim();

    stage("not_empty", check_not_empty(query))?;
    stage("balanced_brackets", check_balanced_brackets(query))?;
    stage("balanced_parentheses", check_balanced_parentheses(query))?;
    stage("no_empty_brackets", check_no_empty_brackets(query))?;
    stage("terms", check_terms(query))?;
    stage("terms_separated", check_terms_separated(query))?;

    let tokens: Vec<Token<'_>> = Lexer::new(query).collect();

    stage("operator_spacing", check_operator_spacing(&tokens))?;
    stage("bare_words", check_bare_words(query, &tokens))?;
    stage("not_placement", check_not_placement(&tokens))?;
    stage("connector_placement", check_connector_placement(&tokens))?;
    stage("connector_runs", check_connector_runs(&tokens))?;
    stage("has_term", check_has_term(&tokens))?;
    stage("field_codes", check_field_codes(&tokens))?;
    Ok(())
}

fn stage(name: &'static str, result: Result<()>) -> Result<()> {
    match &result {
        Ok(()) => trace!(stage = name, "validator stage passed"),
        Err(err) => trace!(stage = name, error = %err, "validator stage failed"),
    }
    result
}

pub fn check_not_empty(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(QueryValidationError::EmptyQuery);
    }
    Ok(())
}

/// 方括号计数在整个字符串上进行，不区分是否位于圆括号内
pub fn check_balanced_brackets(query: &str) -> Result<()> {
    let mut count: i64 = 0;
    for c in query.chars() {
        match c {
            '[' => count += 1,
            ']' => count -= 1,
            _ => {}
        }
        if count < 0 {
            return Err(QueryValidationError::UnbalancedBrackets);
        }
    }
    if count != 0 {
        return Err(QueryValidationError::UnbalancedBrackets);
    }
    Ok(())
}

/// 只统计检索词之外的圆括号
pub fn check_balanced_parentheses(query: &str) -> Result<()> {
    let mut count: i64 = 0;
    let mut inside_term = false;
    for c in query.chars() {
        match c {
            '[' => inside_term = true,
            ']' => inside_term = false,
            '(' if !inside_term => count += 1,
            ')' if !inside_term => count -= 1,
            _ => {}
        }
        if count < 0 {
            return Err(QueryValidationError::UnbalancedParentheses);
        }
    }
    if count != 0 {
        return Err(QueryValidationError::UnbalancedParentheses);
    }
    Ok(())
}

pub fn check_no_empty_brackets(query: &str) -> Result<()> {
    if query.contains("[]") {
        return Err(QueryValidationError::EmptyTerm);
    }
    Ok(())
}

pub fn check_terms(query: &str) -> Result<()> {
    for cap in TERM_PATTERN.captures_iter(query) {
        if let Some(m) = cap.get(1) {
            validate_term(m.as_str())?;
        }
    }
    Ok(())
}

/// 校验单个检索词（不含方括号）
pub fn validate_term(term: &str) -> Result<()> {
    if term.trim().is_empty() {
        return Err(QueryValidationError::EmptyTerm);
    }

    if term.contains('"') {
        return Err(QueryValidationError::TermContainsQuotes(term.to_string()));
    }

    let wildcards = term.chars().filter(|c| matches!(c, '?' | '*')).count();
    if wildcards == 0 {
        return Ok(());
    }

    if wildcards > 1 {
        return Err(QueryValidationError::MultipleWildcards(term.to_string()));
    }

    if term.starts_with(['?', '*']) {
        return Err(QueryValidationError::WildcardAtStart(term.to_string()));
    }

    if term.chars().any(char::is_whitespace) {
        return Err(QueryValidationError::WildcardInMultiWordTerm(term.to_string()));
    }

    if let Some(position) = term.chars().position(|c| c == '*') {
        if position != term.chars().count() - 1 {
            return Err(QueryValidationError::AsteriskNotAtEnd(term.to_string()));
        }
        if position < MIN_CHARS_BEFORE_ASTERISK {
            return Err(QueryValidationError::TooFewCharsBeforeAsterisk(term.to_string()));
        }
    }

    Ok(())
}

pub fn check_terms_separated(query: &str) -> Result<()> {
    if ADJACENT_TERMS_PATTERN.is_match(query) {
        return Err(QueryValidationError::MissingOperator);
    }
    Ok(())
}

/// 关键字不能与检索词的方括号直接相连，例如 `[a]OR[b]`
pub fn check_operator_spacing(tokens: &[Token<'_>]) -> Result<()> {
    let is_term = |token: &Token<'_>| matches!(token.kind, TokenKind::Term(_));

    for (i, token) in tokens.iter().enumerate() {
        if !token.is_keyword() {
            continue;
        }
        let glued_before = i
            .checked_sub(1)
            .and_then(|prev| tokens.get(prev))
            .is_some_and(|prev| is_term(prev) && prev.span.touches(&token.span));
        let glued_after = tokens
            .get(i + 1)
            .is_some_and(|next| is_term(next) && token.span.touches(&next.span));
        if glued_before || glued_after {
            return Err(QueryValidationError::MissingWhitespace);
        }
    }
    Ok(())
}

/// 方括号之外除运算符、括号和字段前缀外不允许出现其他文本
pub fn check_bare_words(query: &str, tokens: &[Token<'_>]) -> Result<()> {
    for token in tokens {
        match token.kind {
            TokenKind::Word(word) => {
                let upper = word.to_ascii_uppercase();
                if UNSUPPORTED_OPERATORS.contains(&upper.as_str()) {
                    return Err(QueryValidationError::InvalidOperator(word.to_string()));
                }
                return Err(QueryValidationError::UnbracketedText(word.to_string()));
            }
            TokenKind::Illegal => {
                let text = &query[token.span.start..token.span.end];
                return Err(QueryValidationError::UnbracketedText(text.to_string()));
            }
            _ => {}
        }
    }
    Ok(())
}

pub fn check_not_placement(tokens: &[Token<'_>]) -> Result<()> {
    for (i, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::Not {
            continue;
        }
        let after_and = i
            .checked_sub(1)
            .and_then(|prev| tokens.get(prev))
            .is_some_and(|prev| prev.kind == TokenKind::And);
        if !after_and {
            return Err(QueryValidationError::NotWithoutAnd);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Operand,
    Connector,
}

/// 把分组折叠为单个操作数后检查顶层的连接符位置
///
/// 只检查顶层序列，分组内部的位置错误不会在这里发现。
pub fn check_connector_placement(tokens: &[Token<'_>]) -> Result<()> {
    let shapes = top_level_shapes(tokens);

    if shapes.first() == Some(&Shape::Connector) {
        return Err(QueryValidationError::ConnectorAtStart);
    }
    if shapes.last() == Some(&Shape::Connector) {
        return Err(QueryValidationError::ConnectorAtEnd);
    }
    for pair in shapes.windows(2) {
        match (pair[0], pair[1]) {
            (Shape::Connector, Shape::Connector) => {
                return Err(QueryValidationError::ConsecutiveConnectors)
            }
            (Shape::Operand, Shape::Operand) => return Err(QueryValidationError::MissingOperator),
            _ => {}
        }
    }
    Ok(())
}

/// 连接符之后紧跟另一个连接符（`AND NOT` 视为一个），分组内部同样检查
pub fn check_connector_runs(tokens: &[Token<'_>]) -> Result<()> {
    let mut after_connector = false;
    let mut iter = tokens.iter().peekable();

    while let Some(token) = iter.next() {
        let is_connector = match token.kind {
            TokenKind::And => {
                if iter.peek().is_some_and(|next| next.kind == TokenKind::Not) {
                    iter.next();
                }
                true
            }
            TokenKind::Or | TokenKind::Not => true,
            _ => false,
        };
        if is_connector && after_connector {
            return Err(QueryValidationError::ConsecutiveConnectors);
        }
        after_connector = is_connector;
    }
    Ok(())
}

fn top_level_shapes(tokens: &[Token<'_>]) -> Vec<Shape> {
    let mut shapes = Vec::new();
    let mut depth = 0usize;
    let mut iter = tokens.iter().peekable();

    while let Some(token) = iter.next() {
        match token.kind {
            TokenKind::LParen => {
                if depth == 0 {
                    shapes.push(Shape::Operand);
                }
                depth += 1;
            }
            TokenKind::RParen => depth = depth.saturating_sub(1),
            _ if depth > 0 => {}
            TokenKind::Term(_) => shapes.push(Shape::Operand),
            TokenKind::And => {
                // AND NOT 合并为一个连接符
                if iter.peek().is_some_and(|next| next.kind == TokenKind::Not) {
                    iter.next();
                }
                shapes.push(Shape::Connector);
            }
            TokenKind::Or | TokenKind::Not => shapes.push(Shape::Connector),
            TokenKind::FieldPrefix(_) | TokenKind::Word(_) | TokenKind::Illegal => {}
        }
    }
    shapes
}

pub fn check_has_term(tokens: &[Token<'_>]) -> Result<()> {
    if !tokens.iter().any(|t| matches!(t.kind, TokenKind::Term(_))) {
        return Err(QueryValidationError::NoTerm);
    }
    Ok(())
}

pub fn check_field_codes(tokens: &[Token<'_>]) -> Result<()> {
    for token in tokens {
        if let TokenKind::FieldPrefix(code) = token.kind {
            if FieldCode::lookup(code).is_none() {
                return Err(QueryValidationError::InvalidFieldCode(code.to_string()));
            }
        }
    }
    Ok(())
}
