//! 检索式的结构词法分析器
//!
//! 方括号内的文本原样作为一个 `Term` token，其中出现的 `(`、`)`
//! 或者看起来像运算符的文字都不会被拆开。方括号之外只识别
//! 括号、`AND`/`OR`/`NOT` 关键字、字段前缀以及其余的裸词。

use crate::token::{Span, Token, TokenKind};

pub struct Lexer<'a> {
    input: &'a str,
    /// 输入字符串中的当前位置（字节索引）
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, position: 0 }
    }

    /// 返回当前位置的字符，不推进位置
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// 推进位置一个字符并返回该字符
    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(c) = c {
            self.position += c.len_utf8();
        }
        c
    }

    /// 跳过空白字符
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    /// 读取方括号包围的检索词
    /// 注意：开始的 `[` 已经被调用者消费
    fn read_term(&mut self, start: usize) -> Token<'a> {
        let content_start = self.position;
        match self.input[content_start..].find(']') {
            Some(offset) => {
                let content_end = content_start + offset;
                self.position = content_end + 1; // 消费结束的 `]`
                Token::new(
                    TokenKind::Term(&self.input[content_start..content_end]),
                    Span::new(start, self.position),
                )
            }
            None => {
                // 没有闭合的方括号，吞掉剩余输入
                self.position = self.input.len();
                Token::new(TokenKind::Illegal, Span::new(start, self.position))
            }
        }
    }

    /// 读取裸词：关键字、字段前缀或者其他文本
    fn read_word(&mut self, start: usize) -> Token<'a> {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || is_delimiter(c) {
                break;
            }
            self.bump();
        }
        let literal = &self.input[start..self.position];
        let span = Span::new(start, self.position);

        if let Some(kind) = match_keyword(literal) {
            return Token::new(kind, span);
        }

        // 紧跟 `[` 或 `(` 的纯字母单词视为字段前缀，是否合法由校验器判断
        let glued = matches!(self.peek(), Some('[') | Some('('));
        if glued && literal.chars().all(|c| c.is_ascii_alphabetic()) {
            return Token::new(TokenKind::FieldPrefix(literal), span);
        }

        Token::new(TokenKind::Word(literal), span)
    }
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '[' | ']' | '(' | ')')
}

fn match_keyword(s: &str) -> Option<TokenKind<'static>> {
    match s.to_ascii_uppercase().as_str() {
        "AND" => Some(TokenKind::And),
        "OR" => Some(TokenKind::Or),
        "NOT" => Some(TokenKind::Not),
        _ => None,
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        let start = self.position;

        let Some(c) = self.bump() else {
            return None; // 到达输入末尾
        };

        let token = match c {
            '(' => Token::new(TokenKind::LParen, Span::new(start, self.position)),
            ')' => Token::new(TokenKind::RParen, Span::new(start, self.position)),
            '[' => self.read_term(start),
            ']' => Token::new(TokenKind::Illegal, Span::new(start, self.position)),
            _ => self.read_word(start),
        };
        Some(token)
    }
}
