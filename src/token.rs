//! The token definition for the boolean query language.

/// A token is a single structural unit of a query, with a specific kind and location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub span: Span,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind<'a>, span: Span) -> Self {
        Self { kind, span }
    }

    /// Whether this token is one of the boolean keywords.
    pub fn is_keyword(&self) -> bool {
        matches!(self.kind, TokenKind::And | TokenKind::Or | TokenKind::Not)
    }
}

/// The kind of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind<'a> {
    // Keywords (case-insensitive in the source)
    And, // "AND"
    Or,  // "OR"
    Not, // "NOT"

    // Operands
    Term(&'a str),        // The text between `[` and `]`, verbatim
    FieldPrefix(&'a str), // Letters glued to a following `[` or `(`

    // Punctuation
    LParen, // (
    RParen, // )

    // Anything else outside of a term
    Word(&'a str), // A bare word that is neither a keyword nor a prefix
    Illegal,       // A stray `]` or an unterminated `[`
}

/// Represents a span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// The starting byte offset.
    pub start: usize,
    /// The ending byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// True when `other` starts exactly where this span ends.
    pub fn touches(&self, other: &Span) -> bool {
        self.end == other.start
    }
}
