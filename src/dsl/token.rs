//! Token types for the statement lexer.

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub col: usize,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset just past the last character.
    pub end: usize,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier (`note`, `fast`, `$foo`).
    Ident(String),
    /// Numeric literal, kept as written.
    Number(String),
    /// String literal in `'`, `"` or backtick quotes, without the quotes.
    Str(String),

    LParen,
    RParen,
    Dot,
    Comma,

    /// Any other single character; the lexer never rejects input.
    Symbol(char),
}
