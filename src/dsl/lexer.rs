//! Lexer for pattern statements.
//!
//! Scans JavaScript-flavoured statement text (`note("c e g").fast(2)`) into
//! [`Token`]s with line/column and byte spans. It only distinguishes what the
//! parser needs: identifiers, string literals, numbers, and call punctuation.
//! Everything else becomes [`TokenKind::Symbol`], so the only failure is an
//! unterminated string literal.

use super::error::CompileError;
use super::token::{Token, TokenKind};

pub struct Lexer {
    chars: Vec<(usize, char)>,
    len: usize,
    pos: usize,
    line: usize,
    col: usize,
    failed: bool,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.char_indices().collect(),
            len: source.len(),
            pos: 0,
            line: 1,
            col: 1,
            failed: false,
        }
    }

    /// Scan the whole input. Stops at the first error.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, CompileError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token?);
        }
        Ok(tokens)
    }

    /// Scan the next token. Returns `None` at end of input or after an error.
    pub fn next_token(&mut self) -> Option<Result<Token, CompileError>> {
        if self.failed {
            return None;
        }

        self.skip_trivia();
        if self.is_at_end() {
            return None;
        }

        let ch = self.peek();
        let token = match ch {
            '(' => self.single_char(TokenKind::LParen),
            ')' => self.single_char(TokenKind::RParen),
            '.' => self.single_char(TokenKind::Dot),
            ',' => self.single_char(TokenKind::Comma),
            '"' | '\'' | '`' => match self.lex_string(ch) {
                Ok(token) => token,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            },
            '0'..='9' => self.lex_number(),
            c if is_ident_start(c) => self.lex_ident(),
            c => self.single_char(TokenKind::Symbol(c)),
        };

        Some(Ok(token))
    }

    fn peek(&self) -> char {
        self.chars[self.pos].1
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).map(|&(_, c)| c)
    }

    fn offset(&self) -> usize {
        self.chars.get(self.pos).map_or(self.len, |&(i, _)| i)
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.pos].1;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        ch
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Skip whitespace and `//` / `/* */` comments.
    fn skip_trivia(&mut self) {
        loop {
            while !self.is_at_end() && self.peek().is_whitespace() {
                self.advance();
            }
            if self.is_at_end() || self.peek() != '/' {
                return;
            }
            match self.peek_next() {
                Some('/') => {
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.advance();
                    }
                }
                Some('*') => {
                    self.advance();
                    self.advance();
                    while !self.is_at_end() {
                        if self.peek() == '*' && self.peek_next() == Some('/') {
                            self.advance();
                            self.advance();
                            break;
                        }
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    fn single_char(&mut self, kind: TokenKind) -> Token {
        let (line, col, start) = (self.line, self.col, self.offset());
        self.advance();
        Token {
            kind,
            line,
            col,
            start,
            end: self.offset(),
        }
    }

    fn lex_string(&mut self, quote: char) -> Result<Token, CompileError> {
        let (line, col, start) = (self.line, self.col, self.offset());
        self.advance(); // opening quote
        let mut s = String::new();
        while !self.is_at_end() && self.peek() != quote {
            let ch = self.advance();
            if ch == '\\' && !self.is_at_end() {
                s.push(self.advance());
            } else {
                s.push(ch);
            }
        }
        if self.is_at_end() {
            return Err(CompileError::lex("unclosed string literal", line, col));
        }
        self.advance(); // closing quote
        Ok(Token {
            kind: TokenKind::Str(s),
            line,
            col,
            start,
            end: self.offset(),
        })
    }

    fn lex_number(&mut self) -> Token {
        let (line, col, start) = (self.line, self.col, self.offset());
        let mut s = String::new();
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            s.push(self.advance());
        }
        if !self.is_at_end()
            && self.peek() == '.'
            && self.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            s.push(self.advance());
            while !self.is_at_end() && self.peek().is_ascii_digit() {
                s.push(self.advance());
            }
        }
        Token {
            kind: TokenKind::Number(s),
            line,
            col,
            start,
            end: self.offset(),
        }
    }

    fn lex_ident(&mut self) -> Token {
        let (line, col, start) = (self.line, self.col, self.offset());
        let mut s = String::new();
        while !self.is_at_end() && is_ident_continue(self.peek()) {
            s.push(self.advance());
        }
        Token {
            kind: TokenKind::Ident(s),
            line,
            col,
            start,
            end: self.offset(),
        }
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, CompileError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
