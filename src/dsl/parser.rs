//! Block extraction.
//!
//! Source text is split into statements at `$:` markers. Each statement is
//! scanned for its first pattern constructor call (`note`, `sound`, `s`,
//! `n`) applied to a single non-empty string literal; the literal becomes the
//! block body and everything after the call's closing parenthesis becomes
//! its modifier text. Statements without such a call are skipped.

use tracing::{debug, info, warn};

use super::ast::{PatternBlock, PatternKind};
use super::error::CompileError;
use super::lexer::Lexer;
use super::token::{Token, TokenKind};

/// Marker that starts a new pattern statement.
pub const STATEMENT_MARKER: &str = "$:";

/// Body of the block used when the source contains none.
pub const DEFAULT_BODY: &str = "bd [sd hh] bd sd";

/// The block compiled when no pattern statement is found.
pub fn default_block() -> PatternBlock {
    PatternBlock::new(PatternKind::Sound, DEFAULT_BODY, "")
}

/// Split source into `$:` statements.
///
/// A marker counts when it is the first non-blank text on a line. Returns the
/// text before the first marker and the text of each statement (marker
/// excluded, trimmed).
pub fn split_statements(source: &str) -> (&str, Vec<&str>) {
    let mut starts = Vec::new();
    let mut offset = 0;
    for line in source.split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        if line[indent..].starts_with(STATEMENT_MARKER) {
            starts.push((offset, offset + indent + STATEMENT_MARKER.len()));
        }
        offset += line.len();
    }

    let prelude = starts.first().map_or(source, |&(line_start, _)| &source[..line_start]);
    let statements = starts
        .iter()
        .enumerate()
        .map(|(i, &(_, body_start))| {
            let end = starts.get(i + 1).map_or(source.len(), |&(next, _)| next);
            source[body_start..end].trim()
        })
        .collect();

    (prelude, statements)
}

/// Parses one statement into at most one [`PatternBlock`].
pub struct Parser<'s> {
    source: &'s str,
    lexer: Lexer,
    tokens: Vec<Token>,
}

impl<'s> Parser<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            lexer: Lexer::new(source),
            tokens: Vec::new(),
        }
    }

    /// Find the first constructor call.
    ///
    /// `Ok(None)` when the statement has none; `Err` when scanning fails
    /// before one is found, or when the only candidate is a call like
    /// `note("c e" .fast(2)` whose literal is not followed by `)`.
    pub fn parse_block(&mut self) -> Result<Option<PatternBlock>, CompileError> {
        while let Some(token) = self.lexer.next_token() {
            self.tokens.push(token?);
            if let Some(block) = self.match_constructor_call() {
                return Ok(Some(block));
            }
        }
        match self.unclosed_constructor_call() {
            Some(err) => Err(err),
            None => Ok(None),
        }
    }

    /// The first `name ( "body"` not followed by `)`.
    fn unclosed_constructor_call(&self) -> Option<CompileError> {
        self.tokens.iter().enumerate().find_map(|(i, name)| {
            let TokenKind::Ident(ident) = &name.kind else {
                return None;
            };
            PatternKind::from_constructor(ident)?;
            let open = self.tokens.get(i + 1)?;
            let literal = self.tokens.get(i + 2)?;
            if open.kind != TokenKind::LParen || !matches!(literal.kind, TokenKind::Str(_)) {
                return None;
            }
            match self.tokens.get(i + 3) {
                Some(close) if close.kind == TokenKind::RParen => None,
                _ => Some(CompileError::parse(
                    format!("expected ')' after {ident}(\"...\""),
                    name.line,
                    name.col,
                )),
            }
        })
    }

    /// Check whether the last four tokens read `name ( "body" )`.
    fn match_constructor_call(&self) -> Option<PatternBlock> {
        let tail = self.tokens.len().checked_sub(4)?;
        let [name, open, literal, close] = &self.tokens[tail..] else {
            return None;
        };
        if open.kind != TokenKind::LParen || close.kind != TokenKind::RParen {
            return None;
        }
        let TokenKind::Ident(ident) = &name.kind else {
            return None;
        };
        let TokenKind::Str(body) = &literal.kind else {
            return None;
        };
        if body.is_empty() {
            return None;
        }
        let kind = PatternKind::from_constructor(ident)?;
        Some(PatternBlock::new(kind, body.as_str(), &self.source[close.end..]))
    }
}

/// Parse a single statement, logging and dropping it on error.
pub fn parse_statement(statement: &str) -> Option<PatternBlock> {
    match Parser::new(statement).parse_block() {
        Ok(Some(block)) => Some(block),
        Ok(None) => {
            debug!(statement, "no pattern constructor in statement");
            None
        }
        Err(e) => {
            debug!(error = %e, statement, "dropping unparseable statement");
            None
        }
    }
}

/// Extract every pattern block from source text. Never empty.
///
/// When no `$:` statement yields a block, the whole source is searched as a
/// single statement; when that fails too, [`default_block`] is returned.
pub fn extract_blocks(source: &str) -> Vec<PatternBlock> {
    let (_, statements) = split_statements(source);
    let mut blocks: Vec<PatternBlock> = statements
        .iter()
        .filter_map(|statement| parse_statement(statement))
        .collect();

    if blocks.is_empty() {
        blocks.extend(parse_statement(source.trim()));
    }

    if blocks.is_empty() {
        warn!("no pattern blocks parsed from input, falling back to default pattern");
        return vec![default_block()];
    }

    for (lane, block) in blocks.iter().enumerate() {
        info!(
            lane,
            kind = %block.kind,
            body = %block.body,
            modifiers = block.modifiers.trim(),
            "parsed pattern block"
        );
    }
    blocks
}
