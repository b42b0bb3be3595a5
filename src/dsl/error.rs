//! Error types for the pattern compiler.
//!
//! These never escape the public compile entry points: each one marks a
//! local defect that the caller degrades (drops a statement, falls back to a
//! default value) after logging it.

use thiserror::Error;

/// An error that occurred while scanning or parsing pattern source.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("[{line}:{col}] {kind:?}: {message}")]
pub struct CompileError {
    pub message: String,
    pub line: usize,
    pub col: usize,
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LexError,
    ParseError,
    ModifierError,
}

impl CompileError {
    pub fn lex(message: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            message: message.into(),
            line,
            col,
            kind: ErrorKind::LexError,
        }
    }

    pub fn parse(message: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            message: message.into(),
            line,
            col,
            kind: ErrorKind::ParseError,
        }
    }

    pub fn modifier(message: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            message: message.into(),
            line,
            col,
            kind: ErrorKind::ModifierError,
        }
    }
}
