//! Pattern compiler: source → blocks → steps → events.

pub mod ast;
pub mod compile;
pub mod error;
pub mod lexer;
pub mod mini;
pub mod modifier;
pub mod note;
pub mod parser;
pub mod pitch;
pub mod scale;
pub mod token;

pub use ast::*;
pub use compile::{CompileOptions, CompiledBlock};
pub use error::CompileError;
pub use scale::{ScaleContext, ScaleTable};

use serde::Serialize;

use crate::event::Event;
use crate::source::{self, ResolvedSource, SourceRef};
use compile::compile_code;
use parser::extract_blocks;

/// Result of compiling one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Compilation {
    /// The code that was compiled, after source resolution.
    pub code: String,
    /// Human-readable status, e.g. `inline: s("bd") (1 lane)`.
    pub status: String,
    pub blocks: Vec<CompiledBlock>,
    pub events: Vec<Event>,
}

impl Compilation {
    pub fn lanes(&self) -> usize {
        self.blocks.len()
    }
}

/// The pattern compiler.
///
/// Compilation never fails: unusable input degrades to fewer events or the
/// default pattern, and the reason shows up in the status line.
pub struct Compiler;

impl Compiler {
    /// Extract the pattern blocks of `code` without generating events.
    pub fn extract(code: &str) -> Vec<PatternBlock> {
        extract_blocks(code)
    }

    /// Compile inline code.
    pub fn compile(code: &str, options: &CompileOptions) -> Compilation {
        let resolved = ResolvedSource {
            code: code.to_string(),
            description: source::describe("inline", code),
        };
        Self::compile_resolved(resolved, options)
    }

    /// Resolve a source reference and compile the result.
    pub fn compile_source(source: Option<&SourceRef>, options: &CompileOptions) -> Compilation {
        Self::compile_resolved(source::resolve(source), options)
    }

    fn compile_resolved(resolved: ResolvedSource, options: &CompileOptions) -> Compilation {
        let (blocks, events) = compile_code(&resolved.code, options);
        Compilation {
            status: source::status_line(&resolved.description, blocks.len()),
            code: resolved.code,
            blocks,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DEFAULT_SOURCE;

    #[test]
    fn compile_inline() {
        let out = Compiler::compile(r#"$: s("bd sd")"#, &CompileOptions::with_cycles(2));
        assert_eq!(out.lanes(), 1);
        assert_eq!(out.events.len(), 4);
        assert_eq!(out.status, r#"inline: $: s("bd sd") (1 lane)"#);
    }

    #[test]
    fn compile_without_source_uses_default() {
        let out = Compiler::compile_source(None, &CompileOptions::with_cycles(1));
        assert_eq!(out.code, DEFAULT_SOURCE);
        assert_eq!(out.status, "default pattern (1 lane)");
        // bd, sd+hh, bd, sd
        assert_eq!(out.events.len(), 5);
    }

    #[test]
    fn compile_share_id_reports_offline() {
        let id = SourceRef::share_id("k3x9");
        let out = Compiler::compile_source(Some(&id), &CompileOptions::default());
        assert_eq!(out.status, "share ID (k3x9) not supported offline (1 lane)");
        assert_eq!(out.code, DEFAULT_SOURCE);
    }

    #[test]
    fn extract_counts_lanes() {
        let blocks = Compiler::extract("$: s(\"bd\")\n$: note(\"c e\")\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].kind, PatternKind::Note);
    }

    #[test]
    fn compile_multiple_lanes_pluralizes() {
        let out = Compiler::compile("$: s(\"bd\")\n$: s(\"hh\")", &CompileOptions::with_cycles(1));
        assert!(out.status.ends_with("(2 lanes)"));
        assert_eq!(out.events.iter().map(|e| e.lane).collect::<Vec<_>>(), vec![0, 1]);
    }
}
