//! Abstract syntax for pattern blocks and the mini-notation subset.

use std::fmt;

use serde::Serialize;

/// How the tokens inside a block are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// `note("c4 e4")`: absolute note names.
    Note,
    /// `sound("bd sd")` / `s("bd sd")`: sample names.
    Sound,
    /// `n("0 2 4")`: scale degrees.
    Degree,
}

impl PatternKind {
    /// Map a constructor name to its kind. Matching ignores ASCII case.
    pub fn from_constructor(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "note" => Some(Self::Note),
            "sound" | "s" => Some(Self::Sound),
            "n" => Some(Self::Degree),
            _ => None,
        }
    }

    /// The canonical constructor name.
    pub fn constructor(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Sound => "s",
            Self::Degree => "n",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.constructor())
    }
}

/// One pattern statement found in source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternBlock {
    pub kind: PatternKind,
    /// Contents of the quoted mini-notation literal.
    pub body: String,
    /// Raw text following the constructor call (`.fast(2).scale("c:major")`).
    pub modifiers: String,
}

impl PatternBlock {
    pub fn new(kind: PatternKind, body: impl Into<String>, modifiers: impl Into<String>) -> Self {
        Self {
            kind,
            body: body.into(),
            modifiers: modifiers.into(),
        }
    }
}

/// A parsed unit of mini-notation.
#[derive(Debug, Clone, PartialEq)]
pub enum Unit {
    /// `~`, `.` or an empty group.
    Rest,
    /// A single token.
    Word(String),
    /// `[a b c]`: tokens sharing one slot.
    Group(Vec<String>),
    /// `x*n` or `x!n`: `count` consecutive copies of `unit`.
    Repeat { unit: Box<Unit>, count: usize },
}

impl Unit {
    /// Expand into rhythmic steps.
    pub fn push_steps(&self, out: &mut Vec<Step>) {
        match self {
            Unit::Rest => out.push(Step::rest()),
            Unit::Word(token) => out.push(Step::single(token.clone())),
            Unit::Group(tokens) => out.push(Step::stack(tokens.clone())),
            Unit::Repeat { unit, count } => {
                for _ in 0..*count {
                    unit.push_steps(out);
                }
            }
        }
    }
}

/// One rhythmic slot: zero tokens is a rest, several tokens sound together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Step {
    pub tokens: Vec<String>,
}

impl Step {
    pub fn rest() -> Self {
        Self::default()
    }

    pub fn single(token: impl Into<String>) -> Self {
        Self {
            tokens: vec![token.into()],
        }
    }

    pub fn stack(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    pub fn is_rest(&self) -> bool {
        self.tokens.is_empty()
    }
}
