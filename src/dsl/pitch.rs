//! Pitch resolution: turns one raw token into a [`Trigger`], or drops it.

use crate::event::Trigger;

use super::ast::PatternKind;
use super::modifier::parse_number_prefix;
use super::note::parse_note_name;
use super::scale::{ScaleContext, CHROMATIC_BASE};

/// Instrument name for `note(...)` events.
pub const NOTE_INSTRUMENT: &str = "note";

/// Instrument name for `n(...)` events.
pub const DEGREE_INSTRUMENT: &str = "n";

/// Interprets tokens of one block.
#[derive(Debug, Clone, Copy)]
pub struct PitchResolver<'a> {
    kind: PatternKind,
    scale: Option<&'a ScaleContext>,
}

impl<'a> PitchResolver<'a> {
    pub fn new(kind: PatternKind, scale: Option<&'a ScaleContext>) -> Self {
        Self { kind, scale }
    }

    /// Interpret a token. `None` means the token produces no event.
    pub fn resolve(&self, token: &str) -> Option<Trigger> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        match self.kind {
            PatternKind::Note => {
                let midi = parse_note_name(token)?;
                Some(Trigger::pitched(NOTE_INSTRUMENT, midi as f64, token))
            }
            PatternKind::Degree => {
                let degree = parse_degree(token)?;
                let pitch = match self.scale {
                    Some(scale) => scale.degree_to_pitch(degree),
                    None => CHROMATIC_BASE + degree,
                };
                Some(Trigger::pitched(DEGREE_INSTRUMENT, pitch, token))
            }
            PatternKind::Sound => Some(Trigger::sound(token)),
        }
    }
}

/// Degrees take the numeric prefix of the token, like modifier arguments.
fn parse_degree(token: &str) -> Option<f64> {
    parse_number_prefix(token).filter(|d| d.is_finite())
}
