//! Event data model: one sounding token at a fixed position inside a cycle.
//!
//! An [`Event`] is the only product of pattern compilation. Events are
//! immutable once generated and are emitted ordered by lane, then cycle,
//! then time.

use serde::Serialize;

use super::time::CycleTime;

/// Velocity carried by every generated event.
pub const DEFAULT_VELOCITY: f32 = 1.0;

/// What an interpreted token triggers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trigger {
    /// Instrument name ("note", "n", or the sound name itself).
    pub instrument: String,
    /// Pitch in MIDI note numbers; may be fractional. `None` for unpitched sounds.
    pub pitch: Option<f64>,
    /// The raw token the trigger was read from.
    pub label: String,
}

impl Trigger {
    /// A pitched trigger.
    pub fn pitched(instrument: &str, pitch: f64, label: &str) -> Self {
        Self {
            instrument: instrument.to_string(),
            pitch: Some(pitch),
            label: label.to_string(),
        }
    }

    /// An unpitched sound, named after its token.
    pub fn sound(name: &str) -> Self {
        Self {
            instrument: name.to_string(),
            pitch: None,
            label: name.to_string(),
        }
    }
}

/// A single event in the compiled pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    /// Zero-based cycle index.
    pub cycle: u32,
    /// Onset within the cycle, in `[0, 1)`.
    pub time: CycleTime,
    /// Length as a fraction of one cycle, in `(0, 1]`.
    pub duration: CycleTime,
    pub velocity: f32,
    pub pitch: Option<f64>,
    pub instrument: String,
    pub label: String,
    /// Position of the source block among all blocks.
    pub lane: u32,
}

impl Event {
    /// Build an event from an interpreted trigger.
    pub fn new(
        cycle: u32,
        time: CycleTime,
        duration: CycleTime,
        lane: u32,
        trigger: Trigger,
    ) -> Self {
        Self {
            cycle,
            time,
            duration,
            velocity: DEFAULT_VELOCITY,
            pitch: trigger.pitch,
            instrument: trigger.instrument,
            label: trigger.label,
            lane,
        }
    }

    /// Absolute position in cycles (`cycle + time`).
    pub fn position(&self) -> f64 {
        self.cycle as f64 + self.time.as_f64()
    }
}
