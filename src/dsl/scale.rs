//! Scales: named interval sets and scale-degree resolution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::note::parse_note_name;

/// Root used when a `.scale(...)` root cannot be parsed.
pub const DEFAULT_ROOT: i32 = 60;

/// Base pitch for degrees when no scale is attached.
pub const CHROMATIC_BASE: f64 = 60.0;

/// Mode assumed when a scale spec has no `:mode` part.
pub const DEFAULT_MODE: &str = "major";

/// Mode used when the requested one is unknown.
pub const FALLBACK_MODE: &str = "minor";

pub const MAJOR: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];
pub const MINOR: [i32; 7] = [0, 2, 3, 5, 7, 8, 10];

/// A root pitch plus the semitone offsets of one octave of a scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleContext {
    pub root: i32,
    intervals: Vec<i32>,
}

impl ScaleContext {
    /// Build a scale. Intervals must start at 0, be strictly increasing and
    /// stay within one octave.
    pub fn new(root: i32, intervals: Vec<i32>) -> Option<Self> {
        if !valid_intervals(&intervals) {
            return None;
        }
        Some(Self { root, intervals })
    }

    pub fn intervals(&self) -> &[i32] {
        &self.intervals
    }

    /// Resolve a (possibly fractional or negative) degree to a pitch.
    ///
    /// Whole degrees wrap into octaves. A fractional part interpolates toward
    /// the next scale step; when stepping past the top of the scale the next
    /// interval is taken an octave up.
    pub fn degree_to_pitch(&self, degree: f64) -> f64 {
        let steps = self.intervals.len() as i64;
        let floor = degree.floor();
        let frac = degree - floor;
        let floor = floor as i64;

        let octave = floor.div_euclid(steps);
        let index = floor.rem_euclid(steps) as usize;
        let interval = self.intervals[index] as f64;
        let base = self.root as f64 + interval + 12.0 * octave as f64;
        if frac == 0.0 {
            return base;
        }

        let next_index = (index + 1) % self.intervals.len();
        let wrap = if index + 1 >= self.intervals.len() {
            12.0
        } else {
            0.0
        };
        let next_interval = self.intervals[next_index] as f64 + 12.0 * octave as f64 + wrap;
        base + frac * (next_interval - interval)
    }
}

fn valid_intervals(intervals: &[i32]) -> bool {
    intervals.first() == Some(&0)
        && intervals.windows(2).all(|w| w[0] < w[1])
        && intervals.last().is_some_and(|&top| top < 12)
}

/// Named interval sets, keyed by lowercase mode name.
///
/// Every entry is a valid interval set; deserializing lowercases the names
/// and drops invalid entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Vec<i32>>",
    into = "BTreeMap<String, Vec<i32>>"
)]
pub struct ScaleTable {
    modes: BTreeMap<String, Vec<i32>>,
}

impl From<BTreeMap<String, Vec<i32>>> for ScaleTable {
    fn from(modes: BTreeMap<String, Vec<i32>>) -> Self {
        let mut table = Self::empty();
        for (mode, intervals) in modes {
            table.insert(&mode, intervals);
        }
        table
    }
}

impl From<ScaleTable> for BTreeMap<String, Vec<i32>> {
    fn from(table: ScaleTable) -> Self {
        table.modes
    }
}

impl ScaleTable {
    pub fn empty() -> Self {
        Self {
            modes: BTreeMap::new(),
        }
    }

    /// Add or replace a mode. Invalid interval sets are rejected.
    pub fn insert(&mut self, mode: &str, intervals: Vec<i32>) -> bool {
        if !valid_intervals(&intervals) {
            warn!(mode = %mode, ?intervals, "ignoring invalid scale intervals");
            return false;
        }
        self.modes.insert(mode.to_ascii_lowercase(), intervals);
        true
    }

    pub fn get(&self, mode: &str) -> Option<&[i32]> {
        self.modes
            .get(&mode.to_ascii_lowercase())
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Resolve a `root:mode` spec such as `"d:major"` or `"C3:dorian"`.
    ///
    /// An unparseable root becomes [`DEFAULT_ROOT`], a missing mode
    /// [`DEFAULT_MODE`], and an unknown mode [`FALLBACK_MODE`].
    pub fn resolve(&self, spec: &str) -> ScaleContext {
        let (root_part, mode_part) = match spec.split_once(':') {
            Some((root, mode)) => (root, Some(mode)),
            None => (spec, None),
        };
        let root = parse_note_name(root_part.trim()).unwrap_or(DEFAULT_ROOT);
        let mode = mode_part
            .map(|m| m.trim().to_ascii_lowercase())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODE.to_string());

        let intervals = match self.get(&mode) {
            Some(intervals) => intervals.to_vec(),
            None => {
                warn!(mode = %mode, "unknown scale mode, falling back to {FALLBACK_MODE}");
                self.get(FALLBACK_MODE)
                    .map(<[i32]>::to_vec)
                    .unwrap_or_else(|| MINOR.to_vec())
            }
        };

        ScaleContext { root, intervals }
    }
}

impl Default for ScaleTable {
    fn default() -> Self {
        let mut modes = BTreeMap::new();
        let builtin: [(&str, &[i32]); 11] = [
            ("major", &MAJOR),
            ("minor", &MINOR),
            ("ionian", &MAJOR),
            ("aeolian", &MINOR),
            ("dorian", &[0, 2, 3, 5, 7, 9, 10]),
            ("phrygian", &[0, 1, 3, 5, 7, 8, 10]),
            ("lydian", &[0, 2, 4, 6, 7, 9, 11]),
            ("mixolydian", &[0, 2, 4, 5, 7, 9, 10]),
            ("locrian", &[0, 1, 3, 5, 6, 8, 10]),
            ("pentatonic", &[0, 2, 4, 7, 9]),
            ("chromatic", &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]),
        ];
        for (name, intervals) in builtin {
            modes.insert(name.to_string(), intervals.to_vec());
        }
        Self { modes }
    }
}
