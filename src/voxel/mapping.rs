//! Mapping tables: layout constants, instrument lanes, instrument colours.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Constants of the event → voxel layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Blocks along x per cycle.
    pub time_blocks_per_cycle: u32,
    /// Pitch that sits at `base_height`.
    pub pitch_base: f64,
    /// Blocks along z between adjacent lanes.
    pub lane_spacing: f64,
    pub base_height: i32,
    /// First lane used for instruments missing from the lane table.
    pub pattern_lane_base: i32,
    /// Cycles shifted left of x = 0.
    pub center_cycles: u32,
    /// Pitch assumed for unpitched events.
    pub default_pitch: f64,
    /// Blocks of height per semitone.
    pub pitch_scale: f64,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            time_blocks_per_cycle: 8,
            pitch_base: 36.0,
            lane_spacing: 2.0,
            base_height: 4,
            pattern_lane_base: 12,
            center_cycles: 2,
            default_pitch: 60.0,
            pitch_scale: 0.25,
        }
    }
}

impl MappingConfig {
    /// x offset subtracted from every voxel.
    pub fn center_offset(&self) -> i64 {
        i64::from(self.time_blocks_per_cycle) * i64::from(self.center_cycles)
    }
}

/// Instrument → lane index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaneTable(BTreeMap<String, i32>);

impl LaneTable {
    pub fn insert(&mut self, instrument: impl Into<String>, lane: i32) {
        self.0.insert(instrument.into(), lane);
    }

    pub fn get(&self, instrument: &str) -> Option<i32> {
        self.0.get(instrument).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for LaneTable {
    /// Drum kit lanes, kick nearest the player.
    fn default() -> Self {
        let lanes = [
            ("bd", -4),
            ("sd", -2),
            ("rim", -1),
            ("hh", 0),
            ("oh", 1),
            ("lt", 2),
            ("mt", 3),
            ("ht", 4),
            ("rd", 5),
            ("cr", 6),
        ];
        Self(
            lanes
                .into_iter()
                .map(|(name, lane)| (name.to_string(), lane))
                .collect(),
        )
    }
}

/// Palette key used for instruments without their own colour.
pub const DEFAULT_COLOR_KEY: &str = "default";

/// Colour used when the palette has no `default` entry either.
pub const FALLBACK_COLOR: u32 = 0xffffff;

/// Instrument → `0xRRGGBB` colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(BTreeMap<String, u32>);

impl Palette {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, instrument: impl Into<String>, color: u32) {
        self.0.insert(instrument.into(), color & 0xffffff);
    }

    /// Colour for `instrument`, falling back to the `default` entry.
    pub fn color_for(&self, instrument: &str) -> u32 {
        self.0
            .get(instrument)
            .or_else(|| self.0.get(DEFAULT_COLOR_KEY))
            .copied()
            .unwrap_or(FALLBACK_COLOR)
    }
}

impl Default for Palette {
    fn default() -> Self {
        let colors = [
            ("bd", 0x8b4513),
            ("sd", 0xc0c0c0),
            ("rim", 0xd1a26d),
            ("hh", 0xf2d16b),
            ("oh", 0xf4f1c9),
            ("lt", 0x9c6f56),
            ("mt", 0xa98274),
            ("ht", 0xc79f8f),
            ("rd", 0x66b3ff),
            ("cr", 0xffd966),
            ("note", 0x88c0ff),
            ("n", 0xffa94d),
            ("sound", 0xb0bec5),
            (DEFAULT_COLOR_KEY, FALLBACK_COLOR),
        ];
        Self(
            colors
                .into_iter()
                .map(|(name, color)| (name.to_string(), color))
                .collect(),
        )
    }
}
