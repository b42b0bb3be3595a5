//! Event → voxel mapping.
//!
//! x follows time (one block per `1 / time_blocks_per_cycle` of a cycle),
//! y follows pitch, and z follows the instrument's lane.

use std::collections::HashSet;

use crate::event::Event;

use super::mapping::{LaneTable, MappingConfig, Palette};
use super::Voxel;

/// Maps events onto integer grid cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoxelMapper {
    pub mapping: MappingConfig,
    pub lanes: LaneTable,
    pub palette: Palette,
}

impl VoxelMapper {
    pub fn new(mapping: MappingConfig, lanes: LaneTable, palette: Palette) -> Self {
        Self {
            mapping,
            lanes,
            palette,
        }
    }

    /// One voxel per event, in event order.
    pub fn map(&self, events: &[Event]) -> Vec<Voxel> {
        events.iter().map(|event| self.voxel_for(event)).collect()
    }

    pub fn voxel_for(&self, event: &Event) -> Voxel {
        Voxel {
            x: self.x_for(event),
            y: self.y_for(event),
            z: self.z_for(event),
            instrument: event.instrument.clone(),
            label: event.label.clone(),
            color: self.palette.color_for(&event.instrument),
        }
    }

    fn x_for(&self, event: &Event) -> i32 {
        let blocks = u64::from(self.mapping.time_blocks_per_cycle);
        let cycle_start = i64::from(event.cycle) * blocks as i64;
        let within = event.time.floor_scaled(blocks) as i64;
        saturate(cycle_start + within - self.mapping.center_offset())
    }

    fn y_for(&self, event: &Event) -> i32 {
        let pitch = event.pitch.unwrap_or(self.mapping.default_pitch);
        let height = f64::from(self.mapping.base_height)
            + (pitch - self.mapping.pitch_base) * self.mapping.pitch_scale;
        round_half_up(height)
    }

    /// Known instruments share a lane whatever block they come from; the rest
    /// are kept apart per block.
    fn z_for(&self, event: &Event) -> i32 {
        let lane = self.lanes.get(&event.instrument).unwrap_or_else(|| {
            let block = i32::try_from(event.lane).unwrap_or(i32::MAX);
            self.mapping.pattern_lane_base.saturating_add(block)
        });
        round_half_up(f64::from(lane) * self.mapping.lane_spacing)
    }
}

/// Map events with the default tables.
pub fn events_to_voxels(events: &[Event]) -> Vec<Voxel> {
    VoxelMapper::default().map(events)
}

/// Keep the first voxel of each occupied cell, preserving order.
pub fn dedupe_occupied(voxels: &[Voxel]) -> Vec<Voxel> {
    let mut occupied = HashSet::new();
    voxels
        .iter()
        .filter(|voxel| occupied.insert(voxel.position()))
        .cloned()
        .collect()
}

/// Round to nearest, halves toward +∞.
fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
