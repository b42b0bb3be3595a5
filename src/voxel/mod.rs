//! Voxel mapping: events laid out as an integer point cloud.

pub mod mapper;
pub mod mapping;
pub mod spawn;

use serde::Serialize;

pub use mapper::{dedupe_occupied, events_to_voxels, VoxelMapper};
pub use mapping::{LaneTable, MappingConfig, Palette};
pub use spawn::SpawnPlan;

/// One grid cell derived from one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Voxel {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub instrument: String,
    pub label: String,
    /// `0xRRGGBB`.
    pub color: u32,
}

impl Voxel {
    pub fn position(&self) -> (i32, i32, i32) {
        (self.x, self.y, self.z)
    }
}
