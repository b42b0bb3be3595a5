//! Spawn platform placed just before the first voxels.

use serde::Serialize;

use super::mapping::MappingConfig;
use super::Voxel;

/// Platform width along x.
pub const PLATFORM_DEPTH: i32 = 4;

/// Platform margin along z on either side of the voxel lanes.
pub const PLATFORM_MARGIN: i32 = 2;

/// Height of the player's eyes above the platform.
pub const PLAYER_EYE_HEIGHT: f64 = 2.0;

/// Where to build the spawn platform and put the player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpawnPlan {
    pub x_start: i32,
    pub x_end: i32,
    pub z_start: i32,
    pub z_end: i32,
    pub platform_y: i32,
    pub player_position: [f64; 3],
}

impl SpawnPlan {
    /// Plan a platform left of the voxels spanning every lane.
    ///
    /// Returns `None` when there is nothing to stand in front of.
    pub fn compute(voxels: &[Voxel], mapping: &MappingConfig) -> Option<Self> {
        let first = voxels.first()?;
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut min_z, mut max_z) = (first.z, first.z);
        for voxel in &voxels[1..] {
            min_x = min_x.min(voxel.x);
            min_y = min_y.min(voxel.y);
            min_z = min_z.min(voxel.z);
            max_z = max_z.max(voxel.z);
        }

        let x_start = min_x.saturating_sub(PLATFORM_DEPTH);
        let x_end = x_start.saturating_add(PLATFORM_DEPTH - 1);
        let z_start = min_z.saturating_sub(PLATFORM_MARGIN);
        let z_end = max_z.saturating_add(PLATFORM_MARGIN);
        let platform_y = min_y
            .saturating_sub(1)
            .max(mapping.base_height.saturating_sub(1));

        let mid = |a: i32, b: i32| (f64::from(a) + f64::from(b)) / 2.0;
        Some(Self {
            x_start,
            x_end,
            z_start,
            z_end,
            platform_y,
            player_position: [
                mid(x_start, x_end),
                f64::from(platform_y) + PLAYER_EYE_HEIGHT,
                mid(z_start, z_end),
            ],
        })
    }

    /// Every platform cell, x-major.
    pub fn platform_blocks(&self) -> Vec<(i32, i32, i32)> {
        (self.x_start..=self.x_end)
            .flat_map(|x| (self.z_start..=self.z_end).map(move |z| (x, self.platform_y, z)))
            .collect()
    }
}
