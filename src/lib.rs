//! Strudelcraft: compiles Strudel mini-notation patterns into timed events
//! and lays them out as a voxel point cloud.

pub mod config;
pub mod dsl;
pub mod event;
pub mod source;
pub mod voxel;
