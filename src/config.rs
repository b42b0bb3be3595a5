//! Configuration: YAML load/save for `~/.strudelcraft/config.yaml`.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dsl::compile::DEFAULT_CYCLES;
use crate::dsl::{CompileOptions, ScaleTable};
use crate::voxel::{LaneTable, MappingConfig, Palette, VoxelMapper};

/// Everything the compiler and mapper can be tuned with.
///
/// Every section is optional in the file; missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cycles to generate. Zero is treated as one.
    pub cycles: u32,
    pub mapping: MappingConfig,
    pub lanes: LaneTable,
    pub palette: Palette,
    pub scales: ScaleTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cycles: DEFAULT_CYCLES,
            mapping: MappingConfig::default(),
            lanes: LaneTable::default(),
            palette: Palette::default(),
            scales: ScaleTable::default(),
        }
    }
}

impl Config {
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            cycles: self.cycles.max(1),
            scales: self.scales.clone(),
        }
    }

    pub fn voxel_mapper(&self) -> VoxelMapper {
        VoxelMapper::new(
            self.mapping.clone(),
            self.lanes.clone(),
            self.palette.clone(),
        )
    }
}

/// Default path for the config file.
pub fn default_config_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".strudelcraft");
    path.push("config.yaml");
    path
}

/// Load a config from a YAML file. Returns the defaults if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Config, io::Error> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)?;
    let mut config: Config = serde_yaml::from_str(&content)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    config.cycles = config.cycles.max(1);
    Ok(config)
}

/// Save a config to a YAML file, creating parent directories as needed.
pub fn save_config(path: &Path, config: &Config) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(config).map_err(io::Error::other)?;
    std::fs::write(path, yaml)
}
