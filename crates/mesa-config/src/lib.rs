//! Engine configuration with sensible defaults and RON persistence.

mod config;
mod error;

pub use config::{
    DebugConfig, MeshConfig, NoiseConfig, NormalizeModeConfig, RegionConfig, TerrainConfig,
    WorldConfig,
};
pub use error::ConfigError;
