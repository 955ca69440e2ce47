//! Configuration structs with sensible defaults and RON persistence.
//!
//! Degenerate values (non-positive scale, lacunarity below 1, out-of-range
//! preview LOD, unsorted regions) are silently corrected by
//! [`TerrainConfig::normalized`] rather than rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest scale `normalized()` will clamp up to.
const MIN_NOISE_SCALE: f32 = 1e-4;

/// Highest supported editor-preview LOD.
const MAX_PREVIEW_LOD: u8 = 6;

/// Top-level terrain engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Chunk grid and view distance settings.
    pub world: WorldConfig,
    /// Noise field settings.
    pub noise: NoiseConfig,
    /// Mesh construction settings.
    pub mesh: MeshConfig,
    /// Ordered terrain bands, ascending by height threshold.
    pub regions: Vec<RegionConfig>,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Chunk grid and view distance settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// World units per chunk edge.
    pub chunk_size: u32,
    /// Maximum distance at which a chunk is visible, in world units.
    pub max_view_distance: f32,
}

/// Noise field settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
    /// World seed.
    pub seed: u64,
    /// Spatial scale of the lowest octave.
    pub scale: f32,
    /// Number of composited noise layers.
    pub octaves: u32,
    /// Per-octave amplitude decay, conventionally in `[0,1]`.
    pub persistence: f32,
    /// Per-octave frequency growth, at least 1.
    pub lacunarity: f32,
    /// User scroll offset in sample-grid units.
    pub offset: [f32; 2],
    /// Normalization policy.
    pub normalize: NormalizeModeConfig,
}

/// Serializable mirror of the noise normalization policy.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum NormalizeModeConfig {
    /// Per-chunk min/max rescale.
    Local,
    /// Globally consistent analytic rescale.
    #[default]
    Global,
}

/// Mesh construction settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshConfig {
    /// Vertical exaggeration applied after the height curve.
    pub height_multiplier: f32,
    /// Piecewise-linear height remap keyframes, `(t, value)` pairs.
    pub height_curve: Vec<[f32; 2]>,
    /// LOD used by the single-chunk editor preview, in `0..=6`.
    pub preview_lod: u8,
}

/// One terrain band.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionConfig {
    /// Display name.
    pub name: String,
    /// Band floor height threshold.
    pub height: f32,
    /// Band color as RGB.
    pub color: [u8; 3],
}

/// Debug/development settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g. "debug", "info,mesa_stream=trace").
    pub log_level: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: 240,
            max_view_distance: 480.0,
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: 50.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: [0.0, 0.0],
            normalize: NormalizeModeConfig::Global,
        }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            height_multiplier: 20.0,
            // Flatten the water bands, then ramp up through the hills.
            height_curve: vec![[0.0, 0.0], [0.4, 0.0], [1.0, 1.0]],
            preview_lod: 0,
        }
    }
}

impl TerrainConfig {
    /// Load configuration from a RON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        ron::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Save configuration to a RON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let pretty = ron::ser::PrettyConfig::default();
        let content =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;
        std::fs::write(path, content).map_err(ConfigError::Write)
    }

    /// Return a copy with degenerate values silently corrected: scale
    /// clamped positive, lacunarity clamped to at least 1, preview LOD
    /// clamped to the supported range, and regions sorted ascending.
    pub fn normalized(&self) -> Self {
        let mut config = self.clone();
        config.noise.scale = config.noise.scale.max(MIN_NOISE_SCALE);
        config.noise.lacunarity = config.noise.lacunarity.max(1.0);
        config.mesh.preview_lod = config.mesh.preview_lod.min(MAX_PREVIEW_LOD);
        config
            .regions
            .sort_by(|a, b| a.height.total_cmp(&b.height));
        config
    }

    /// Number of chunk rings visible around the viewer, derived from the
    /// view distance and chunk size.
    pub fn visible_chunk_radius(&self) -> i32 {
        (self.world.max_view_distance / self.world.chunk_size as f32).floor() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_radius_matches_view_distance() {
        let config = TerrainConfig::default();
        assert_eq!(config.world.chunk_size, 240);
        assert_eq!(config.world.max_view_distance, 480.0);
        assert_eq!(config.visible_chunk_radius(), 2);
    }

    #[test]
    fn test_ron_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terrain.ron");

        let mut config = TerrainConfig::default();
        config.noise.seed = 99;
        config.regions.push(RegionConfig {
            name: "water".into(),
            height: 0.0,
            color: [52, 99, 195],
        });
        config.save(&path).unwrap();

        let loaded = TerrainConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let err = TerrainConfig::load(Path::new("/nonexistent/terrain.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Read(_)));
    }

    #[test]
    fn test_load_garbage_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terrain.ron");
        std::fs::write(&path, "not ron {{{").unwrap();
        let err = TerrainConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: TerrainConfig = ron::from_str("(noise: (seed: 7))").unwrap();
        assert_eq!(config.noise.seed, 7);
        assert_eq!(config.world.chunk_size, 240);
        assert_eq!(config.mesh.height_multiplier, 20.0);
    }

    #[test]
    fn test_normalized_clamps_degenerate_values() {
        let mut config = TerrainConfig::default();
        config.noise.scale = -5.0;
        config.noise.lacunarity = 0.2;
        config.mesh.preview_lod = 9;
        let fixed = config.normalized();
        assert!(fixed.noise.scale > 0.0);
        assert_eq!(fixed.noise.lacunarity, 1.0);
        assert_eq!(fixed.mesh.preview_lod, 6);
    }

    #[test]
    fn test_normalized_sorts_regions_ascending() {
        let mut config = TerrainConfig::default();
        config.regions = vec![
            RegionConfig {
                name: "high".into(),
                height: 0.8,
                color: [255, 255, 255],
            },
            RegionConfig {
                name: "low".into(),
                height: 0.1,
                color: [0, 0, 255],
            },
        ];
        let fixed = config.normalized();
        assert_eq!(fixed.regions[0].name, "low");
        assert_eq!(fixed.regions[1].name, "high");
    }
}
