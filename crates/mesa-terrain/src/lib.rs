//! Procedural terrain data generation: multi-octave fractal noise, height
//! classification into terrain regions, and the per-chunk map data product.

mod map;
mod noise_field;
mod regions;

pub use map::{ColorGrid, HeightGrid, MAP_CHUNK_SIZE, MapData, Rgba8, generate_map_data};
pub use noise_field::{MIN_SCALE, NoiseParams, NormalizeMode, generate_noise_grid};
pub use regions::{TerrainType, classify, default_regions};
