//! Heightmap-to-mesh construction with level-of-detail reduction.

mod builder;
mod curve;
mod mesh_data;

pub use builder::{MeshError, build_terrain_mesh, lod_stride};
pub use curve::HeightCurve;
pub use mesh_data::MeshData;
