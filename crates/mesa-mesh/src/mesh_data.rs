//! Immutable triangulated-surface data handed to the rendering collaborator.

use glam::{Vec2, Vec3};

/// The output of one mesh-build job: vertex positions, triangle indices,
/// and UV coordinates at a single LOD resolution. Immutable after creation;
/// the rendering collaborator converts it into a renderable object.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    /// Vertex positions, mesh centered on the origin in the XZ plane, +Y up.
    pub vertices: Vec<Vec3>,
    /// Triangle indices, 3 per triangle, wound for outward (+Y) faces.
    pub indices: Vec<u32>,
    /// Per-vertex texture coordinates spanning `[0,1]x[0,1]` over the full
    /// pre-stride grid extent, so textures stay continuous across LODs.
    pub uvs: Vec<Vec2>,
}

impl MeshData {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
