//! Triangulates a height grid into a terrain surface at a given LOD.

use glam::{Vec2, Vec3};
use mesa_terrain::HeightGrid;

use crate::curve::HeightCurve;
use crate::mesh_data::MeshData;

/// Mesh construction errors. A stride that does not divide the grid span is
/// a programming error at the call site, not runtime data, so it fails
/// loudly instead of being silently corrected.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    /// The LOD vertex stride does not evenly divide `grid side - 1`.
    #[error("LOD stride {stride} does not evenly divide grid span {span}")]
    InvalidStride {
        /// The offending vertex stride.
        stride: usize,
        /// The grid span (`side - 1`) the stride must divide.
        span: usize,
    },
}

/// Vertex stride for a level of detail: LOD 0 keeps every sample, LOD `k`
/// keeps every `2k`-th sample. Even strides guarantee the border samples
/// survive, so adjacent chunks can be stitched without T-junction gaps.
pub fn lod_stride(level_of_detail: u8) -> usize {
    if level_of_detail == 0 {
        1
    } else {
        2 * level_of_detail as usize
    }
}

/// Build a triangulated terrain surface from a height grid.
///
/// Each retained sample's elevation is `curve.evaluate(sample) * height_multiplier`.
/// The mesh is centered on the origin in the XZ plane with one world unit
/// per (pre-stride) sample step, and UVs map the full grid extent to
/// `[0,1]x[0,1]` regardless of LOD.
pub fn build_terrain_mesh(
    heights: &HeightGrid,
    height_multiplier: f32,
    curve: &HeightCurve,
    level_of_detail: u8,
) -> Result<MeshData, MeshError> {
    let width = heights.width();
    let height = heights.height();
    let stride = lod_stride(level_of_detail);

    if (width - 1) % stride != 0 || (height - 1) % stride != 0 {
        return Err(MeshError::InvalidStride {
            stride,
            span: width - 1,
        });
    }

    let verts_per_row = (width - 1) / stride + 1;
    let verts_per_col = (height - 1) / stride + 1;

    let top_left_x = (width as f32 - 1.0) / -2.0;
    let top_left_z = (height as f32 - 1.0) / 2.0;

    let mut vertices = Vec::with_capacity(verts_per_row * verts_per_col);
    let mut uvs = Vec::with_capacity(verts_per_row * verts_per_col);
    let mut indices = Vec::with_capacity((verts_per_row - 1) * (verts_per_col - 1) * 6);

    let mut vertex_index: u32 = 0;
    for y in (0..height).step_by(stride) {
        for x in (0..width).step_by(stride) {
            let elevation = curve.evaluate(heights.get(x, y)) * height_multiplier;
            vertices.push(Vec3::new(
                top_left_x + x as f32,
                elevation,
                top_left_z - y as f32,
            ));
            uvs.push(Vec2::new(
                x as f32 / (width - 1) as f32,
                y as f32 / (height - 1) as f32,
            ));

            // Two CCW (+Y outward) triangles per 2x2 block of retained samples.
            if x < width - 1 && y < height - 1 {
                let a = vertex_index;
                let row = verts_per_row as u32;
                indices.extend_from_slice(&[a, a + row + 1, a + row]);
                indices.extend_from_slice(&[a + row + 1, a, a + 1]);
            }

            vertex_index += 1;
        }
    }

    Ok(MeshData {
        vertices,
        indices,
        uvs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 13x13 grid: span 12 is divisible by strides 2, 4, 6, and 12.
    fn flat_grid(side: usize, value: f32) -> HeightGrid {
        HeightGrid::new(side, side, vec![value; side * side])
    }

    fn ramp_grid(side: usize) -> HeightGrid {
        let values = (0..side * side)
            .map(|i| (i % side) as f32 / (side - 1) as f32)
            .collect();
        HeightGrid::new(side, side, values)
    }

    #[test]
    fn test_full_resolution_keeps_every_sample() {
        let mesh = build_terrain_mesh(&flat_grid(13, 0.5), 1.0, &HeightCurve::identity(), 0)
            .expect("lod 0 always divides");
        assert_eq!(mesh.vertex_count(), 13 * 13);
        assert_eq!(mesh.triangle_count(), 12 * 12 * 2);
    }

    #[test]
    fn test_lod_k_vertex_count() {
        // ((S-1)/2k + 1)^2 vertices for an SxS grid.
        for (lod, expected_side) in [(1u8, 7usize), (2, 4), (3, 3), (6, 2)] {
            let mesh = build_terrain_mesh(&flat_grid(13, 0.0), 1.0, &HeightCurve::identity(), lod)
                .expect("stride divides span 12");
            assert_eq!(
                mesh.vertex_count(),
                expected_side * expected_side,
                "lod {lod}"
            );
        }
    }

    #[test]
    fn test_uv_extent_is_unit_square_at_every_lod() {
        for lod in [0u8, 1, 2, 3, 6] {
            let mesh = build_terrain_mesh(&flat_grid(13, 0.0), 1.0, &HeightCurve::identity(), lod)
                .expect("stride divides span 12");
            let min_u = mesh.uvs.iter().map(|uv| uv.x).fold(f32::MAX, f32::min);
            let max_u = mesh.uvs.iter().map(|uv| uv.x).fold(f32::MIN, f32::max);
            let min_v = mesh.uvs.iter().map(|uv| uv.y).fold(f32::MAX, f32::min);
            let max_v = mesh.uvs.iter().map(|uv| uv.y).fold(f32::MIN, f32::max);
            assert_eq!((min_u, max_u), (0.0, 1.0), "lod {lod} U extent");
            assert_eq!((min_v, max_v), (0.0, 1.0), "lod {lod} V extent");
        }
    }

    #[test]
    fn test_indivisible_stride_fails_loudly() {
        // Span 12 is not divisible by stride 10 (lod 5).
        let result = build_terrain_mesh(&flat_grid(13, 0.0), 1.0, &HeightCurve::identity(), 5);
        assert!(matches!(
            result,
            Err(MeshError::InvalidStride { stride: 10, span: 12 })
        ));
    }

    #[test]
    fn test_curve_and_multiplier_shape_elevation() {
        let curve = HeightCurve::from_keys(vec![(0.0, 0.0), (1.0, 2.0)]);
        let mesh = build_terrain_mesh(&flat_grid(13, 0.5), 10.0, &curve, 0).unwrap();
        for v in &mesh.vertices {
            assert!((v.y - 10.0).abs() < 1e-4, "0.5 through the curve is 1.0, x10");
        }
    }

    #[test]
    fn test_mesh_is_centered_on_origin() {
        let mesh = build_terrain_mesh(&flat_grid(13, 0.0), 1.0, &HeightCurve::identity(), 0).unwrap();
        let min_x = mesh.vertices.iter().map(|v| v.x).fold(f32::MAX, f32::min);
        let max_x = mesh.vertices.iter().map(|v| v.x).fold(f32::MIN, f32::max);
        let min_z = mesh.vertices.iter().map(|v| v.z).fold(f32::MAX, f32::min);
        let max_z = mesh.vertices.iter().map(|v| v.z).fold(f32::MIN, f32::max);
        assert_eq!((min_x, max_x), (-6.0, 6.0));
        assert_eq!((min_z, max_z), (-6.0, 6.0));
    }

    #[test]
    fn test_winding_faces_up() {
        let mesh = build_terrain_mesh(&ramp_grid(13), 1.0, &HeightCurve::identity(), 0).unwrap();
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize]);
            let normal = (b - a).cross(c - a);
            assert!(normal.y > 0.0, "triangle normal must face +Y, got {normal}");
        }
    }

    #[test]
    fn test_border_samples_survive_decimation() {
        let mesh = build_terrain_mesh(&flat_grid(13, 0.0), 1.0, &HeightCurve::identity(), 3).unwrap();
        // Corners of the grid must be present at every LOD for stitching.
        for corner in [
            Vec3::new(-6.0, 0.0, 6.0),
            Vec3::new(6.0, 0.0, 6.0),
            Vec3::new(-6.0, 0.0, -6.0),
            Vec3::new(6.0, 0.0, -6.0),
        ] {
            assert!(
                mesh.vertices.contains(&corner),
                "corner {corner} missing at lod 3"
            );
        }
    }
}
