//! Synchronous single-chunk preview for editor/inspector collaborators.
//!
//! Runs the same pure generation code the pipeline workers run, but inline,
//! producing either a visualization texture or a mesh+texture pair for one
//! chunk at the origin.

use glam::Vec2;
use mesa_mesh::{MeshData, MeshError, build_terrain_mesh};
use mesa_terrain::{ColorGrid, generate_map_data};

use crate::pipeline::GeneratorSettings;

/// Highest LOD the preview will accept; larger values are clamped.
const MAX_PREVIEW_LOD: u8 = 6;

/// What the preview should show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewMode {
    /// Grayscale height visualization.
    NoiseMap,
    /// Classified region colors.
    ColorMap,
    /// Triangulated surface plus its color texture.
    Mesh,
}

/// Raw RGBA texture bytes for the display collaborator.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    /// Texture width in pixels.
    pub width: usize,
    /// Texture height in pixels.
    pub height: usize,
    /// Row-major RGBA bytes.
    pub rgba: Vec<u8>,
}

impl TextureData {
    fn from_colors(colors: &ColorGrid) -> Self {
        Self {
            width: colors.width(),
            height: colors.height(),
            rgba: colors.as_bytes().to_vec(),
        }
    }
}

/// A generated preview.
#[derive(Clone, Debug, PartialEq)]
pub enum Preview {
    /// A texture-only visualization (noise or color map).
    Texture(TextureData),
    /// A mesh with its color texture.
    Mesh {
        /// The triangulated surface.
        mesh: MeshData,
        /// The classified color texture.
        texture: TextureData,
    },
}

/// Generate a preview of the chunk at the origin.
pub fn generate_preview(
    settings: &GeneratorSettings,
    mode: PreviewMode,
    preview_lod: u8,
) -> Result<Preview, MeshError> {
    let lod = preview_lod.min(MAX_PREVIEW_LOD);
    let map = generate_map_data(&settings.noise, &settings.regions, Vec2::ZERO);

    match mode {
        PreviewMode::NoiseMap => {
            let grayscale = ColorGrid::from_height_grayscale(&map.heights);
            Ok(Preview::Texture(TextureData::from_colors(&grayscale)))
        }
        PreviewMode::ColorMap => Ok(Preview::Texture(TextureData::from_colors(&map.colors))),
        PreviewMode::Mesh => {
            let mesh = build_terrain_mesh(
                &map.heights,
                settings.height_multiplier,
                &settings.height_curve,
                lod,
            )?;
            Ok(Preview::Mesh {
                mesh,
                texture: TextureData::from_colors(&map.colors),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesa_terrain::MAP_CHUNK_SIZE;

    #[test]
    fn test_noise_map_preview_is_full_size_grayscale() {
        let preview =
            generate_preview(&GeneratorSettings::default(), PreviewMode::NoiseMap, 0).unwrap();
        let Preview::Texture(texture) = preview else {
            panic!("noise map mode must produce a texture");
        };
        assert_eq!(texture.width, MAP_CHUNK_SIZE);
        assert_eq!(texture.height, MAP_CHUNK_SIZE);
        assert_eq!(texture.rgba.len(), MAP_CHUNK_SIZE * MAP_CHUNK_SIZE * 4);
        // Grayscale: every pixel has equal channels.
        for px in texture.rgba.chunks_exact(4) {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
    }

    #[test]
    fn test_mesh_preview_clamps_out_of_range_lod() {
        // LOD 9 would be stride 18, which does not divide 240; clamping to 6
        // keeps the build valid.
        let preview =
            generate_preview(&GeneratorSettings::default(), PreviewMode::Mesh, 9).unwrap();
        let Preview::Mesh { mesh, texture } = preview else {
            panic!("mesh mode must produce a mesh");
        };
        let side = (MAP_CHUNK_SIZE - 1) / 12 + 1;
        assert_eq!(mesh.vertex_count(), side * side);
        assert_eq!(texture.width, MAP_CHUNK_SIZE);
    }

    #[test]
    fn test_color_map_preview_uses_region_colors() {
        let settings = GeneratorSettings::default();
        let preview = generate_preview(&settings, PreviewMode::ColorMap, 0).unwrap();
        let Preview::Texture(texture) = preview else {
            panic!("color map mode must produce a texture");
        };
        let region_colors: Vec<[u8; 4]> = settings
            .regions
            .iter()
            .map(|r| [r.color.r, r.color.g, r.color.b, r.color.a])
            .collect();
        for px in texture.rgba.chunks_exact(4) {
            let px = [px[0], px[1], px[2], px[3]];
            assert!(
                region_colors.contains(&px) || px == [0, 0, 0, 255],
                "pixel {px:?} is not a region color"
            );
        }
    }
}
