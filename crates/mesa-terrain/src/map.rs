//! Per-chunk map data: the immutable height grid, the parallel color grid,
//! and the single synchronous generation entry point that workers run.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::noise_field::{NoiseParams, generate_noise_grid};
use crate::regions::{TerrainType, classify};

/// Side length of a chunk's sample grid. Odd, and `MAP_CHUNK_SIZE - 1` is
/// divisible by every supported LOD stride (2, 4, 6, 8, 10, 12), so border
/// samples survive decimation at every level of detail.
pub const MAP_CHUNK_SIZE: usize = 241;

/// A fixed-size grid of height samples. Immutable after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightGrid {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl HeightGrid {
    /// Wrap a row-major sample buffer.
    ///
    /// # Panics
    ///
    /// Panics if the buffer length does not match `width * height`.
    pub fn new(width: usize, height: usize, values: Vec<f32>) -> Self {
        assert_eq!(
            values.len(),
            width * height,
            "sample buffer length must match grid dimensions"
        );
        Self {
            width,
            height,
            values,
        }
    }

    /// Grid width in samples.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in samples.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Height sample at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        debug_assert!(x < self.width && y < self.height);
        self.values[y * self.width + x]
    }

    /// Raw row-major sample buffer.
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// An 8-bit RGBA color. `Pod` so color grids can be handed to the display
/// collaborator as raw texture bytes without copying.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black. Also the classifier's default for samples below every
    /// threshold, making misconfigured region tables visually obvious.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// A grid of terrain colors parallel to a [`HeightGrid`].
#[derive(Clone, Debug, PartialEq)]
pub struct ColorGrid {
    width: usize,
    height: usize,
    pixels: Vec<Rgba8>,
}

impl ColorGrid {
    /// Wrap a row-major pixel buffer.
    ///
    /// # Panics
    ///
    /// Panics if the buffer length does not match `width * height`.
    pub fn new(width: usize, height: usize, pixels: Vec<Rgba8>) -> Self {
        assert_eq!(
            pixels.len(),
            width * height,
            "pixel buffer length must match grid dimensions"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Grayscale visualization of a height grid: 0.0 maps to black and 1.0
    /// to white, with out-of-range samples clamped.
    pub fn from_height_grayscale(heights: &HeightGrid) -> Self {
        let pixels = heights
            .values()
            .iter()
            .map(|&v| {
                let level = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
                Rgba8::rgb(level, level, level)
            })
            .collect();
        Self::new(heights.width(), heights.height(), pixels)
    }

    /// Grid width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgba8 {
        debug_assert!(x < self.width && y < self.height);
        self.pixels[y * self.width + x]
    }

    /// The pixel buffer.
    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Raw RGBA bytes, row-major, ready for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// The product of one map-generation job: a height grid and its parallel
/// color grid. Never mutated after creation; shared across threads by `Arc`.
#[derive(Clone, Debug)]
pub struct MapData {
    /// Noise height samples.
    pub heights: HeightGrid,
    /// Terrain colors, one per height sample.
    pub colors: ColorGrid,
}

/// Generate the map data for the chunk centered at `center` (in sample-grid
/// units). This is the CPU-intensive body of a map job and runs on worker
/// threads; it touches nothing but its arguments.
pub fn generate_map_data(params: &NoiseParams, regions: &[TerrainType], center: Vec2) -> MapData {
    let heights = generate_noise_grid(MAP_CHUNK_SIZE, MAP_CHUNK_SIZE, params, center);
    let colors = classify(&heights, regions);
    MapData { heights, colors }
}
