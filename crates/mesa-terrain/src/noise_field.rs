//! Multi-octave fractal noise height-field synthesis.
//!
//! Composites octaves of Perlin noise with per-octave offsets drawn from a
//! seeded RNG, so the same seed always reproduces the same field. Supports
//! per-grid (local) and analytically bounded (global) normalization.

use glam::Vec2;
use noise::{NoiseFn, Perlin};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::map::HeightGrid;

/// Smallest allowed noise scale. Non-positive scales are silently clamped
/// here instead of failing, so a degenerate configuration still produces
/// a (very noisy) field rather than a division by zero.
pub const MIN_SCALE: f32 = 1e-4;

/// Per-octave offsets are drawn from this range, far enough from the origin
/// that different octaves sample unrelated parts of the basis function.
const OCTAVE_OFFSET_RANGE: f32 = 100_000.0;

/// Fraction of the analytic amplitude bound used by global normalization.
/// Accumulated fBm values rarely approach the geometric-series bound, so
/// dividing by the full bound wastes most of the `[0,1]` range. Values may
/// slightly exceed 1.0 near extreme seeds; consumers must tolerate that.
const GLOBAL_RANGE_FACTOR: f32 = 0.9;

/// Policy for rescaling raw accumulated noise into a bounded range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NormalizeMode {
    /// Rescale each grid by its own observed min/max. Maximizes per-chunk
    /// contrast, but absolute heights will not match across chunk seams.
    Local,
    /// Rescale by the analytic maximum amplitude sum across octaves.
    /// Globally consistent, required for seamless chunk streaming.
    Global,
}

/// Configuration for fractal noise field generation.
#[derive(Clone, Debug)]
pub struct NoiseParams {
    /// World seed. Same seed + same octave count always yields the same
    /// per-octave offsets and therefore the same field.
    pub seed: u64,
    /// Spatial scale: larger values zoom out the lowest octave.
    /// Clamped to [`MIN_SCALE`] when non-positive.
    pub scale: f32,
    /// Number of noise layers composited. Zero yields an all-zero grid.
    pub octaves: u32,
    /// Per-octave amplitude decay factor, conventionally in `[0,1]`.
    pub persistence: f32,
    /// Per-octave frequency growth factor. Clamped to at least 1.
    pub lacunarity: f32,
    /// User-controlled scroll offset applied on top of the chunk center.
    pub offset: Vec2,
    /// Normalization policy for the accumulated values.
    pub normalize: NormalizeMode,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: 50.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: Vec2::ZERO,
            normalize: NormalizeMode::Global,
        }
    }
}

/// Generate a `width x height` grid of noise heights centered on `center`
/// (in sample-grid units).
///
/// Sampling is centered on the grid midpoint, and the chunk center is folded
/// into each octave's offset *before* the frequency multiply, so two grids
/// whose centers differ by exactly `width - 1` share an identical edge
/// column. Under [`NormalizeMode::Global`] this makes adjacent chunks
/// seamless.
pub fn generate_noise_grid(
    width: usize,
    height: usize,
    params: &NoiseParams,
    center: Vec2,
) -> HeightGrid {
    let mut values = vec![0.0_f32; width * height];
    if params.octaves == 0 {
        return HeightGrid::new(width, height, values);
    }

    let scale = if params.scale <= 0.0 {
        MIN_SCALE
    } else {
        params.scale
    };
    let lacunarity = params.lacunarity.max(1.0);

    let perlin = Perlin::new(params.seed as u32);
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    let total_offset = params.offset + center;
    let octave_offsets: Vec<Vec2> = (0..params.octaves)
        .map(|_| {
            let ox: f32 = rng.random_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE);
            let oy: f32 = rng.random_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE);
            Vec2::new(ox + total_offset.x, oy + total_offset.y)
        })
        .collect();

    // Geometric-series bound on the accumulated amplitude.
    let mut max_amplitude = 0.0_f32;
    let mut amp = 1.0_f32;
    for _ in 0..params.octaves {
        max_amplitude += amp;
        amp *= params.persistence;
    }

    let half_w = (width as f32 - 1.0) / 2.0;
    let half_h = (height as f32 - 1.0) / 2.0;

    let mut min_value = f32::MAX;
    let mut max_value = f32::MIN;

    for y in 0..height {
        for x in 0..width {
            let mut amplitude = 1.0_f32;
            let mut frequency = 1.0_f32;
            let mut total = 0.0_f32;

            for offset in &octave_offsets {
                let sx = (x as f32 - half_w + offset.x) / scale * frequency;
                let sy = (y as f32 - half_h + offset.y) / scale * frequency;
                let sample = perlin.get([f64::from(sx), f64::from(sy)]) as f32;
                total += sample * amplitude;

                amplitude *= params.persistence;
                frequency *= lacunarity;
            }

            min_value = min_value.min(total);
            max_value = max_value.max(total);
            values[y * width + x] = total;
        }
    }

    match params.normalize {
        NormalizeMode::Local => {
            // Per-grid inverse lerp. A perfectly flat grid maps to zero.
            let span = max_value - min_value;
            if span > f32::EPSILON {
                for v in &mut values {
                    *v = (*v - min_value) / span;
                }
            } else {
                values.fill(0.0);
            }
        }
        NormalizeMode::Global => {
            let divisor = 2.0 * max_amplitude * GLOBAL_RANGE_FACTOR;
            for v in &mut values {
                *v = (*v + max_amplitude) / divisor;
            }
        }
    }

    HeightGrid::new(width, height, values)
}
