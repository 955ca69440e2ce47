//! Height-to-terrain-type classification over an ordered threshold table.

use crate::map::{ColorGrid, HeightGrid, Rgba8};

/// One terrain band: every sample at or above `height` (and below the next
/// band's threshold) takes this band's color.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainType {
    /// Display name for editors and logs.
    pub name: String,
    /// Band floor, conventionally in `[0,1]`. Thresholds outside that range
    /// are permitted but unreachable (or always reached); that is a caller
    /// misconfiguration, not an error.
    pub height: f32,
    /// Band color.
    pub color: Rgba8,
}

impl TerrainType {
    /// Convenience constructor.
    pub fn new(name: &str, height: f32, color: Rgba8) -> Self {
        Self {
            name: name.to_string(),
            height,
            color,
        }
    }
}

/// Classify every sample of `heights` against a threshold table sorted
/// ascending by `height`.
///
/// The highest qualifying band wins: a sample takes the color of the last
/// entry whose threshold is `<=` its height. Samples below the smallest
/// threshold keep [`Rgba8::BLACK`].
pub fn classify(heights: &HeightGrid, regions: &[TerrainType]) -> ColorGrid {
    debug_assert!(
        regions.windows(2).all(|w| w[0].height <= w[1].height),
        "region table must be sorted ascending by height threshold"
    );

    let pixels = heights
        .values()
        .iter()
        .map(|&sample| {
            let mut color = Rgba8::BLACK;
            for region in regions {
                if sample >= region.height {
                    color = region.color;
                } else {
                    break;
                }
            }
            color
        })
        .collect();

    ColorGrid::new(heights.width(), heights.height(), pixels)
}

/// A conventional six-band table from deep water to snow, with the lowest
/// band floored at 0.0 so every in-range sample qualifies somewhere.
pub fn default_regions() -> Vec<TerrainType> {
    vec![
        TerrainType::new("water deep", 0.0, Rgba8::rgb(52, 99, 195)),
        TerrainType::new("water shallow", 0.35, Rgba8::rgb(54, 128, 210)),
        TerrainType::new("sand", 0.42, Rgba8::rgb(210, 208, 125)),
        TerrainType::new("grass", 0.47, Rgba8::rgb(86, 152, 23)),
        TerrainType::new("rock", 0.65, Rgba8::rgb(90, 69, 60)),
        TerrainType::new("snow", 0.88, Rgba8::rgb(255, 255, 255)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_bands() -> Vec<TerrainType> {
        vec![
            TerrainType::new("low", 0.2, Rgba8::rgb(0, 0, 255)),
            TerrainType::new("mid", 0.5, Rgba8::rgb(0, 255, 0)),
            TerrainType::new("high", 0.8, Rgba8::rgb(255, 0, 0)),
        ]
    }

    fn classify_one(sample: f32, regions: &[TerrainType]) -> Rgba8 {
        let grid = HeightGrid::new(1, 1, vec![sample]);
        classify(&grid, regions).get(0, 0)
    }

    #[test]
    fn test_highest_qualifying_threshold_wins() {
        let regions = three_bands();
        assert_eq!(classify_one(0.3, &regions), Rgba8::rgb(0, 0, 255));
        assert_eq!(classify_one(0.6, &regions), Rgba8::rgb(0, 255, 0));
        assert_eq!(classify_one(0.95, &regions), Rgba8::rgb(255, 0, 0));
    }

    #[test]
    fn test_exact_threshold_belongs_to_its_band() {
        let regions = three_bands();
        assert_eq!(classify_one(0.5, &regions), Rgba8::rgb(0, 255, 0));
        assert_eq!(classify_one(0.8, &regions), Rgba8::rgb(255, 0, 0));
    }

    #[test]
    fn test_below_smallest_threshold_keeps_default_black() {
        let regions = three_bands();
        assert_eq!(classify_one(0.1, &regions), Rgba8::BLACK);
        assert_eq!(classify_one(-2.0, &regions), Rgba8::BLACK);
    }

    #[test]
    fn test_empty_region_table_yields_all_default() {
        assert_eq!(classify_one(0.5, &[]), Rgba8::BLACK);
    }

    #[test]
    fn test_out_of_range_thresholds_are_tolerated() {
        let regions = vec![
            TerrainType::new("always", -1.0, Rgba8::rgb(1, 1, 1)),
            TerrainType::new("never", 2.0, Rgba8::rgb(2, 2, 2)),
        ];
        // -1.0 always qualifies, 2.0 never does for in-range samples.
        assert_eq!(classify_one(0.0, &regions), Rgba8::rgb(1, 1, 1));
        assert_eq!(classify_one(1.0, &regions), Rgba8::rgb(1, 1, 1));
    }

    #[test]
    fn test_default_regions_sorted_ascending() {
        let regions = default_regions();
        assert!(regions.windows(2).all(|w| w[0].height < w[1].height));
        assert_eq!(regions[0].height, 0.0, "lowest band must floor at 0");
    }

    #[test]
    fn test_classifies_whole_grid() {
        let grid = HeightGrid::new(2, 2, vec![0.1, 0.3, 0.6, 0.9]);
        let colors = classify(&grid, &three_bands());
        assert_eq!(colors.get(0, 0), Rgba8::BLACK);
        assert_eq!(colors.get(1, 0), Rgba8::rgb(0, 0, 255));
        assert_eq!(colors.get(0, 1), Rgba8::rgb(0, 255, 0));
        assert_eq!(colors.get(1, 1), Rgba8::rgb(255, 0, 0));
    }
}
