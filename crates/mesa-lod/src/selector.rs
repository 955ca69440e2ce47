//! Maps viewer distance to a mesh LOD level through ordered distance bands.

/// Ordered distance thresholds separating LOD levels.
///
/// `thresholds[i]` is the maximum distance at which LOD `i` applies; beyond
/// the last threshold the coarsest level (`max_lod`) is selected. LOD 0 is
/// full detail.
#[derive(Clone, Debug, PartialEq)]
pub struct LodBands {
    thresholds: Vec<f32>,
}

impl LodBands {
    /// Build bands from explicit distance boundaries.
    ///
    /// # Panics
    ///
    /// Panics if `thresholds` is empty, contains a non-positive value, or
    /// is not strictly increasing.
    pub fn new(thresholds: Vec<f32>) -> Self {
        assert!(!thresholds.is_empty(), "must have at least one threshold");
        for (i, &t) in thresholds.iter().enumerate() {
            assert!(t > 0.0, "thresholds must be positive");
            if i > 0 {
                assert!(
                    t > thresholds[i - 1],
                    "thresholds must be strictly increasing"
                );
            }
        }
        Self { thresholds }
    }

    /// Three bands at quarter fractions of the view distance: full detail
    /// nearby, then progressively coarser toward the view limit.
    pub fn for_view_distance(max_view_distance: f32) -> Self {
        assert!(max_view_distance > 0.0, "view distance must be positive");
        Self::new(vec![
            max_view_distance * 0.25,
            max_view_distance * 0.5,
            max_view_distance * 0.75,
        ])
    }

    /// The coarsest selectable LOD level.
    pub fn max_lod(&self) -> u8 {
        self.thresholds.len() as u8
    }

    /// Select the LOD level for a chunk at `distance` from the viewer.
    pub fn select(&self, distance: f32) -> u8 {
        debug_assert!(distance >= 0.0, "distance must be non-negative");
        for (i, &threshold) in self.thresholds.iter().enumerate() {
            if distance < threshold {
                return i as u8;
            }
        }
        self.max_lod()
    }

    /// The threshold distances.
    pub fn thresholds(&self) -> &[f32] {
        &self.thresholds
    }
}
