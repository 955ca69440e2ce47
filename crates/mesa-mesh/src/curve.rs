//! Piecewise-linear height remapping curve.
//!
//! Replaces an engine animation-curve asset with plain keyframe data:
//! monotonic-by-convention, but non-monotonic curves are the caller's
//! responsibility (they produce locally inverted normals, nothing worse).

/// A piecewise-linear curve over `(t, value)` keyframes.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightCurve {
    keys: Vec<(f32, f32)>,
}

impl HeightCurve {
    /// The identity remap: `evaluate(t) == t` over `[0,1]`.
    pub fn identity() -> Self {
        Self {
            keys: vec![(0.0, 0.0), (1.0, 1.0)],
        }
    }

    /// Build a curve from keyframes.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two keys are given or key times are not
    /// strictly increasing.
    pub fn from_keys(keys: Vec<(f32, f32)>) -> Self {
        assert!(keys.len() >= 2, "curve needs at least two keys");
        assert!(
            keys.windows(2).all(|w| w[0].0 < w[1].0),
            "curve key times must be strictly increasing"
        );
        Self { keys }
    }

    /// Evaluate the curve at `t`, clamping to the first/last key value
    /// outside the keyed range.
    pub fn evaluate(&self, t: f32) -> f32 {
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];
        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }
        for w in self.keys.windows(2) {
            let (t0, v0) = w[0];
            let (t1, v1) = w[1];
            if t <= t1 {
                let u = (t - t0) / (t1 - t0);
                return v0 + (v1 - v0) * u;
            }
        }
        last.1
    }

    /// The keyframes.
    pub fn keys(&self) -> &[(f32, f32)] {
        &self.keys
    }
}

impl Default for HeightCurve {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_passes_through() {
        let curve = HeightCurve::identity();
        for t in [0.0, 0.25, 0.5, 1.0] {
            assert!((curve.evaluate(t) - t).abs() < 1e-6);
        }
    }

    #[test]
    fn test_interpolates_between_keys() {
        let curve = HeightCurve::from_keys(vec![(0.0, 0.0), (0.5, 0.0), (1.0, 2.0)]);
        assert!((curve.evaluate(0.25) - 0.0).abs() < 1e-6);
        assert!((curve.evaluate(0.75) - 1.0).abs() < 1e-6);
        assert!((curve.evaluate(1.0) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_clamps_outside_keyed_range() {
        let curve = HeightCurve::from_keys(vec![(0.2, 0.5), (0.8, 1.5)]);
        assert_eq!(curve.evaluate(-1.0), 0.5);
        assert_eq!(curve.evaluate(0.0), 0.5);
        assert_eq!(curve.evaluate(2.0), 1.5);
    }

    #[test]
    #[should_panic(expected = "strictly increasing")]
    fn test_unsorted_keys_panic() {
        let _ = HeightCurve::from_keys(vec![(0.5, 0.0), (0.2, 1.0)]);
    }

    #[test]
    #[should_panic(expected = "at least two keys")]
    fn test_single_key_panics() {
        let _ = HeightCurve::from_keys(vec![(0.0, 0.0)]);
    }
}
