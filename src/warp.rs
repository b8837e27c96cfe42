//! Warp field evaluation.
//!
//! The warp field is a scalar height over the simulation plane: every mass
//! contributes a depression whose depth falls off with planar distance, and
//! the surface height at a point is the negative sum of all contributions.
//!
//! Two falloff formulas are supported (see [`WarpFormula`]). The formula is
//! defined once and shared by the CPU path here and the generated WGSL in
//! [`crate::shader`], so the two can never diverge numerically.
//!
//! The evaluator runs once per surface vertex per frame on the CPU path, so
//! [`WarpConfig::height`] is allocation-free with a branch-minimal inner
//! loop.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use warpgrid::config::WarpConfig;
//! use warpgrid::MassRegistry;
//!
//! let warp = WarpConfig::default();
//! // The registry seeds one default mass at the origin.
//! let registry = MassRegistry::new(Default::default());
//!
//! // A depression near the mass, flattening out with distance.
//! let near = warp.height(Vec2::new(0.5, 0.0), registry.masses());
//! let far = warp.height(Vec2::new(5.0, 0.0), registry.masses());
//! assert!(near < far && far < 0.0);
//! ```

use glam::Vec2;

use crate::config::WarpConfig;
use crate::mass::Mass;

/// Falloff formula for a single mass contribution.
///
/// Both variants are admissible renderings of the same idea; they differ
/// numerically. Schwarzschild is the default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WarpFormula {
    /// `h = rs / r` with `rs = 2 G m / c^2`. G and C are visualization
    /// scale constants, nominally 1.
    Schwarzschild { g: f32, c: f32 },
    /// `h = strength * m / (r^2 + epsilon)`. Softer well with a wider
    /// shoulder near the center.
    PseudoNewtonian { strength: f32, epsilon: f32 },
}

impl Default for WarpFormula {
    fn default() -> Self {
        WarpFormula::Schwarzschild { g: 1.0, c: 1.0 }
    }
}

impl WarpFormula {
    /// Contribution of one mass at planar distance `r` (already floored).
    #[inline]
    pub fn contribution(&self, magnitude: f32, r: f32) -> f32 {
        match *self {
            WarpFormula::Schwarzschild { g, c } => {
                let rs = 2.0 * g * magnitude / (c * c);
                rs / r
            }
            WarpFormula::PseudoNewtonian { strength, epsilon } => {
                strength * magnitude / (r * r + epsilon)
            }
        }
    }

    /// WGSL expression computing the same contribution.
    ///
    /// Assumes `mass: f32` and `r: f32` are in scope; evaluates to the
    /// contribution value. The CPU path above and this expression are the
    /// two renderings of the single formula definition.
    pub fn to_wgsl_expr(&self) -> String {
        match *self {
            WarpFormula::Schwarzschild { g, c } => format!(
                "(2.0 * {:?} * mass / ({:?} * {:?})) / r",
                g, c, c
            ),
            WarpFormula::PseudoNewtonian { strength, epsilon } => {
                format!("{:?} * mass / (r * r + {:?})", strength, epsilon)
            }
        }
    }
}

impl WarpConfig {
    /// Height of the warp field at `point`.
    ///
    /// Pure: identical inputs always produce identical output. An empty
    /// mass list yields exactly 0.0. Masses beyond `max_masses` are
    /// silently ignored.
    #[inline]
    pub fn height(&self, point: Vec2, masses: &[Mass]) -> f32 {
        let mut total = 0.0;
        for mass in masses.iter().take(self.max_masses) {
            let r = point.distance(mass.position).max(self.r_min);
            total += self.formula.contribution(mass.magnitude, r);
        }
        -total
    }

    /// Evaluate the field over a batch of sample points, writing heights
    /// into `out` (cleared first). One entry per point, in order.
    pub fn sample_into(&self, points: &[Vec2], masses: &[Mass], out: &mut Vec<f32>) {
        out.clear();
        out.reserve(points.len());
        for &point in points {
            out.push(self.height(point, masses));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mass::{MassCategory, MassId};

    fn mass_at(id: u64, x: f32, y: f32, magnitude: f32) -> Mass {
        Mass {
            id: MassId(id),
            position: Vec2::new(x, y),
            magnitude,
            category: MassCategory::Custom,
        }
    }

    fn both_formulas() -> [WarpFormula; 2] {
        [
            WarpFormula::Schwarzschild { g: 1.0, c: 1.0 },
            WarpFormula::PseudoNewtonian {
                strength: 2.0,
                epsilon: 0.5,
            },
        ]
    }

    #[test]
    fn test_no_masses_is_exactly_zero() {
        let warp = WarpConfig::default();
        assert_eq!(warp.height(Vec2::ZERO, &[]), 0.0);
        assert_eq!(warp.height(Vec2::new(3.0, -7.0), &[]), 0.0);
    }

    #[test]
    fn test_height_decreases_with_magnitude() {
        for formula in both_formulas() {
            let warp = WarpConfig {
                formula,
                ..WarpConfig::default()
            };
            let point = Vec2::new(0.3, 0.0);
            let mut last = 0.0;
            for magnitude in [0.5, 1.0, 2.0, 5.0, 10.0] {
                let h = warp.height(point, &[mass_at(1, 0.0, 0.0, magnitude)]);
                assert!(h < last, "formula {:?}, magnitude {}", formula, magnitude);
                last = h;
            }
        }
    }

    #[test]
    fn test_height_rises_toward_zero_with_distance() {
        for formula in both_formulas() {
            let warp = WarpConfig {
                formula,
                ..WarpConfig::default()
            };
            let masses = [mass_at(1, 0.0, 0.0, 2.0)];
            let mut last = f32::NEG_INFINITY;
            for distance in [0.5, 1.0, 2.0, 4.0, 8.0] {
                let h = warp.height(Vec2::new(distance, 0.0), &masses);
                assert!(h > last);
                assert!(h < 0.0);
                last = h;
            }
        }
    }

    #[test]
    fn test_center_is_floored_not_singular() {
        let warp = WarpConfig::default();
        let masses = [mass_at(1, 0.0, 0.0, 1.0)];
        let at_center = warp.height(Vec2::ZERO, &masses);
        let at_floor = warp.height(Vec2::new(warp.r_min, 0.0), &masses);
        assert!(at_center.is_finite());
        assert_eq!(at_center, at_floor);
    }

    #[test]
    fn test_contributions_sum() {
        let warp = WarpConfig::default();
        let a = mass_at(1, -2.0, 0.0, 1.0);
        let b = mass_at(2, 2.0, 0.0, 3.0);
        let point = Vec2::new(0.0, 1.0);

        let combined = warp.height(point, &[a, b]);
        let separate = warp.height(point, &[a]) + warp.height(point, &[b]);
        assert!((combined - separate).abs() < 1e-6);
    }

    #[test]
    fn test_excess_masses_ignored() {
        let warp = WarpConfig {
            max_masses: 2,
            ..WarpConfig::default()
        };
        let masses = [
            mass_at(1, -2.0, 0.0, 1.0),
            mass_at(2, 2.0, 0.0, 1.0),
            mass_at(3, 0.0, 0.0, 10.0),
        ];
        let capped = warp.height(Vec2::ZERO, &masses);
        let first_two = warp.height(Vec2::ZERO, &masses[..2]);
        assert_eq!(capped, first_two);
    }

    #[test]
    fn test_deterministic() {
        let warp = WarpConfig::default();
        let masses = [mass_at(1, 1.5, -0.5, 3.3), mass_at(2, -4.0, 2.0, 0.7)];
        let point = Vec2::new(0.25, 0.75);
        assert_eq!(warp.height(point, &masses), warp.height(point, &masses));
    }

    #[test]
    fn test_sample_into_matches_pointwise() {
        let warp = WarpConfig::default();
        let masses = [mass_at(1, 0.0, 0.0, 2.0)];
        let points = [Vec2::ZERO, Vec2::new(1.0, 1.0), Vec2::new(-3.0, 0.5)];

        let mut out = Vec::new();
        warp.sample_into(&points, &masses, &mut out);

        assert_eq!(out.len(), points.len());
        for (point, h) in points.iter().zip(&out) {
            assert_eq!(*h, warp.height(*point, &masses));
        }
    }

    #[test]
    fn test_sample_into_reuses_buffer() {
        let warp = WarpConfig::default();
        let mut out = vec![99.0; 8];
        warp.sample_into(&[Vec2::ZERO], &[], &mut out);
        assert_eq!(out, vec![0.0]);
    }
}
