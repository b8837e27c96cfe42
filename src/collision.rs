//! Collision resolution between mass bodies.
//!
//! Given a proposed position for one mass, the solver adjusts it so the
//! body keeps a minimum center-to-center distance from every other mass:
//! the sum of both visual radii plus a configured buffer. Radii are
//! magnitude-dependent, so a heavy body claims more room than a light one.
//!
//! Resolution is iterative with a fixed pass bound, each pass pushing the
//! proposed position directly away from any body it overlaps by exactly
//! the shortfall. The bound makes pathological dense configurations an
//! accepted approximation rather than a solver loop; three passes settle
//! every arrangement a user can actually drag into.
//!
//! The only nondeterminism is the exact-overlap tie-break: when two centers
//! coincide there is no connecting vector to push along, so a uniformly
//! random direction is used instead.

use glam::Vec2;
use rand::Rng;

use crate::config::{CollisionConfig, MassConfig};
use crate::mass::{Mass, MassId};

/// Resolves overlaps between mass bodies under dynamic radii.
#[derive(Clone, Copy, Debug, Default)]
pub struct CollisionSolver {
    pub mass: MassConfig,
    pub collision: CollisionConfig,
}

impl CollisionSolver {
    /// Create a solver from the two relevant config groups.
    pub fn new(mass: MassConfig, collision: CollisionConfig) -> Self {
        Self { mass, collision }
    }

    /// Adjust `proposed` so the mass `moving_id` satisfies the minimum
    /// separation against every other mass in `masses`.
    ///
    /// Returns the input unchanged when `moving_id` is not present or when
    /// no overlap exists. Never fails.
    pub fn resolve(&self, proposed: Vec2, moving_id: MassId, masses: &[Mass]) -> Vec2 {
        self.resolve_with_rng(proposed, moving_id, masses, &mut rand::thread_rng())
    }

    /// [`resolve`](Self::resolve) with an explicit RNG for the exact-overlap
    /// tie-break, allowing deterministic tests.
    pub fn resolve_with_rng<R: Rng>(
        &self,
        proposed: Vec2,
        moving_id: MassId,
        masses: &[Mass],
        rng: &mut R,
    ) -> Vec2 {
        let Some(moving) = masses.iter().find(|m| m.id == moving_id) else {
            return proposed;
        };
        let moving_radius = self.mass.visual_radius(moving.magnitude);

        let mut resolved = proposed;
        for _ in 0..self.collision.iterations {
            let mut pushed = false;

            for other in masses {
                if other.id == moving_id {
                    continue;
                }

                let offset = resolved - other.position;
                let distance = offset.length();
                let other_radius = self.mass.visual_radius(other.magnitude);
                let min_distance = moving_radius + other_radius + self.collision.buffer;

                if distance < min_distance {
                    pushed = true;
                    if distance > 0.0 {
                        let shortfall = min_distance - distance;
                        resolved += offset / distance * shortfall;
                    } else {
                        // Coincident centers: no connecting vector exists,
                        // push the full minimum distance in a random
                        // direction.
                        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                        resolved += Vec2::new(angle.cos(), angle.sin()) * min_distance;
                    }
                }
            }

            if !pushed {
                break;
            }
        }

        resolved
    }

    /// Minimum allowed center-to-center distance between two magnitudes.
    pub fn min_separation(&self, magnitude_a: f32, magnitude_b: f32) -> f32 {
        self.mass.visual_radius(magnitude_a)
            + self.mass.visual_radius(magnitude_b)
            + self.collision.buffer
    }
}
