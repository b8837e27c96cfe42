//! Pointer-driven mass manipulation.
//!
//! The [`DragController`] turns pointer rays into registry updates. Its
//! state machine is `Idle -> Dragging -> Idle`:
//!
//! - pointer-down over a mass handle selects it, raises the global
//!   dragging flag (which the viewer uses to suppress camera gestures),
//!   and pins the drag plane at the handle height;
//! - pointer-move intersects the ray with the drag plane, clamps the hit
//!   to the play area, runs collision resolution against the whole scene,
//!   and buffers the resolved position locally. The buffer feeds immediate
//!   visual feedback; the registry write is coalesced to at most one
//!   commit per frame tick, no matter how many moves arrive in between;
//! - pointer-up flushes the buffered position synchronously, clears the
//!   selection and the dragging flag, and cancels any scheduled commit.
//!
//! Hover tracking is independent of dragging and purely visual; it never
//! touches the registry.

use glam::{Vec2, Vec3};

use crate::camera::Ray;
use crate::collision::CollisionSolver;
use crate::config::SceneConfig;
use crate::handles::HANDLE_HEIGHT;
use crate::mass::MassId;
use crate::registry::MassRegistry;

#[derive(Clone, Copy, Debug)]
enum DragState {
    Idle,
    Dragging {
        id: MassId,
        /// Latest collision-resolved position, not yet necessarily
        /// committed.
        buffered: Vec2,
        /// Whether a commit is scheduled for the next frame tick.
        commit_scheduled: bool,
    },
}

/// Converts pointer events into registry mutations.
#[derive(Debug)]
pub struct DragController {
    solver: CollisionSolver,
    /// Play-area half-extent drag positions are clamped into.
    bounds: f32,
    state: DragState,
    hovered: Option<MassId>,
}

impl DragController {
    /// Create a controller for the given scene configuration.
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            solver: CollisionSolver::new(config.mass, config.collision),
            bounds: config.grid.max_bounds,
            state: DragState::Idle,
            hovered: None,
        }
    }

    /// Whether a drag is currently in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Mass currently under the pointer, if any. Purely visual state.
    pub fn hovered(&self) -> Option<MassId> {
        self.hovered
    }

    /// Live position of the dragged mass for un-throttled visual feedback.
    ///
    /// May be ahead of the registry by at most one frame.
    pub fn drag_position(&self) -> Option<(MassId, Vec2)> {
        match self.state {
            DragState::Dragging { id, buffered, .. } => Some((id, buffered)),
            DragState::Idle => None,
        }
    }

    /// Find the mass handle a ray hits first, if any.
    ///
    /// Picks against the handle at its selected scale, so a handle that
    /// grows under the pointer cannot slip out of its own pick volume.
    pub fn hit_test(&self, ray: Ray, registry: &MassRegistry) -> Option<MassId> {
        let config = registry.config();
        let mut nearest: Option<(f32, MassId)> = None;
        for mass in registry.masses() {
            let center = Vec3::new(mass.position.x, HANDLE_HEIGHT, mass.position.y);
            let radius = config.visual_radius(mass.magnitude) * config.scale_selected;
            if let Some(t) = ray.intersect_sphere(center, radius) {
                if nearest.map_or(true, |(best, _)| t < best) {
                    nearest = Some((t, mass.id));
                }
            }
        }
        nearest.map(|(_, id)| id)
    }

    /// Handle pointer-down. Starts a drag when the ray hits a mass handle;
    /// returns whether the event was consumed.
    pub fn pointer_down(&mut self, ray: Ray, registry: &mut MassRegistry) -> bool {
        if self.is_dragging() {
            return true;
        }
        let Some(id) = self.hit_test(ray, registry) else {
            return false;
        };
        let start = registry
            .get(id)
            .map(|m| m.position)
            .unwrap_or(Vec2::ZERO);

        registry.select(Some(id));
        registry.set_dragging(true);
        self.state = DragState::Dragging {
            id,
            buffered: start,
            commit_scheduled: false,
        };
        true
    }

    /// Update the hovered mass from the current pointer ray. Purely visual;
    /// never touches the registry.
    pub fn pointer_hover(&mut self, ray: Ray, registry: &MassRegistry) {
        self.hovered = self.hit_test(ray, registry);
    }

    /// Handle pointer-move during a drag.
    ///
    /// Buffers the clamped, collision-resolved position and schedules at
    /// most one registry commit for the next frame tick. Outside a drag
    /// this only updates hover state.
    pub fn pointer_move(&mut self, ray: Ray, registry: &MassRegistry) {
        let DragState::Dragging { id, .. } = self.state else {
            self.pointer_hover(ray, registry);
            return;
        };

        let Some(hit) = ray.intersect_plane(HANDLE_HEIGHT) else {
            return;
        };
        let clamped = Vec2::new(
            hit.x.clamp(-self.bounds, self.bounds),
            hit.z.clamp(-self.bounds, self.bounds),
        );
        let resolved = self.solver.resolve(clamped, id, registry.masses());

        self.state = DragState::Dragging {
            id,
            buffered: resolved,
            commit_scheduled: true,
        };
    }

    /// Frame boundary: flush the scheduled commit, if one is pending.
    ///
    /// Called once per rendered frame; this is the throttle that collapses
    /// any number of pointer-moves into a single registry write.
    pub fn frame_tick(&mut self, registry: &mut MassRegistry) {
        if let DragState::Dragging {
            id,
            buffered,
            commit_scheduled: true,
        } = self.state
        {
            registry.update_position(id, buffered);
            self.state = DragState::Dragging {
                id,
                buffered,
                commit_scheduled: false,
            };
        }
    }

    /// Handle pointer-up: flush the final position synchronously, clear
    /// selection and the dragging flag, and discard any scheduled commit.
    pub fn pointer_up(&mut self, registry: &mut MassRegistry) {
        if let DragState::Dragging { id, buffered, .. } = self.state {
            registry.update_position(id, buffered);
            registry.select(None);
            registry.set_dragging(false);
        }
        self.state = DragState::Idle;
    }
}
