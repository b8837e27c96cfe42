//! # Warpgrid - Interactive Spacetime Curvature Sandbox
//!
//! A real-time visualization of how massive bodies warp spacetime: point
//! masses sit on a square grid surface and pull it down into gravity wells.
//! Drag masses around, tune their magnitudes, and watch the surface react.
//!
//! ## Quick Start
//!
//! ```ignore
//! use warpgrid::prelude::*;
//!
//! fn main() -> Result<(), warpgrid::error::ViewerError> {
//!     Viewer::new(SceneConfig::default()).run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Masses and the registry
//!
//! Every body is a [`Mass`]: a position on the grid plane, a magnitude in
//! solar-mass units, and a [`MassCategory`] (presets like `NeutronStar`
//! pin the magnitude; `Custom` is freely tunable). All masses live in a
//! [`MassRegistry`], which is the single source of truth for scene state
//! and notifies subscribers of every change through [`RegistryEvent`]s.
//!
//! ### The warp field
//!
//! The grid height at any point is the summed contribution of every mass,
//! computed by a [`WarpFormula`]. The same formula definition drives both
//! the CPU evaluator ([`WarpConfig::height`]) and the generated WGSL
//! vertex shader, so the two paths cannot drift apart.
//!
//! ### Interaction
//!
//! The [`DragController`] turns pointer rays into registry updates:
//! ray-picking against mass handles, in-plane dragging clamped to the play
//! area, collision push-out via [`CollisionSolver`], and registry commits
//! throttled to one per rendered frame.
//!
//! ### Rendering
//!
//! The [`viewer`] module opens a winit window and renders the deformed
//! grid plus a skinned handle sphere per mass with wgpu, with an orbit
//! camera ([`OrbitCamera`]) that stays above the plane. An optional egui
//! control panel is available behind the `egui` feature.
//!
//! [`WarpConfig::height`]: config::WarpConfig::height

pub mod camera;
pub mod collision;
pub mod config;
pub mod error;
pub mod gpu;
pub mod grid;
pub mod handles;
pub mod input;
pub mod interaction;
pub mod mass;
#[cfg(feature = "egui")]
pub mod panel;
pub mod registry;
pub mod shader;
pub mod textures;
pub mod viewer;
pub mod warp;

pub use bytemuck;
pub use camera::{OrbitCamera, Ray};
pub use collision::CollisionSolver;
pub use config::SceneConfig;
pub use glam::{Vec2, Vec3};
pub use grid::{adaptive_resolution, GridMesh};
pub use handles::{build_handle_instances, HandleInstance, SphereMesh};
pub use interaction::DragController;
pub use mass::{Mass, MassCategory, MassId};
pub use registry::{MassRegistry, RegistryEvent, SubscriptionId};
pub use shader::{generate_grid_shader, GridUniforms, ShaderCache, MAX_UNIFORM_MASSES};
pub use textures::{generate_skin, SkinCache, SkinTexture};
pub use viewer::Viewer;
pub use warp::WarpFormula;

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use warpgrid::prelude::*;
/// ```
pub mod prelude {
    pub use crate::camera::{OrbitCamera, Ray};
    pub use crate::collision::CollisionSolver;
    pub use crate::config::{SceneConfig, WarpConfig};
    pub use crate::interaction::DragController;
    pub use crate::mass::{Mass, MassCategory, MassId};
    pub use crate::registry::{MassRegistry, RegistryEvent};
    pub use crate::viewer::Viewer;
    pub use crate::warp::WarpFormula;
    pub use crate::{Vec2, Vec3};
    #[cfg(feature = "egui")]
    pub use egui;
}
