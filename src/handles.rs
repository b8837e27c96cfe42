//! Mass handle spheres.
//!
//! Every mass is rendered as a draggable sphere sitting on the grid plane,
//! scaled with its magnitude (plus hover/selection bumps) and skinned with
//! its category texture. One shared sphere mesh serves all bodies;
//! per-mass center, scale, tint, and skin layer travel in an instance
//! buffer so the whole set draws in a single call.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::config::MassConfig;
use crate::mass::{Mass, MassCategory, MassId};
use crate::shader::MAX_UNIFORM_MASSES;

/// Height of the handle sphere centers above the plane. The drag plane is
/// pinned here so motion stays strictly in-plane.
pub const HANDLE_HEIGHT: f32 = 0.0;

/// Latitudinal and longitudinal segment count of the handle sphere.
pub const SPHERE_SEGMENTS: u32 = 16;

/// Teal tint for idle handles.
pub const TINT_DEFAULT: [f32; 3] = [0.306, 0.804, 0.769];
/// Coral tint while hovered or selected.
pub const TINT_ACTIVE: [f32; 3] = [1.0, 0.42, 0.42];

/// One sphere-surface vertex.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct HandleVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Per-instance handle data, matching the handle shader's instance inputs.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct HandleInstance {
    /// World-space center in `xyz`, uniform scale in `w`.
    pub center_scale: [f32; 4],
    pub tint: [f32; 3],
    /// Skin texture array layer.
    pub layer: u32,
}

/// The sphere mesh shared by all handle instances.
#[derive(Clone, Debug)]
pub struct SphereMesh {
    pub vertices: Vec<HandleVertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Build a UV sphere of the given radius.
    ///
    /// `segments` counts both rings and sectors, floored at 3. The seam
    /// column is duplicated so the texture wraps without interpolation
    /// artifacts.
    pub fn uv(radius: f32, segments: u32) -> Self {
        let n = segments.max(3);
        let verts_per_ring = n + 1;

        let mut vertices = Vec::with_capacity((verts_per_ring * verts_per_ring) as usize);
        for ring in 0..=n {
            let v = ring as f32 / n as f32;
            let theta = v * std::f32::consts::PI;
            for sector in 0..=n {
                let u = sector as f32 / n as f32;
                let phi = u * std::f32::consts::TAU;
                vertices.push(HandleVertex {
                    position: [
                        radius * theta.sin() * phi.cos(),
                        radius * theta.cos(),
                        radius * theta.sin() * phi.sin(),
                    ],
                    uv: [u, v],
                });
            }
        }

        let mut indices = Vec::with_capacity((n * n * 6) as usize);
        for ring in 0..n {
            for sector in 0..n {
                let i = ring * verts_per_ring + sector;
                indices.extend_from_slice(&[
                    i,
                    i + verts_per_ring,
                    i + 1,
                    i + 1,
                    i + verts_per_ring,
                    i + verts_per_ring + 1,
                ]);
            }
        }

        Self { vertices, indices }
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Category whose skin a mass wears: its own preset, or for custom bodies
/// the category its magnitude most resembles.
pub fn skin_category(mass: &Mass) -> MassCategory {
    match mass.category {
        MassCategory::Custom => MassCategory::from_magnitude(mass.magnitude),
        category => category,
    }
}

/// Build this frame's instance list.
///
/// The dragged mass takes its position from `live` (the controller's
/// buffered drag position) rather than the registry, so the sphere tracks
/// the pointer even between throttled commits. Texture layers are assigned
/// by slot order, mirroring the skin upload; masses beyond the uniform
/// capacity are not drawn.
pub fn build_handle_instances(
    masses: &[Mass],
    config: &MassConfig,
    selected: Option<MassId>,
    hovered: Option<MassId>,
    live: Option<(MassId, Vec2)>,
) -> Vec<HandleInstance> {
    masses
        .iter()
        .take(MAX_UNIFORM_MASSES)
        .enumerate()
        .map(|(slot, mass)| {
            let position = match live {
                Some((id, live_position)) if id == mass.id => live_position,
                _ => mass.position,
            };
            let is_selected = selected == Some(mass.id);
            let is_hovered = hovered == Some(mass.id);
            let scale = config.handle_scale(mass.magnitude, is_selected, is_hovered);
            let tint = if is_selected || is_hovered {
                TINT_ACTIVE
            } else {
                TINT_DEFAULT
            };
            HandleInstance {
                center_scale: [position.x, HANDLE_HEIGHT, position.y, scale],
                tint,
                layer: slot as u32,
            }
        })
        .collect()
}
