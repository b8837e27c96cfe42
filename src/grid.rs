//! Grid surface tessellation.
//!
//! The warp field is rendered on a square plane mesh. Per-frame evaluation
//! cost is O(subdivisions^2 x mass count), so the subdivision count adapts
//! to the number of masses in the scene: few masses afford a finer grid,
//! many masses drop to coarser tiers to protect the frame budget. The
//! chosen tier never exceeds the requested base resolution.

use glam::Vec2;

use crate::config::ResolutionTiers;

/// Pick a grid subdivision count for the current mass count.
///
/// Step function over mass count (<=2 low, <=4 medium, else high), clamped
/// to `base`. Consulted when the mass count changes, not per frame.
pub fn adaptive_resolution(mass_count: usize, base: u32, tiers: &ResolutionTiers) -> u32 {
    let tier = if mass_count <= 2 {
        tiers.low
    } else if mass_count <= 4 {
        tiers.medium
    } else {
        tiers.high
    };
    tier.min(base)
}

/// A square plane mesh in the simulation plane.
///
/// Vertices are 2D sample coordinates; the height dimension is supplied by
/// the warp field, on the GPU (generated vertex shader) or on the CPU
/// ([`crate::config::WarpConfig::sample_into`]).
#[derive(Clone, Debug)]
pub struct GridMesh {
    /// Subdivisions per edge this mesh was built with.
    pub subdivisions: u32,
    /// `(subdivisions + 1)^2` sample coordinates, row-major from the
    /// negative corner.
    pub vertices: Vec<Vec2>,
    /// Triangle list, counter-clockwise winding.
    pub indices: Vec<u32>,
}

impl GridMesh {
    /// Build a centered square plane of edge length `size` with
    /// `subdivisions` cells per edge.
    pub fn plane(size: f32, subdivisions: u32) -> Self {
        let n = subdivisions.max(1);
        let verts_per_edge = n + 1;
        let half = size / 2.0;
        let step = size / n as f32;

        let mut vertices = Vec::with_capacity((verts_per_edge * verts_per_edge) as usize);
        for row in 0..verts_per_edge {
            for col in 0..verts_per_edge {
                vertices.push(Vec2::new(
                    -half + col as f32 * step,
                    -half + row as f32 * step,
                ));
            }
        }

        let mut indices = Vec::with_capacity((n * n * 6) as usize);
        for row in 0..n {
            for col in 0..n {
                let i = row * verts_per_edge + col;
                indices.extend_from_slice(&[
                    i,
                    i + 1,
                    i + verts_per_edge,
                    i + 1,
                    i + verts_per_edge + 1,
                    i + verts_per_edge,
                ]);
            }
        }

        Self {
            subdivisions: n,
            vertices,
            indices,
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiers() -> ResolutionTiers {
        ResolutionTiers::default()
    }

    #[test]
    fn test_tier_boundaries() {
        let tiers = tiers();
        assert_eq!(adaptive_resolution(0, 128, &tiers), tiers.low);
        assert_eq!(adaptive_resolution(1, 128, &tiers), tiers.low);
        assert_eq!(adaptive_resolution(2, 128, &tiers), tiers.low);
        assert_eq!(adaptive_resolution(3, 128, &tiers), tiers.medium);
        assert_eq!(adaptive_resolution(4, 128, &tiers), tiers.medium);
        assert_eq!(adaptive_resolution(5, 128, &tiers), tiers.high);
        assert_eq!(adaptive_resolution(50, 128, &tiers), tiers.high);
    }

    #[test]
    fn test_tiers_never_exceed_base() {
        let tiers = tiers();
        assert_eq!(adaptive_resolution(1, 32, &tiers), 32);
        assert_eq!(adaptive_resolution(3, 32, &tiers), 32);
        assert_eq!(adaptive_resolution(9, 32, &tiers), 32);
    }

    #[test]
    fn test_plane_counts() {
        let mesh = GridMesh::plane(20.0, 4);
        assert_eq!(mesh.vertex_count(), 25);
        assert_eq!(mesh.triangle_count(), 32);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < 25));
    }

    #[test]
    fn test_plane_extents_centered() {
        let mesh = GridMesh::plane(20.0, 8);
        let min_x = mesh.vertices.iter().map(|v| v.x).fold(f32::MAX, f32::min);
        let max_x = mesh.vertices.iter().map(|v| v.x).fold(f32::MIN, f32::max);
        assert!((min_x + 10.0).abs() < 1e-4);
        assert!((max_x - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_subdivisions_floored() {
        let mesh = GridMesh::plane(10.0, 0);
        assert_eq!(mesh.subdivisions, 1);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
    }
}
