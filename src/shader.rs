//! Generated WGSL for GPU-side warp evaluation.
//!
//! The grid surface is deformed in the vertex shader: every vertex runs the
//! same warp loop the CPU evaluator runs, over mass data uploaded as
//! uniforms. The per-mass contribution expression comes from
//! [`WarpFormula::to_wgsl_expr`], so the formula is defined once and both
//! paths follow it.
//!
//! Shader modules are generated per loop bound and cached, so adding and
//! removing masses at runtime never triggers a recompile; only the
//! `mass_count` uniform changes.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::config::WarpConfig;
use crate::mass::Mass;
use crate::warp::WarpFormula;

/// Fixed capacity of the mass uniform array.
///
/// The GPU array length never changes at runtime; the dynamic part is the
/// `mass_count` cutoff inside the loop. Configurations with a smaller
/// `max_masses` just lower the cutoff.
pub const MAX_UNIFORM_MASSES: usize = 16;

/// Uniform block shared by the grid vertex and fragment stages.
///
/// Layout matches the WGSL `GridUniforms` struct emitted by
/// [`generate_grid_shader`]: each mass packs position in `xy` and
/// magnitude in `z`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GridUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub masses: [[f32; 4]; MAX_UNIFORM_MASSES],
    pub mass_count: u32,
    pub _padding: [u32; 3],
}

impl GridUniforms {
    /// Zeroed uniforms: no masses, zero matrix.
    pub fn new() -> Self {
        Self::zeroed()
    }

    /// Store the combined view-projection matrix.
    pub fn set_view_proj(&mut self, view_proj: Mat4) {
        self.view_proj = view_proj.to_cols_array_2d();
    }

    /// Upload the current mass list, clearing stale slots first.
    ///
    /// Masses beyond `max_masses` (or the fixed array capacity) are
    /// silently dropped from the GPU view; they remain in the registry.
    pub fn write_masses(&mut self, masses: &[Mass], max_masses: usize) {
        self.masses = [[0.0; 4]; MAX_UNIFORM_MASSES];
        let count = masses.len().min(max_masses).min(MAX_UNIFORM_MASSES);
        for (slot, mass) in self.masses.iter_mut().zip(&masses[..count]) {
            *slot = [mass.position.x, mass.position.y, mass.magnitude, 0.0];
        }
        self.mass_count = count as u32;
    }
}

impl Default for GridUniforms {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate the complete grid shader module (vertex + fragment).
///
/// `max_masses` bounds the warp loop; the uniform array itself is always
/// [`MAX_UNIFORM_MASSES`] long so the host-side layout never changes.
pub fn generate_grid_shader(formula: &WarpFormula, r_min: f32, max_masses: usize) -> String {
    let loop_bound = max_masses.min(MAX_UNIFORM_MASSES);
    let contribution = formula.to_wgsl_expr();

    format!(
        r#"struct GridUniforms {{
    view_proj: mat4x4<f32>,
    masses: array<vec4<f32>, {capacity}>,
    mass_count: u32,
}};

@group(0) @binding(0)
var<uniform> uniforms: GridUniforms;

struct VertexOutput {{
    @builtin(position) clip_position: vec4<f32>,
    @location(0) plane_pos: vec2<f32>,
    @location(1) height: f32,
}};

fn warp_height(pos: vec2<f32>) -> f32 {{
    var total = 0.0;
    for (var i = 0u; i < {loop_bound}u; i = i + 1u) {{
        if i >= uniforms.mass_count {{
            break;
        }}
        let mass_pos = uniforms.masses[i].xy;
        let mass = uniforms.masses[i].z;
        var r = length(pos - mass_pos);
        r = max(r, {r_min:?});
        total += {contribution};
    }}
    return -total;
}}

@vertex
fn vs_main(@location(0) position: vec2<f32>) -> VertexOutput {{
    let height = warp_height(position);
    let world = vec3<f32>(position.x, height, position.y);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(world, 1.0);
    out.plane_pos = position;
    out.height = height;
    return out;
}}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {{
    // Grid lines from the fractional plane coordinate.
    let coord = in.plane_pos * 2.0;
    let grid = abs(fract(coord) - vec2<f32>(0.5)) / fwidth(coord);
    let line = min(grid.x, grid.y);

    // Blue in deep warps, white on flat regions.
    let depth_mix = clamp(in.height + 0.5, 0.0, 1.0);
    var color = mix(vec3<f32>(0.2, 0.5, 1.0), vec3<f32>(1.0, 1.0, 1.0), depth_mix);
    color = mix(color, vec3<f32>(0.8, 0.8, 0.8), 1.0 - min(line, 1.0));
    return vec4<f32>(color, 1.0);
}}
"#,
        capacity = MAX_UNIFORM_MASSES,
        loop_bound = loop_bound,
        r_min = r_min,
        contribution = contribution,
    )
}

/// WGSL for the instanced mass handle spheres.
///
/// Unlit, matching the grid's flat look: the fragment color is the skin
/// texel times the per-instance tint. Binding 0 reads the leading
/// view-projection matrix out of the same uniform buffer the grid pass
/// uses.
pub const HANDLE_SHADER: &str = r#"struct HandleUniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: HandleUniforms;
@group(0) @binding(1)
var skin_texture: texture_2d_array<f32>;
@group(0) @binding(2)
var skin_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) center_scale: vec4<f32>,
    @location(3) tint: vec3<f32>,
    @location(4) layer: u32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) tint: vec3<f32>,
    @location(2) @interpolate(flat) layer: u32,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let world = in.center_scale.xyz + in.position * in.center_scale.w;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(world, 1.0);
    out.uv = in.uv;
    out.tint = in.tint;
    out.layer = in.layer;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(skin_texture, skin_sampler, in.uv, in.layer);
    return vec4<f32>(texel.rgb * in.tint, 1.0);
}
"#;

/// Cache of generated grid shaders, keyed by warp-loop bound.
#[derive(Debug)]
pub struct ShaderCache {
    formula: WarpFormula,
    r_min: f32,
    entries: HashMap<usize, String>,
}

impl ShaderCache {
    /// Create a cache bound to one warp configuration.
    pub fn new(warp: &WarpConfig) -> Self {
        Self {
            formula: warp.formula,
            r_min: warp.r_min,
            entries: HashMap::new(),
        }
    }

    /// Fetch the shader for a mass capacity, generating it on first use.
    pub fn get(&mut self, max_masses: usize) -> &str {
        let key = max_masses.min(MAX_UNIFORM_MASSES);
        self.entries
            .entry(key)
            .or_insert_with(|| generate_grid_shader(&self.formula, self.r_min, key))
    }

    /// Number of distinct shaders generated so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no shader has been generated yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    use crate::mass::{MassCategory, MassId};

    /// Validates WGSL code using naga.
    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    fn mass_at(id: u64, x: f32, y: f32, magnitude: f32) -> Mass {
        Mass {
            id: MassId(id),
            position: Vec2::new(x, y),
            magnitude,
            category: MassCategory::Custom,
        }
    }

    #[test]
    fn test_schwarzschild_shader_validates() {
        let shader = generate_grid_shader(&WarpFormula::default(), 0.1, 16);
        assert!(shader.contains("warp_height"));
        assert!(shader.contains("mass_count"));
        validate_wgsl(&shader).expect("Schwarzschild grid shader should be valid");
    }

    #[test]
    fn test_pseudo_newtonian_shader_validates() {
        let formula = WarpFormula::PseudoNewtonian {
            strength: 2.0,
            epsilon: 0.5,
        };
        let shader = generate_grid_shader(&formula, 0.1, 16);
        assert!(shader.contains("2.0"));
        assert!(shader.contains("0.5"));
        validate_wgsl(&shader).expect("pseudo-Newtonian grid shader should be valid");
    }

    #[test]
    fn test_loop_bound_clamped_to_capacity() {
        let shader = generate_grid_shader(&WarpFormula::default(), 0.1, 64);
        assert!(shader.contains(&format!("array<vec4<f32>, {}>", MAX_UNIFORM_MASSES)));
        assert!(shader.contains(&format!("i < {}u", MAX_UNIFORM_MASSES)));
        validate_wgsl(&shader).expect("clamped shader should be valid");
    }

    #[test]
    fn test_handle_shader_validates() {
        assert!(HANDLE_SHADER.contains("texture_2d_array"));
        validate_wgsl(HANDLE_SHADER).expect("handle shader should be valid");
    }

    #[test]
    fn test_cache_generates_once() {
        let mut cache = ShaderCache::new(&WarpConfig::default());
        assert!(cache.is_empty());

        let first = cache.get(16).to_owned();
        let second = cache.get(16).to_owned();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);

        cache.get(8);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_uniform_layout_size() {
        // mat4 (64) + 16 x vec4 (256) + count (4) + pad (12), matching the
        // WGSL struct size rounded to 16-byte alignment.
        assert_eq!(std::mem::size_of::<GridUniforms>(), 336);
    }

    #[test]
    fn test_write_masses_packs_and_caps() {
        let mut uniforms = GridUniforms::new();
        let masses: Vec<Mass> = (0..20)
            .map(|i| mass_at(i, i as f32, -(i as f32), 1.0 + i as f32 * 0.1))
            .collect();

        uniforms.write_masses(&masses, 16);
        assert_eq!(uniforms.mass_count, 16);
        assert_eq!(uniforms.masses[0][0], 0.0);
        assert_eq!(uniforms.masses[3][0], 3.0);
        assert_eq!(uniforms.masses[3][1], -3.0);

        // A smaller list lowers the cutoff and clears old slots.
        uniforms.write_masses(&masses[..2], 16);
        assert_eq!(uniforms.mass_count, 2);
        assert_eq!(uniforms.masses[5], [0.0; 4]);
    }
}
