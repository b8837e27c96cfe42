//! Scene configuration.
//!
//! Every tunable constant of the sandbox lives here, grouped by concern and
//! overridable through builder-style methods. Defaults are scaled for
//! visualization, not physical SI units (G and C are nominally 1).
//!
//! # Example
//!
//! ```
//! use warpgrid::config::{SceneConfig, WarpFormula};
//!
//! let config = SceneConfig::new()
//!     .with_formula(WarpFormula::PseudoNewtonian {
//!         strength: 2.0,
//!         epsilon: 0.5,
//!     })
//!     .with_base_resolution(96);
//! ```

pub use crate::warp::WarpFormula;

/// Magnitude range and visual-scale mapping for masses.
///
/// Magnitudes are in solar-mass units. The visual scale maps the magnitude
/// range linearly onto `[scale_min, scale_max]`; the collision radius is
/// `sphere_radius` times that scale.
#[derive(Clone, Copy, Debug)]
pub struct MassConfig {
    /// Smallest allowed magnitude (solar masses).
    pub min: f32,
    /// Largest allowed magnitude (solar masses).
    pub max: f32,
    /// Magnitude assigned to newly added custom masses.
    pub default: f32,
    /// Slider step for magnitude editing.
    pub step: f32,
    /// Visual scale at `min` magnitude.
    pub scale_min: f32,
    /// Visual scale at `max` magnitude.
    pub scale_max: f32,
    /// Base radius of the mass handle sphere before scaling.
    pub sphere_radius: f32,
    /// Extra scale multiplier while hovered. Defaults above 1.0 so the
    /// hovered and selected states are visually distinct from idle.
    pub scale_hovered: f32,
    /// Extra scale multiplier while selected, applied instead of (not on
    /// top of) the hover multiplier.
    pub scale_selected: f32,
}

impl Default for MassConfig {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 10.0,
            default: 1.0,
            step: 0.5,
            scale_min: 0.5,
            scale_max: 2.0,
            sphere_radius: 1.0,
            scale_hovered: 1.1,
            scale_selected: 1.2,
        }
    }
}

/// Collision resolution tuning.
#[derive(Clone, Copy, Debug)]
pub struct CollisionConfig {
    /// Buffer kept between the visual boundaries of two masses.
    pub buffer: f32,
    /// Maximum push-out passes per resolve call.
    pub iterations: u32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            buffer: 0.3,
            iterations: 3,
        }
    }
}

/// Warp field evaluation settings.
#[derive(Clone, Copy, Debug)]
pub struct WarpConfig {
    /// Which falloff formula the field uses, CPU and GPU alike.
    pub formula: WarpFormula,
    /// Numerical floor on the planar distance, preventing the singularity
    /// at a mass center.
    pub r_min: f32,
    /// Masses beyond this count stop contributing to the field. Also sizes
    /// the uniform arrays in the generated shader.
    pub max_masses: usize,
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            formula: WarpFormula::default(),
            r_min: 0.1,
            max_masses: 16,
        }
    }
}

/// Grid tessellation tiers keyed by mass count.
///
/// Per-frame evaluation cost is O(subdivisions^2 x mass count), so the grid
/// coarsens as more masses are added.
#[derive(Clone, Copy, Debug)]
pub struct ResolutionTiers {
    /// Subdivisions for 2 masses or fewer.
    pub low: u32,
    /// Subdivisions for 4 masses or fewer.
    pub medium: u32,
    /// Subdivisions above 4 masses.
    pub high: u32,
}

impl Default for ResolutionTiers {
    fn default() -> Self {
        Self {
            low: 64,
            medium: 96,
            high: 128,
        }
    }
}

/// Grid surface and play-area geometry.
#[derive(Clone, Copy, Debug)]
pub struct GridConfig {
    /// World-space edge length of the square grid surface.
    pub size: f32,
    /// Requested subdivision count; the adaptive policy never exceeds it.
    pub base_resolution: u32,
    /// Half-extent of the square play area masses are clamped into.
    pub max_bounds: f32,
    /// Smaller half-extent used when spawning at random positions.
    pub safe_bounds: f32,
    /// Adaptive tessellation tiers.
    pub tiers: ResolutionTiers,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 20.0,
            base_resolution: 128,
            max_bounds: 9.5,
            safe_bounds: 8.0,
            tiers: ResolutionTiers::default(),
        }
    }
}

/// Orbit camera limits.
#[derive(Clone, Copy, Debug)]
pub struct CameraConfig {
    /// Initial eye position.
    pub position: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Closest allowed orbit distance.
    pub min_distance: f32,
    /// Farthest allowed orbit distance.
    pub max_distance: f32,
    /// Largest polar angle from the vertical, keeping the camera above the
    /// grid plane.
    pub max_polar_angle: f32,
    /// Half-extent the orbit target may pan to.
    pub pan_bounds: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 12.0, 12.0],
            fov_degrees: 50.0,
            min_distance: 8.0,
            max_distance: 35.0,
            max_polar_angle: std::f32::consts::PI / 2.2,
            pan_bounds: 9.5,
        }
    }
}

/// Complete sandbox configuration.
///
/// Aggregates every tunable group; `SceneConfig::default()` is the stock
/// sandbox scene.
#[derive(Clone, Copy, Debug, Default)]
pub struct SceneConfig {
    pub mass: MassConfig,
    pub collision: CollisionConfig,
    pub warp: WarpConfig,
    pub grid: GridConfig,
    pub camera: CameraConfig,
}

impl SceneConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the warp falloff formula.
    pub fn with_formula(mut self, formula: WarpFormula) -> Self {
        self.warp.formula = formula;
        self
    }

    /// Override the magnitude range. `min` must be positive and below `max`.
    pub fn with_magnitude_range(mut self, min: f32, max: f32) -> Self {
        self.mass.min = min;
        self.mass.max = max;
        self
    }

    /// Override the collision buffer distance.
    pub fn with_collision_buffer(mut self, buffer: f32) -> Self {
        self.collision.buffer = buffer;
        self
    }

    /// Override the requested grid subdivision count.
    pub fn with_base_resolution(mut self, resolution: u32) -> Self {
        self.grid.base_resolution = resolution;
        self
    }

    /// Override the play-area half-extent (and camera pan bounds to match).
    pub fn with_play_area(mut self, half_extent: f32) -> Self {
        self.grid.max_bounds = half_extent;
        self.camera.pan_bounds = half_extent;
        self
    }

    /// Override the maximum number of field-contributing masses.
    pub fn with_max_masses(mut self, max_masses: usize) -> Self {
        self.warp.max_masses = max_masses;
        self
    }
}
