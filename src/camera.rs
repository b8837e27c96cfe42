//! Bounded orbit camera.
//!
//! Orbit camera over the grid plane with the clamping policy the sandbox
//! depends on: zoom distance stays within a configured range, the polar
//! angle never dips below the plane, and the orbit target pans only within
//! the play area with its height pinned to the plane. The camera also
//! unprojects screen positions into world-space rays for the interaction
//! controller.

use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;

/// A world-space ray, used for pointer picking.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Intersect with the horizontal plane `y = height`.
    ///
    /// Returns the intersection point, or `None` when the ray is parallel
    /// to the plane or points away from it.
    pub fn intersect_plane(&self, height: f32) -> Option<Vec3> {
        if self.direction.y.abs() < 1e-6 {
            return None;
        }
        let t = (height - self.origin.y) / self.direction.y;
        if t < 0.0 {
            return None;
        }
        Some(self.origin + self.direction * t)
    }

    /// Intersect with a sphere, returning the distance along the ray to
    /// the nearest hit.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let to_center = center - self.origin;
        let projected = to_center.dot(self.direction);
        let closest_sq = to_center.length_squared() - projected * projected;
        let radius_sq = radius * radius;
        if closest_sq > radius_sq {
            return None;
        }
        let half_chord = (radius_sq - closest_sq).sqrt();
        let t = if projected - half_chord >= 0.0 {
            projected - half_chord
        } else {
            projected + half_chord
        };
        (t >= 0.0).then_some(t)
    }
}

/// Orbit camera with bounded distance, polar angle, and pan target.
#[derive(Clone, Copy, Debug)]
pub struct OrbitCamera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Elevation above the grid plane in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    config: CameraConfig,
}

impl OrbitCamera {
    /// Create a camera at the configured initial position, looking at the
    /// origin.
    pub fn new(config: CameraConfig) -> Self {
        let position = Vec3::from(config.position);
        let distance = position.length();
        let pitch = (position.y / distance.max(1e-6)).asin();
        let yaw = position.x.atan2(position.z);
        let mut camera = Self {
            yaw,
            pitch,
            distance,
            target: Vec3::ZERO,
            config,
        };
        camera.clamp();
        camera
    }

    /// Minimum pitch keeping the polar angle within bounds.
    fn min_pitch(&self) -> f32 {
        std::f32::consts::FRAC_PI_2 - self.config.max_polar_angle
    }

    fn clamp(&mut self) {
        self.distance = self
            .distance
            .clamp(self.config.min_distance, self.config.max_distance);
        self.pitch = self
            .pitch
            .clamp(self.min_pitch(), std::f32::consts::FRAC_PI_2 - 0.01);
        let bounds = self.config.pan_bounds;
        self.target.x = self.target.x.clamp(-bounds, bounds);
        self.target.z = self.target.z.clamp(-bounds, bounds);
        self.target.y = 0.0;
    }

    /// Rotate around the target. Pitch stays within the polar limit.
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch += delta_pitch;
        self.clamp();
    }

    /// Zoom toward or away from the target, within the distance bounds.
    pub fn zoom(&mut self, delta: f32) {
        self.distance -= delta;
        self.clamp();
    }

    /// Pan the orbit target in the grid plane, within the pan bounds.
    pub fn pan(&mut self, delta: Vec2) {
        self.target.x += delta.x;
        self.target.z += delta.y;
        self.clamp();
    }

    /// Camera world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// View matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Projection matrix for the given aspect ratio.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.config.fov_degrees.to_radians(), aspect, 0.1, 200.0)
    }

    /// Combined view-projection matrix.
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Unproject a normalized-device-coordinate position into a world ray.
    pub fn screen_ray(&self, ndc: Vec2, aspect: f32) -> Ray {
        let inverse = self.view_proj(aspect).inverse();
        let near = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray {
            origin: near,
            direction: (far - near).normalize(),
        }
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}
