//! The mass data model.
//!
//! A [`Mass`] is a point body in the simulation plane: a stable identifier,
//! a 2D position, a magnitude in solar masses, and a [`MassCategory`]
//! classifying it as a physical preset or a free-form custom body.
//!
//! Magnitude drives everything downstream: the warp contribution, the
//! visual scale of the handle sphere, and through that the collision
//! radius. The scale mapping lives here so the renderer and the collision
//! solver can never disagree about how big a body is.

use glam::Vec2;

use crate::config::MassConfig;

/// Stable identifier for a mass.
///
/// Assigned once at creation and never reused, even after the mass is
/// removed or the scene is reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MassId(pub(crate) u64);

impl MassId {
    /// Raw numeric value, useful as a deterministic seed for cosmetic
    /// effects tied to a body.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Physical classification of a mass.
///
/// Non-custom categories fix the magnitude to a canonical preset value and
/// suppress manual magnitude editing in the control panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MassCategory {
    WhiteDwarf,
    NeutronStar,
    Pulsar,
    Star,
    RedGiant,
    /// Free-form magnitude, editable by the user.
    #[default]
    Custom,
}

impl MassCategory {
    /// All selectable categories, in ascending preset magnitude order.
    pub const ALL: [MassCategory; 6] = [
        MassCategory::WhiteDwarf,
        MassCategory::NeutronStar,
        MassCategory::Pulsar,
        MassCategory::Star,
        MassCategory::RedGiant,
        MassCategory::Custom,
    ];

    /// Canonical magnitude for a preset category, in solar masses.
    ///
    /// Returns `None` for [`MassCategory::Custom`].
    pub fn preset_magnitude(&self) -> Option<f32> {
        match self {
            MassCategory::WhiteDwarf => Some(0.6),
            MassCategory::NeutronStar => Some(1.4),
            MassCategory::Pulsar => Some(1.97),
            MassCategory::Star => Some(2.5),
            MassCategory::RedGiant => Some(8.0),
            MassCategory::Custom => None,
        }
    }

    /// Classify a magnitude into the category it most resembles.
    ///
    /// Used for cosmetic skins on custom masses.
    pub fn from_magnitude(magnitude: f32) -> Self {
        if magnitude < 0.8 {
            MassCategory::WhiteDwarf
        } else if magnitude < 1.4 {
            MassCategory::NeutronStar
        } else if magnitude < 2.5 {
            MassCategory::Pulsar
        } else if magnitude < 8.0 {
            MassCategory::Star
        } else {
            MassCategory::RedGiant
        }
    }

    /// Human-readable label for UI display.
    pub fn label(&self) -> &'static str {
        match self {
            MassCategory::WhiteDwarf => "White dwarf",
            MassCategory::NeutronStar => "Neutron star",
            MassCategory::Pulsar => "Pulsar",
            MassCategory::Star => "Star",
            MassCategory::RedGiant => "Red giant",
            MassCategory::Custom => "Custom",
        }
    }
}

/// One gravitating body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mass {
    pub id: MassId,
    /// Position in the simulation plane. Consumers clamp to the play area
    /// before committing; storage itself is unconstrained.
    pub position: Vec2,
    /// Magnitude in solar masses, always within the configured range.
    pub magnitude: f32,
    pub category: MassCategory,
}

impl MassConfig {
    /// Clamp a magnitude into the configured `[min, max]` range.
    pub fn clamp_magnitude(&self, magnitude: f32) -> f32 {
        magnitude.clamp(self.min, self.max)
    }

    /// Magnitude-proportional visual scale.
    ///
    /// Linear map from `[min, max]` magnitude to `[scale_min, scale_max]`.
    pub fn proportional_scale(&self, magnitude: f32) -> f32 {
        let normalized = (magnitude - self.min) / (self.max - self.min);
        self.scale_min + normalized * (self.scale_max - self.scale_min)
    }

    /// Actual radius of a body's visual boundary, used as its collision
    /// radius.
    pub fn visual_radius(&self, magnitude: f32) -> f32 {
        self.sphere_radius * self.proportional_scale(magnitude)
    }

    /// Final render scale including the selection/hover modifiers.
    pub fn handle_scale(&self, magnitude: f32, selected: bool, hovered: bool) -> f32 {
        let base = self.proportional_scale(magnitude);
        if selected {
            base * self.scale_selected
        } else if hovered {
            base * self.scale_hovered
        } else {
            base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_magnitudes_ascending() {
        let presets: Vec<f32> = MassCategory::ALL
            .iter()
            .filter_map(|c| c.preset_magnitude())
            .collect();
        assert_eq!(presets.len(), 5);
        for pair in presets.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_classification_matches_presets() {
        // Every preset magnitude classifies back to its own category.
        for category in MassCategory::ALL {
            if let Some(magnitude) = category.preset_magnitude() {
                assert_eq!(MassCategory::from_magnitude(magnitude), category);
            }
        }
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(MassCategory::from_magnitude(0.5), MassCategory::WhiteDwarf);
        assert_eq!(MassCategory::from_magnitude(0.8), MassCategory::NeutronStar);
        assert_eq!(MassCategory::from_magnitude(1.4), MassCategory::Pulsar);
        assert_eq!(MassCategory::from_magnitude(2.5), MassCategory::Star);
        assert_eq!(MassCategory::from_magnitude(8.0), MassCategory::RedGiant);
        assert_eq!(MassCategory::from_magnitude(10.0), MassCategory::RedGiant);
    }

    #[test]
    fn test_proportional_scale_endpoints() {
        let config = MassConfig::default();
        assert!((config.proportional_scale(config.min) - config.scale_min).abs() < 1e-6);
        assert!((config.proportional_scale(config.max) - config.scale_max).abs() < 1e-6);
    }

    #[test]
    fn test_visual_radius_monotonic() {
        let config = MassConfig::default();
        let mut last = 0.0;
        let mut magnitude = config.min;
        while magnitude <= config.max {
            let radius = config.visual_radius(magnitude);
            assert!(radius > last);
            last = radius;
            magnitude += config.step;
        }
    }

    #[test]
    fn test_handle_scale_modifiers() {
        let config = MassConfig::default();
        let base = config.handle_scale(1.0, false, false);
        let hovered = config.handle_scale(1.0, false, true);
        let selected = config.handle_scale(1.0, true, false);
        assert!(hovered > base);
        assert!(selected > hovered);
        // Selection wins over hover when both are set.
        assert_eq!(config.handle_scale(1.0, true, true), selected);
    }
}
