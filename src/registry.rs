//! The mass registry: the authoritative scene model.
//!
//! A single owned container holds every mass plus the selection and drag
//! flags. All mutation goes through the registry's own operations; readers
//! always observe the latest committed write. There is no locking because
//! there is no parallel access: the event loop and the frame loop sequence
//! every touch.
//!
//! Render and UI layers subscribe to change notifications instead of
//! polling:
//!
//! ```
//! use glam::Vec2;
//! use warpgrid::{MassCategory, MassRegistry, RegistryEvent};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let mut registry = MassRegistry::new(Default::default());
//! let adds = Rc::new(Cell::new(0));
//! let counter = adds.clone();
//! registry.subscribe(move |event| {
//!     if matches!(event, RegistryEvent::MassAdded(_)) {
//!         counter.set(counter.get() + 1);
//!     }
//! });
//!
//! registry.add(Vec2::new(2.0, 3.0), MassCategory::Custom);
//! assert_eq!(adds.get(), 1);
//! ```

use glam::Vec2;
use rand::Rng;

use crate::config::MassConfig;
use crate::mass::{Mass, MassCategory, MassId};

/// Change notification emitted after a registry mutation.
///
/// No-op mutations (absent id, unchanged flag) emit nothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RegistryEvent {
    MassAdded(MassId),
    MassRemoved(MassId),
    PositionChanged { id: MassId, position: Vec2 },
    MagnitudeChanged { id: MassId, magnitude: f32 },
    CategoryChanged(MassId),
    SelectionChanged(Option<MassId>),
    DraggingChanged(bool),
    /// The whole scene was replaced by the seed snapshot.
    Reset,
}

/// Handle for removing a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&RegistryEvent)>;

/// Process-wide shared mutable store of masses.
///
/// Seeded with one default mass at the origin. The registry may become
/// empty through deletion; every consumer tolerates that.
pub struct MassRegistry {
    config: MassConfig,
    masses: Vec<Mass>,
    selected: Option<MassId>,
    dragging: bool,
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl MassRegistry {
    /// Create a registry seeded with one default mass at the origin.
    pub fn new(config: MassConfig) -> Self {
        let mut registry = Self {
            config,
            masses: Vec::new(),
            selected: None,
            dragging: false,
            next_id: 0,
            subscribers: Vec::new(),
            next_subscription: 0,
        };
        registry.seed();
        registry
    }

    fn seed(&mut self) {
        let id = self.allocate_id();
        self.masses.push(Mass {
            id,
            position: Vec2::ZERO,
            magnitude: self.config.default,
            category: MassCategory::Custom,
        });
    }

    fn allocate_id(&mut self) -> MassId {
        let id = MassId(self.next_id);
        self.next_id += 1;
        id
    }

    fn emit(&mut self, event: RegistryEvent) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&event);
        }
    }

    // ========== Reads ==========

    /// All masses, in insertion order.
    pub fn masses(&self) -> &[Mass] {
        &self.masses
    }

    /// Look up a mass by id.
    pub fn get(&self, id: MassId) -> Option<&Mass> {
        self.masses.iter().find(|m| m.id == id)
    }

    /// Number of masses in the scene.
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    /// Whether the scene holds no masses.
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    /// Currently selected mass, if any.
    pub fn selected(&self) -> Option<MassId> {
        self.selected
    }

    /// Whether a drag is active anywhere in the scene.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// The magnitude configuration this registry clamps against.
    pub fn config(&self) -> &MassConfig {
        &self.config
    }

    // ========== Mutations ==========

    /// Insert a new mass at `position` and return its id.
    ///
    /// Non-custom categories take their preset magnitude; custom masses
    /// take the configured default. Always succeeds.
    pub fn add(&mut self, position: Vec2, category: MassCategory) -> MassId {
        let magnitude = category
            .preset_magnitude()
            .unwrap_or(self.config.default);
        let id = self.allocate_id();
        self.masses.push(Mass {
            id,
            position,
            magnitude: self.config.clamp_magnitude(magnitude),
            category,
        });
        self.emit(RegistryEvent::MassAdded(id));
        id
    }

    /// Remove a mass. No-op if `id` is absent; clears the selection when
    /// it pointed at the removed mass.
    pub fn remove(&mut self, id: MassId) {
        let before = self.masses.len();
        self.masses.retain(|m| m.id != id);
        if self.masses.len() == before {
            return;
        }
        self.emit(RegistryEvent::MassRemoved(id));
        if self.selected == Some(id) {
            self.selected = None;
            self.emit(RegistryEvent::SelectionChanged(None));
        }
    }

    /// Move a mass. No-op if `id` is absent.
    pub fn update_position(&mut self, id: MassId, position: Vec2) {
        if let Some(mass) = self.masses.iter_mut().find(|m| m.id == id) {
            mass.position = position;
            self.emit(RegistryEvent::PositionChanged { id, position });
        }
    }

    /// Set a mass's magnitude, clamped to the configured range. No-op if
    /// `id` is absent.
    pub fn update_magnitude(&mut self, id: MassId, magnitude: f32) {
        let clamped = self.config.clamp_magnitude(magnitude);
        if let Some(mass) = self.masses.iter_mut().find(|m| m.id == id) {
            mass.magnitude = clamped;
            self.emit(RegistryEvent::MagnitudeChanged {
                id,
                magnitude: clamped,
            });
        }
    }

    /// Change a mass's category. A non-custom category also forces the
    /// magnitude to its preset value. No-op if `id` is absent.
    pub fn update_category(&mut self, id: MassId, category: MassCategory) {
        let preset = category.preset_magnitude();
        let Some(mass) = self.masses.iter_mut().find(|m| m.id == id) else {
            return;
        };
        mass.category = category;
        let mut forced_magnitude = None;
        if let Some(preset) = preset {
            let clamped = self.config.clamp_magnitude(preset);
            if mass.magnitude != clamped {
                forced_magnitude = Some(clamped);
            }
            mass.magnitude = clamped;
        }
        self.emit(RegistryEvent::CategoryChanged(id));
        if let Some(magnitude) = forced_magnitude {
            self.emit(RegistryEvent::MagnitudeChanged { id, magnitude });
        }
    }

    /// Select a mass, or clear the selection with `None`. Always succeeds.
    pub fn select(&mut self, id: Option<MassId>) {
        if self.selected != id {
            self.selected = id;
            self.emit(RegistryEvent::SelectionChanged(id));
        }
    }

    /// Set the global dragging flag.
    pub fn set_dragging(&mut self, dragging: bool) {
        if self.dragging != dragging {
            self.dragging = dragging;
            self.emit(RegistryEvent::DraggingChanged(dragging));
        }
    }

    /// Atomically replace the scene with the seed snapshot: one default
    /// mass at the origin, nothing selected, not dragging.
    ///
    /// Ids are never reused, so the reseeded mass gets a fresh id.
    pub fn reset(&mut self) {
        self.masses.clear();
        self.selected = None;
        self.dragging = false;
        self.seed();
        self.emit(RegistryEvent::Reset);
    }

    /// Random spawn position within the safe play area, matching how the
    /// control panel places new masses.
    pub fn spawn_position<R: Rng>(safe_bounds: f32, rng: &mut R) -> Vec2 {
        let spread = safe_bounds * 1.6;
        Vec2::new(
            (rng.gen::<f32>() - 0.5) * spread,
            (rng.gen::<f32>() - 0.5) * spread,
        )
    }

    // ========== Subscriptions ==========

    /// Register a change-notification callback. The callback runs
    /// synchronously inside every mutation that changes observable state.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&RegistryEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription. No-op if already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }
}

impl std::fmt::Debug for MassRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MassRegistry")
            .field("masses", &self.masses)
            .field("selected", &self.selected)
            .field("dragging", &self.dragging)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn registry() -> MassRegistry {
        MassRegistry::new(MassConfig::default())
    }

    #[test]
    fn test_seeded_with_one_mass_at_origin() {
        let registry = registry();
        assert_eq!(registry.len(), 1);
        let seed = &registry.masses()[0];
        assert_eq!(seed.position, Vec2::ZERO);
        assert_eq!(seed.magnitude, registry.config().default);
        assert_eq!(seed.category, MassCategory::Custom);
        assert_eq!(registry.selected(), None);
        assert!(!registry.is_dragging());
    }

    #[test]
    fn test_add_get_remove_round_trip() {
        let mut registry = registry();
        let position = Vec2::new(3.0, -4.0);
        let id = registry.add(position, MassCategory::Custom);

        let mass = registry.get(id).expect("mass should exist after add");
        assert_eq!(mass.position, position);
        assert_eq!(mass.magnitude, registry.config().default);

        registry.remove(id);
        assert!(registry.get(id).is_none());
    }

    #[test]
    fn test_ids_are_unique_and_never_reused() {
        let mut registry = registry();
        let a = registry.add(Vec2::ZERO, MassCategory::Custom);
        registry.remove(a);
        let b = registry.add(Vec2::ZERO, MassCategory::Custom);
        assert_ne!(a, b);

        registry.reset();
        let seed_id = registry.masses()[0].id;
        assert_ne!(seed_id, a);
        assert_ne!(seed_id, b);
    }

    #[test]
    fn test_magnitude_always_clamped() {
        let mut registry = registry();
        let id = registry.add(Vec2::ZERO, MassCategory::Custom);
        let config = *registry.config();

        for value in [-5.0, 0.0, 0.49, 3.0, 10.0, 10.5, f32::MAX] {
            registry.update_magnitude(id, value);
            let magnitude = registry.get(id).unwrap().magnitude;
            assert!(magnitude >= config.min && magnitude <= config.max);
        }
    }

    #[test]
    fn test_category_add_uses_preset() {
        let mut registry = registry();
        let id = registry.add(Vec2::ZERO, MassCategory::Pulsar);
        let mass = registry.get(id).unwrap();
        assert_eq!(mass.category, MassCategory::Pulsar);
        assert_eq!(
            mass.magnitude,
            MassCategory::Pulsar.preset_magnitude().unwrap()
        );
    }

    #[test]
    fn test_category_update_forces_preset_magnitude() {
        let mut registry = registry();
        let id = registry.add(Vec2::ZERO, MassCategory::Custom);
        registry.update_magnitude(id, 5.0);

        registry.update_category(id, MassCategory::RedGiant);
        let mass = registry.get(id).unwrap();
        assert_eq!(mass.category, MassCategory::RedGiant);
        assert_eq!(
            mass.magnitude,
            MassCategory::RedGiant.preset_magnitude().unwrap()
        );

        // Switching back to custom keeps the preset value until edited.
        registry.update_category(id, MassCategory::Custom);
        assert_eq!(registry.get(id).unwrap().magnitude, 8.0);
    }

    #[test]
    fn test_absent_id_mutations_are_noops() {
        let mut registry = registry();
        let ghost = MassId(999);

        registry.update_position(ghost, Vec2::new(1.0, 1.0));
        registry.update_magnitude(ghost, 3.0);
        registry.update_category(ghost, MassCategory::Star);
        registry.remove(ghost);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_selected_clears_selection() {
        let mut registry = registry();
        let id = registry.add(Vec2::new(1.0, 1.0), MassCategory::Custom);
        registry.select(Some(id));
        assert_eq!(registry.selected(), Some(id));

        registry.remove(id);
        assert_eq!(registry.selected(), None);
    }

    #[test]
    fn test_remove_other_keeps_selection() {
        let mut registry = registry();
        let keep = registry.add(Vec2::new(1.0, 1.0), MassCategory::Custom);
        let drop = registry.add(Vec2::new(2.0, 2.0), MassCategory::Custom);
        registry.select(Some(keep));

        registry.remove(drop);
        assert_eq!(registry.selected(), Some(keep));
    }

    #[test]
    fn test_registry_may_become_empty() {
        let mut registry = registry();
        let seed_id = registry.masses()[0].id;
        registry.remove(seed_id);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut registry = registry();
        registry.add(Vec2::new(4.0, 4.0), MassCategory::Star);
        registry.select(registry.masses().first().map(|m| m.id));
        registry.set_dragging(true);

        registry.reset();
        let once: Vec<(Vec2, f32, MassCategory)> = registry
            .masses()
            .iter()
            .map(|m| (m.position, m.magnitude, m.category))
            .collect();
        let selected_once = registry.selected();
        let dragging_once = registry.is_dragging();

        registry.reset();
        let twice: Vec<(Vec2, f32, MassCategory)> = registry
            .masses()
            .iter()
            .map(|m| (m.position, m.magnitude, m.category))
            .collect();

        assert_eq!(once, twice);
        assert_eq!(selected_once, registry.selected());
        assert_eq!(dragging_once, registry.is_dragging());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.selected(), None);
        assert!(!registry.is_dragging());
    }

    #[test]
    fn test_events_fire_for_mutations() {
        let mut registry = registry();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        registry.subscribe(move |event| sink.borrow_mut().push(*event));

        let id = registry.add(Vec2::ZERO, MassCategory::Custom);
        registry.update_position(id, Vec2::new(1.0, 0.0));
        registry.select(Some(id));
        registry.set_dragging(true);
        registry.set_dragging(true); // unchanged, no event
        registry.remove(id);

        let recorded = events.borrow();
        assert_eq!(
            *recorded,
            vec![
                RegistryEvent::MassAdded(id),
                RegistryEvent::PositionChanged {
                    id,
                    position: Vec2::new(1.0, 0.0),
                },
                RegistryEvent::SelectionChanged(Some(id)),
                RegistryEvent::DraggingChanged(true),
                RegistryEvent::MassRemoved(id),
                RegistryEvent::SelectionChanged(None),
            ]
        );
    }

    #[test]
    fn test_noop_mutations_emit_nothing() {
        let mut registry = registry();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        registry.subscribe(move |event| sink.borrow_mut().push(*event));

        registry.update_position(MassId(999), Vec2::ONE);
        registry.update_magnitude(MassId(999), 2.0);
        registry.remove(MassId(999));
        registry.select(None); // already None

        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut registry = registry();
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let subscription = registry.subscribe(move |_| *sink.borrow_mut() += 1);

        registry.add(Vec2::ZERO, MassCategory::Custom);
        assert_eq!(*count.borrow(), 1);

        registry.unsubscribe(subscription);
        registry.add(Vec2::ZERO, MassCategory::Custom);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_spawn_position_within_safe_area() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let position = MassRegistry::spawn_position(8.0, &mut rng);
            assert!(position.x.abs() <= 8.0 * 0.8 + 1e-3);
            assert!(position.y.abs() <= 8.0 * 0.8 + 1e-3);
        }
    }
}
