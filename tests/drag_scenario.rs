//! End-to-end interaction scenarios against the public API.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec2, Vec3};

use warpgrid::camera::Ray;
use warpgrid::collision::CollisionSolver;
use warpgrid::config::SceneConfig;
use warpgrid::interaction::DragController;
use warpgrid::mass::MassCategory;
use warpgrid::registry::{MassRegistry, RegistryEvent};

/// Ray pointing straight down at a plane coordinate.
fn ray_at(x: f32, y: f32) -> Ray {
    Ray {
        origin: Vec3::new(x, 10.0, y),
        direction: Vec3::new(0.0, -1.0, 0.0),
    }
}

#[test]
fn drag_toward_heavy_mass_halts_at_separation_boundary() {
    let config = SceneConfig::default();
    let mut registry = MassRegistry::new(config.mass);
    let mut controller = DragController::new(&config);

    let seed = registry.masses()[0].id;
    let giant = registry.add(Vec2::new(5.0, 5.0), MassCategory::RedGiant);
    let giant_magnitude = registry.get(giant).unwrap().magnitude;
    assert_eq!(giant_magnitude, 8.0);

    // Drag the seed mass from the origin straight into the giant, one small
    // step at a time, committing every frame.
    assert!(controller.pointer_down(ray_at(0.0, 0.0), &mut registry));
    for i in 1..=100 {
        let t = i as f32 / 100.0;
        controller.pointer_move(ray_at(5.0 * t, 5.0 * t), &registry);
        controller.frame_tick(&mut registry);
    }
    controller.pointer_up(&mut registry);

    let solver = CollisionSolver::new(config.mass, config.collision);
    let min = solver.min_separation(1.0, giant_magnitude);
    let distance = registry
        .get(seed)
        .unwrap()
        .position
        .distance(registry.get(giant).unwrap().position);

    // The dragged mass never penetrates the separation boundary.
    assert!(
        distance >= min - 1e-3,
        "distance {} fell below minimum separation {}",
        distance,
        min
    );
    // And it got as close as it is allowed to.
    assert!(distance < min + 0.5);

    // The giant itself never moved.
    assert_eq!(registry.get(giant).unwrap().position, Vec2::new(5.0, 5.0));
}

#[test]
fn full_drag_emits_expected_event_sequence() {
    let config = SceneConfig::default();
    let mut registry = MassRegistry::new(config.mass);
    let mut controller = DragController::new(&config);
    let seed = registry.masses()[0].id;

    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    registry.subscribe(move |event| {
        sink.borrow_mut().push(match event {
            RegistryEvent::SelectionChanged(id) => format!("select:{:?}", id.is_some()),
            RegistryEvent::DraggingChanged(on) => format!("dragging:{}", on),
            RegistryEvent::PositionChanged { .. } => "position".to_owned(),
            other => format!("{:?}", other),
        });
    });

    controller.pointer_down(ray_at(0.0, 0.0), &mut registry);
    controller.pointer_move(ray_at(1.0, 0.0), &registry);
    controller.frame_tick(&mut registry);
    controller.pointer_move(ray_at(2.0, 0.0), &registry);
    controller.pointer_up(&mut registry);

    assert_eq!(
        log.borrow().as_slice(),
        [
            "select:true",
            "dragging:true",
            "position",
            "position",
            "select:false",
            "dragging:false",
        ]
    );
    assert_eq!(registry.get(seed).unwrap().position, Vec2::new(2.0, 0.0));
}

#[test]
fn warp_deepens_as_mass_is_dragged_closer() {
    let config = SceneConfig::default();
    let mut registry = MassRegistry::new(config.mass);
    let mut controller = DragController::new(&config);

    let sample = Vec2::new(6.0, 0.0);
    let before = config.warp.height(sample, registry.masses());

    controller.pointer_down(ray_at(0.0, 0.0), &mut registry);
    controller.pointer_move(ray_at(4.0, 0.0), &registry);
    controller.pointer_up(&mut registry);

    let after = config.warp.height(sample, registry.masses());
    assert!(
        after < before,
        "well at sample point should deepen: before {}, after {}",
        before,
        after
    );
}
