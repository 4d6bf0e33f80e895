//! Locomotion Tests - jump grace windows, wall jumps, and dash charges
//!
//! Drives the movement controller through its public API at a fixed tick
//! rate, the way an embedding game loop does, and checks the timing-
//! sensitive mechanics end to end: coyote time, jump buffering, the
//! wall-jump alternation rule, and dash charge restoration.

use cliffside_core::camera::CameraRig;
use cliffside_core::config::Tuning;
use cliffside_core::input::FrameInput;
use cliffside_core::physics::{StaticWorld, SurfaceEffect, layers};
use cliffside_core::player::{Body, PlayerController};
use glam::Vec3;

// 10ms ticks make the 120ms grace windows land on exact tick counts.
const DT: f32 = 0.01;

fn controller() -> PlayerController {
    let t = Tuning::default();
    PlayerController::new(t.movement, t.jump, t.wall_jump, t.dash, t.detection)
}

/// Floor slab with its top face at y=0.
fn floor_world() -> StaticWorld {
    let mut world = StaticWorld::new();
    world.add_surface(
        Vec3::new(-50.0, -1.0, -50.0),
        Vec3::new(50.0, 0.0, 50.0),
        layers::GROUND,
        SurfaceEffect::None,
    );
    world
}

fn step(c: &mut PlayerController, body: &mut Body, world: &StaticWorld, input: FrameInput) {
    let camera = CameraRig::new(0.0);
    c.tick(DT, input, body, world, &camera);
}

fn jump_press() -> FrameInput {
    let mut input = FrameInput::neutral();
    input.jump_pressed = true;
    input.jump_held = true;
    input
}

// ============================================================================
// COYOTE TIME
// ============================================================================

#[test]
fn test_coyote_jump_within_window() {
    let world = floor_world();
    let mut c = controller();
    let mut body = Body::new(Vec3::new(0.0, 0.901, 0.0));
    step(&mut c, &mut body, &world, FrameInput::neutral());
    assert!(c.is_grounded());

    // Walk off a ledge: airborne, with the grace window counting down.
    body.position = Vec3::new(0.0, 10.0, 0.0);
    for _ in 0..9 {
        step(&mut c, &mut body, &world, FrameInput::neutral());
    }

    // Pressed 0.10s after leaving ground, inside the 0.12s window.
    step(&mut c, &mut body, &world, jump_press());
    assert!(c.velocity().y > 5.0, "jump fires inside the coyote window");
}

#[test]
fn test_coyote_jump_after_window() {
    let world = floor_world();
    let mut c = controller();
    let mut body = Body::new(Vec3::new(0.0, 0.901, 0.0));
    step(&mut c, &mut body, &world, FrameInput::neutral());

    body.position = Vec3::new(0.0, 10.0, 0.0);
    for _ in 0..12 {
        step(&mut c, &mut body, &world, FrameInput::neutral());
    }

    // 0.13s after leaving ground: the window is gone.
    step(&mut c, &mut body, &world, jump_press());
    assert!(c.velocity().y < 0.0, "too late, keeps falling");
}

// ============================================================================
// JUMP BUFFER
// ============================================================================

#[test]
fn test_buffered_jump_fires_on_landing() {
    let world = floor_world();
    let mut c = controller();
    let mut body = Body::new(Vec3::new(0.0, 3.0, 0.0));

    // Press while still in the air: nothing happens yet.
    step(&mut c, &mut body, &world, jump_press());
    assert!(c.velocity().y < 0.0);

    for _ in 0..8 {
        step(&mut c, &mut body, &world, FrameInput::neutral());
    }

    // Touch down 0.10s after the press: the buffered jump fires.
    body.position = Vec3::new(0.0, 0.901, 0.0);
    c.set_velocity(Vec3::ZERO);
    step(&mut c, &mut body, &world, FrameInput::neutral());
    assert!(c.velocity().y > 5.0, "buffered press fires on touchdown");
}

#[test]
fn test_jump_buffer_expires() {
    let world = floor_world();
    let mut c = controller();
    let mut body = Body::new(Vec3::new(0.0, 3.0, 0.0));

    step(&mut c, &mut body, &world, jump_press());
    for _ in 0..12 {
        step(&mut c, &mut body, &world, FrameInput::neutral());
    }

    // Landing 0.13s after the press: the buffer has run out.
    body.position = Vec3::new(0.0, 0.901, 0.0);
    c.set_velocity(Vec3::ZERO);
    step(&mut c, &mut body, &world, FrameInput::neutral());
    assert!(c.is_grounded());
    assert!(c.velocity().y <= 0.0, "stale press is forgotten");
}

// ============================================================================
// WALL JUMP ALTERNATION
// ============================================================================

/// Two facing walls with a 1m corridor between them, tall enough that the
/// body never clears the top or reaches the bottom during a test.
fn corridor_world() -> StaticWorld {
    let mut world = StaticWorld::new();
    world.add_surface(
        Vec3::new(0.5, -200.0, -4.0),
        Vec3::new(2.0, 50.0, 4.0),
        layers::GROUND,
        SurfaceEffect::None,
    );
    world.add_surface(
        Vec3::new(-2.0, -200.0, -4.0),
        Vec3::new(-0.5, 50.0, 4.0),
        layers::GROUND,
        SurfaceEffect::None,
    );
    world
}

fn slide_until(
    c: &mut PlayerController,
    body: &mut Body,
    world: &StaticWorld,
    input_h: f32,
    max_ticks: usize,
) -> bool {
    for _ in 0..max_ticks {
        step(c, body, world, FrameInput::axes(input_h, 0.0));
        if c.is_wall_sliding() {
            return true;
        }
    }
    false
}

#[test]
fn test_wall_jumps_alternate_between_opposite_walls() {
    let world = corridor_world();
    let mut c = controller();
    let mut body = Body::new(Vec3::new(0.0, 10.0, 0.0));

    // Fall against the right wall, pushing into it.
    assert!(slide_until(&mut c, &mut body, &world, 1.0, 100));

    let mut press = FrameInput::axes(1.0, 0.0);
    press.jump_pressed = true;
    step(&mut c, &mut body, &world, press);
    assert!(c.velocity().y > 10.0, "first wall jump fires");
    assert!(c.velocity().x < 0.0, "kicked away from the right wall");

    // Cross the corridor and slide down the left wall.
    assert!(slide_until(&mut c, &mut body, &world, -1.0, 300));

    let mut press = FrameInput::axes(-1.0, 0.0);
    press.jump_pressed = true;
    step(&mut c, &mut body, &world, press);
    assert!(c.velocity().y > 10.0, "the opposite wall accepts a second jump");
    assert!(c.velocity().x > 0.0);
}

#[test]
fn test_same_wall_rejects_a_second_jump() {
    let mut world = StaticWorld::new();
    world.add_surface(
        Vec3::new(0.5, -500.0, -4.0),
        Vec3::new(2.0, 50.0, 4.0),
        layers::GROUND,
        SurfaceEffect::None,
    );
    let mut c = controller();
    let mut body = Body::new(Vec3::new(0.0, 10.0, 0.0));

    assert!(slide_until(&mut c, &mut body, &world, 1.0, 100));
    let mut press = FrameInput::axes(1.0, 0.0);
    press.jump_pressed = true;
    step(&mut c, &mut body, &world, press);
    assert!(c.velocity().y > 10.0);

    // Keep pushing into the same wall and mashing jump. Once the arc tips
    // over, nothing may send the body upward again: there is no other wall
    // to alternate with and no ground below.
    let mut descended = false;
    for i in 1..=600 {
        let mut input = FrameInput::axes(1.0, 0.0);
        if i % 25 == 0 {
            input.jump_pressed = true;
        }
        step(&mut c, &mut body, &world, input);
        if !descended {
            if c.velocity().y < 0.0 {
                descended = true;
            }
        } else {
            assert!(c.velocity().y <= 1e-3, "same wall must not fire again");
        }
    }
    assert!(descended);
}

// ============================================================================
// DASH CHARGES
// ============================================================================

#[test]
fn test_landing_restores_the_dash_charge() {
    let world = floor_world();
    let mut c = controller();
    let mut body = Body::new(Vec3::new(0.0, 6.0, 0.0));

    let mut dash = FrameInput::axes(0.0, 1.0);
    dash.dash_pressed = true;
    step(&mut c, &mut body, &world, dash);
    assert!(c.is_dashing());
    assert_eq!(c.dashes_left(), 0);

    // Dash runs out, body falls and lands.
    for _ in 0..200 {
        step(&mut c, &mut body, &world, FrameInput::neutral());
    }
    assert!(c.is_grounded());
    assert_eq!(c.dashes_left(), 1);
}
