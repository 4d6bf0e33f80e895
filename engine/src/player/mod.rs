//! Player
//!
//! The player is three cooperating pieces sharing one [`Body`]:
//!
//! - [`PlayerController`] — momentum, jumping, dashing, wall slide/jump.
//! - [`WallClimb`] — the climbing state machine; while climbing it replaces
//!   the controller for the tick.
//! - [`PlatformDetector`] — surface effects: falling triggers, ice binding,
//!   death and checkpoint probes.
//!
//! [`Player::tick`] wires them together in the fixed order the mechanics
//! depend on and returns the tick's [`DetectorEvent`]s for the embedding
//! loop.

pub mod climb;
pub mod controller;
pub mod detector;

use glam::Vec3;

use crate::camera::CameraRig;
use crate::config::Tuning;
use crate::input::FrameInput;
use crate::physics::SurfaceQuery;

pub use climb::{NullStaminaUi, StaminaUi, WallClimb};
pub use controller::{PlayerController, TickOutput};
pub use detector::{DetectorEvent, PlatformDetector};

/// Capsule-stand-in body: an AABB centered on `position`.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    /// World-space center.
    pub position: Vec3,
    /// Box half extents; the default fits a 1.8m character.
    pub half_extents: Vec3,
    /// Facing angle in radians (0 looks toward -Z).
    pub yaw: f32,
}

impl Body {
    /// Default character half extents.
    pub const DEFAULT_HALF_EXTENTS: Vec3 = Vec3::new(0.4, 0.9, 0.4);

    /// Create a body at the given center with default extents.
    pub fn new(position: Vec3) -> Self {
        Self { position, half_extents: Self::DEFAULT_HALF_EXTENTS, yaw: 0.0 }
    }

    /// Horizontal facing direction.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Horizontal right direction, perpendicular to [`forward`](Self::forward).
    pub fn right(&self) -> Vec3 {
        let f = self.forward();
        Vec3::new(-f.z, 0.0, f.x)
    }

    /// Bottom-center point used by the ground probes.
    pub fn foot_anchor(&self) -> Vec3 {
        self.position - Vec3::Y * self.half_extents.y
    }
}

/// The assembled player.
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub controller: PlayerController,
    pub climb: WallClimb,
    pub detector: PlatformDetector,
    /// Cleared while dead/respawning; an inactive player ignores ticks.
    active: bool,
}

impl Player {
    /// Build a player at the spawn point from a tuning table.
    pub fn new(tuning: &Tuning, spawn: Vec3) -> Self {
        let controller = PlayerController::new(
            tuning.movement,
            tuning.jump,
            tuning.wall_jump,
            tuning.dash,
            tuning.detection,
        );
        let detector = PlatformDetector::new(tuning.detection, &controller.movement);
        Self {
            body: Body::new(spawn),
            controller,
            climb: WallClimb::new(tuning.climb),
            detector,
            active: true,
        }
    }

    /// Whether the player is simulated.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activate or deactivate the player (death/respawn sequencing).
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Run one simulation tick. While climbing, the climb subsystem owns
    /// the body and the movement controller is skipped entirely; the
    /// detector probes run either way.
    pub fn tick<W: SurfaceQuery>(
        &mut self,
        dt: f32,
        input: FrameInput,
        camera: &mut CameraRig,
        world: &W,
        ui: &mut dyn StaminaUi,
    ) -> Vec<DetectorEvent> {
        let mut events = Vec::new();
        if !self.active {
            return events;
        }

        if self.climb.is_climbing() {
            self.climb.climb_update(
                dt,
                input,
                &mut self.controller,
                &mut self.body,
                camera,
                world,
                ui,
            );
        } else {
            self.climb.passive_update(
                dt,
                &mut self.controller,
                &mut self.body,
                camera,
                world,
                ui,
            );
            // An attach this tick consumes the tick; the controller resumes
            // next tick if the climb ends.
            if !self.climb.is_climbing() {
                let output = self.controller.tick(dt, input, &mut self.body, world, camera);
                self.detector.handle_contacts(&output, &mut self.controller, world, &mut events);
            }
        }

        self.detector.tick(&self.body, &mut self.controller, world, &mut events);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{StaticWorld, SurfaceEffect, layers};

    const DT: f32 = 0.016;

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

    #[test]
    fn test_inactive_player_is_inert() {
        let world = floor_world();
        let mut player = Player::new(&Tuning::default(), Vec3::new(0.0, 5.0, 0.0));
        let mut camera = CameraRig::new(0.0);
        player.set_active(false);

        let start = player.body.position;
        let events =
            player.tick(DT, FrameInput::axes(0.0, 1.0), &mut camera, &world, &mut NullStaminaUi);
        assert!(events.is_empty());
        assert_eq!(player.body.position, start);
    }

    #[test]
    fn test_falls_and_lands_on_floor() {
        let world = floor_world();
        let mut player = Player::new(&Tuning::default(), Vec3::new(0.0, 5.0, 0.0));
        let mut camera = CameraRig::new(0.0);

        for _ in 0..120 {
            player.tick(DT, FrameInput::neutral(), &mut camera, &world, &mut NullStaminaUi);
        }
        assert!(player.controller.is_grounded());
        assert!((player.body.position.y - 0.901).abs() < 0.01);
    }

    #[test]
    fn test_dash_into_wall_starts_a_climb() {
        let mut world = floor_world();
        world.add_surface(
            Vec3::new(3.0, 0.0, -3.0),
            Vec3::new(4.0, 8.0, 3.0),
            layers::WALL,
            SurfaceEffect::None,
        );
        let mut player = Player::new(&Tuning::default(), Vec3::new(0.0, 3.0, 0.0));
        let mut camera = CameraRig::new(std::f32::consts::FRAC_PI_2); // camera forward = +X
        let mut ui = NullStaminaUi;

        let mut dash = FrameInput::axes(0.0, 1.0);
        dash.dash_pressed = true;
        player.tick(DT, dash, &mut camera, &world, &mut ui);
        assert!(player.controller.is_dashing());

        let mut attached = false;
        for _ in 0..30 {
            player.tick(DT, FrameInput::axes(0.0, 1.0), &mut camera, &world, &mut ui);
            if player.climb.is_climbing() {
                attached = true;
                break;
            }
        }
        assert!(attached, "dash toward the wall should end in an attach");
        // Facing the wall: snapped just short of the x=3 face.
        assert!((player.body.position.x - (3.0 - 0.55)).abs() < 0.05);
    }

    #[test]
    fn test_climbing_preempts_controller_gravity() {
        let mut world = StaticWorld::new();
        let wall = world.add_surface(
            Vec3::new(1.0, 0.0, -3.0),
            Vec3::new(2.0, 8.0, 3.0),
            layers::WALL,
            SurfaceEffect::None,
        );
        let mut player = Player::new(&Tuning::default(), Vec3::new(0.45, 4.0, 0.0));
        let mut camera = CameraRig::new(0.0);
        let mut ui = NullStaminaUi;

        // Force an attach through the public path: dash at the wall.
        let mut dash = FrameInput::axes(1.0, 0.0); // camera right = +X
        dash.dash_pressed = true;
        player.tick(DT, dash, &mut camera, &world, &mut ui);
        for _ in 0..10 {
            if player.climb.is_climbing() {
                break;
            }
            player.tick(DT, FrameInput::axes(1.0, 0.0), &mut camera, &world, &mut ui);
        }
        assert!(player.climb.is_climbing());
        let _ = wall;

        // Hanging still: no gravity while the climb owns the body.
        let y = player.body.position.y;
        for _ in 0..30 {
            player.tick(DT, FrameInput::neutral(), &mut camera, &world, &mut ui);
        }
        assert!((player.body.position.y - y).abs() < 1e-4);
        assert!(player.climb.is_climbing());
    }
}
