//! Surface detector
//!
//! Watches what the player lands on and stands in: triggers falling
//! platforms, binds/unbinds the ice acceleration swap, and probes for death
//! zones and checkpoints. Outward-facing happenings are returned as
//! [`DetectorEvent`] values for the embedding loop; the detector never calls
//! back into level or session code.

use glam::Vec3;

use crate::config::{DetectionTuning, MovementTuning};
use crate::physics::{SurfaceEffect, SurfaceId, SurfaceQuery, layers};

use super::Body;
use super::controller::{PlayerController, TickOutput};

/// A sweep counts as landing on a surface when the normalized move
/// direction points down at least this much.
const LANDING_MOVE_DIR_Y: f32 = -0.3;

/// Something the embedding game loop needs to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorEvent {
    /// The player landed on a falling platform; start its sequence.
    FallTriggered(SurfaceId),
    /// The player entered a checkpoint volume for the first time.
    CheckpointReached(SurfaceId),
    /// The player picked up a collectible.
    Collected(SurfaceId),
    /// The player touched a death zone.
    Died,
}

/// Landing/standing surface watcher with the ice modifier binding.
#[derive(Debug, Clone)]
pub struct PlatformDetector {
    cfg: DetectionTuning,

    // Ice binding: at most one, replaced never stacked. Originals are
    // captured once at construction so restore is exact.
    current_ice: Option<SurfaceId>,
    orig_acceleration: f32,
    orig_deceleration: f32,
    orig_air_acceleration: f32,

    /// Latched on death-zone contact until the respawn clears it.
    dead: bool,
    reported_checkpoints: Vec<SurfaceId>,
    reported_collectibles: Vec<SurfaceId>,
}

impl PlatformDetector {
    /// Create a detector, capturing the controller's original acceleration
    /// profile for ice restore.
    pub fn new(cfg: DetectionTuning, movement: &MovementTuning) -> Self {
        Self {
            cfg,
            current_ice: None,
            orig_acceleration: movement.acceleration,
            orig_deceleration: movement.deceleration,
            orig_air_acceleration: movement.air_acceleration,
            dead: false,
            reported_checkpoints: Vec::new(),
            reported_collectibles: Vec::new(),
        }
    }

    /// Classify the surfaces a controller tick landed on.
    pub fn handle_contacts<W: SurfaceQuery>(
        &mut self,
        output: &TickOutput,
        controller: &mut PlayerController,
        world: &W,
        events: &mut Vec<DetectorEvent>,
    ) {
        if output.move_dir.y >= LANDING_MOVE_DIR_Y {
            return; // moving sideways or up: not a landing
        }
        for contact in &output.contacts {
            match world.effect(contact.surface) {
                SurfaceEffect::Falling => {
                    events.push(DetectorEvent::FallTriggered(contact.surface));
                }
                SurfaceEffect::Icy(params) => {
                    if self.current_ice != Some(contact.surface) {
                        self.restore_movement(controller);
                        controller.movement.acceleration = params.acceleration;
                        controller.movement.deceleration = params.deceleration;
                        controller.movement.air_acceleration = params.air_acceleration;
                        self.current_ice = Some(contact.surface);
                        log::debug!("ice binding to surface {}", contact.surface.raw());
                    }
                }
                _ => {}
            }
        }
    }

    /// Per-tick probes: ice re-validation, death zones, checkpoints.
    pub fn tick<W: SurfaceQuery>(
        &mut self,
        body: &Body,
        controller: &mut PlayerController,
        world: &W,
        events: &mut Vec<DetectorEvent>,
    ) {
        self.revalidate_ice(body, controller, world);

        if !self.dead
            && !world
                .overlap_sphere(body.position, self.cfg.probe_radius, layers::DEATH)
                .is_empty()
        {
            self.dead = true;
            events.push(DetectorEvent::Died);
            log::info!("player touched a death zone");
        }

        for id in world.overlap_sphere(body.position, self.cfg.probe_radius, layers::CHECKPOINT) {
            if !self.reported_checkpoints.contains(&id) {
                self.reported_checkpoints.push(id);
                events.push(DetectorEvent::CheckpointReached(id));
            }
        }

        for id in world.overlap_sphere(body.position, self.cfg.probe_radius, layers::COLLECTIBLE) {
            if !self.reported_collectibles.contains(&id) {
                self.reported_collectibles.push(id);
                events.push(DetectorEvent::Collected(id));
                log::info!("collectible {} picked up", id.raw());
            }
        }
    }

    /// The ice binding survives becoming airborne, but a short downward ray
    /// must keep confirming the bound surface is still what's underneath.
    fn revalidate_ice<W: SurfaceQuery>(
        &mut self,
        body: &Body,
        controller: &mut PlayerController,
        world: &W,
    ) {
        let Some(ice) = self.current_ice else { return };
        let below =
            world.raycast(body.position, Vec3::NEG_Y, self.cfg.ice_probe_distance, layers::ALL);
        let still_on_ice = below.is_some_and(|hit| hit.surface == ice);
        if !still_on_ice {
            self.restore_movement(controller);
            self.current_ice = None;
            log::debug!("ice binding released");
        }
    }

    fn restore_movement(&self, controller: &mut PlayerController) {
        controller.movement.acceleration = self.orig_acceleration;
        controller.movement.deceleration = self.orig_deceleration;
        controller.movement.air_acceleration = self.orig_air_acceleration;
    }

    /// The surface currently driving the ice binding, if any.
    pub fn current_ice(&self) -> Option<SurfaceId> {
        self.current_ice
    }

    /// Whether the death latch is set.
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Clear the death latch (respawn contract). Checkpoint and collectible
    /// latches are kept: each only ever fires once per level.
    pub fn reset_dead(&mut self) {
        self.dead = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;
    use crate::physics::{Contact, IceParams, StaticWorld};

    fn setup() -> (PlatformDetector, PlayerController) {
        let t = Tuning::default();
        let controller = PlayerController::new(t.movement, t.jump, t.wall_jump, t.dash, t.detection);
        let detector = PlatformDetector::new(t.detection, &controller.movement);
        (detector, controller)
    }

    fn landing_on(surface: SurfaceId) -> TickOutput {
        TickOutput {
            contacts: vec![Contact { surface, normal: Vec3::Y }],
            move_dir: Vec3::new(0.0, -1.0, 0.0),
        }
    }

    #[test]
    fn test_landing_on_ice_swaps_profile() {
        let mut world = StaticWorld::new();
        let ice = world.add_surface(
            Vec3::new(-5.0, -1.0, -5.0),
            Vec3::new(5.0, 0.0, 5.0),
            layers::GROUND,
            SurfaceEffect::Icy(IceParams::default()),
        );
        let (mut d, mut c) = setup();
        let mut events = Vec::new();

        d.handle_contacts(&landing_on(ice), &mut c, &world, &mut events);
        assert_eq!(d.current_ice(), Some(ice));
        assert_eq!(c.movement.acceleration, 4.0);
        assert_eq!(c.movement.deceleration, 2.0);
        assert_eq!(c.movement.air_acceleration, 6.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_ice_binding_is_exclusive_and_swap_is_exact() {
        let mut world = StaticWorld::new();
        let ice_a = world.add_surface(
            Vec3::new(-5.0, -1.0, -5.0),
            Vec3::new(0.0, 0.0, 5.0),
            layers::GROUND,
            SurfaceEffect::Icy(IceParams::default()),
        );
        let slicker = IceParams { acceleration: 2.0, deceleration: 1.0, air_acceleration: 3.0 };
        let ice_b = world.add_surface(
            Vec3::new(0.0, -1.0, -5.0),
            Vec3::new(5.0, 0.0, 5.0),
            layers::GROUND,
            SurfaceEffect::Icy(slicker),
        );
        let (mut d, mut c) = setup();
        let mut events = Vec::new();

        d.handle_contacts(&landing_on(ice_a), &mut c, &world, &mut events);
        d.handle_contacts(&landing_on(ice_b), &mut c, &world, &mut events);

        // Replaced, not stacked: the second platform's values exactly.
        assert_eq!(d.current_ice(), Some(ice_b));
        assert_eq!(c.movement.acceleration, 2.0);
        assert_eq!(c.movement.deceleration, 1.0);
        assert_eq!(c.movement.air_acceleration, 3.0);
    }

    #[test]
    fn test_ice_revalidation_restores_originals() {
        let mut world = StaticWorld::new();
        let ice = world.add_surface(
            Vec3::new(-5.0, -1.0, -5.0),
            Vec3::new(0.0, 0.0, 5.0),
            layers::GROUND,
            SurfaceEffect::Icy(IceParams::default()),
        );
        let plain = world.add_surface(
            Vec3::new(0.0, -1.0, -5.0),
            Vec3::new(5.0, 0.0, 5.0),
            layers::GROUND,
            SurfaceEffect::None,
        );
        let (mut d, mut c) = setup();
        let mut events = Vec::new();

        d.handle_contacts(&landing_on(ice), &mut c, &world, &mut events);

        // Still above the ice: binding holds.
        let body = Body::new(Vec3::new(-2.0, 0.9, 0.0));
        d.tick(&body, &mut c, &world, &mut events);
        assert_eq!(d.current_ice(), Some(ice));

        // Walked over the plain platform: binding released, originals back.
        let body = Body::new(Vec3::new(2.0, 0.9, 0.0));
        d.tick(&body, &mut c, &world, &mut events);
        assert_eq!(d.current_ice(), None);
        assert_eq!(c.movement.acceleration, 14.0);
        assert_eq!(c.movement.deceleration, 10.0);
        assert_eq!(c.movement.air_acceleration, 5.0);
        let _ = plain;
    }

    #[test]
    fn test_ice_surface_gone_releases_binding() {
        let mut world = StaticWorld::new();
        let ice = world.add_surface(
            Vec3::new(-5.0, -1.0, -5.0),
            Vec3::new(5.0, 0.0, 5.0),
            layers::GROUND,
            SurfaceEffect::Icy(IceParams::default()),
        );
        let (mut d, mut c) = setup();
        let mut events = Vec::new();

        d.handle_contacts(&landing_on(ice), &mut c, &world, &mut events);
        world.set_active(ice, false);

        let body = Body::new(Vec3::new(0.0, 0.9, 0.0));
        d.tick(&body, &mut c, &world, &mut events);
        assert_eq!(d.current_ice(), None);
        assert_eq!(c.movement.acceleration, 14.0);
    }

    #[test]
    fn test_sideways_contact_is_not_a_landing() {
        let mut world = StaticWorld::new();
        let falling = world.add_surface(
            Vec3::new(-5.0, -1.0, -5.0),
            Vec3::new(5.0, 0.0, 5.0),
            layers::GROUND,
            SurfaceEffect::Falling,
        );
        let (mut d, mut c) = setup();
        let mut events = Vec::new();

        let sideways = TickOutput {
            contacts: vec![Contact { surface: falling, normal: Vec3::X }],
            move_dir: Vec3::new(-1.0, 0.0, 0.0),
        };
        d.handle_contacts(&sideways, &mut c, &world, &mut events);
        assert!(events.is_empty());

        d.handle_contacts(&landing_on(falling), &mut c, &world, &mut events);
        assert_eq!(events, vec![DetectorEvent::FallTriggered(falling)]);
    }

    #[test]
    fn test_death_latch_fires_once_until_reset() {
        let mut world = StaticWorld::new();
        world.add_surface(
            Vec3::new(-5.0, -2.0, -5.0),
            Vec3::new(5.0, 0.0, 5.0),
            layers::DEATH,
            SurfaceEffect::DeathZone,
        );
        let (mut d, mut c) = setup();
        let body = Body::new(Vec3::new(0.0, 0.5, 0.0));

        let mut events = Vec::new();
        d.tick(&body, &mut c, &world, &mut events);
        assert_eq!(events, vec![DetectorEvent::Died]);
        assert!(d.is_dead());

        // Latched: still inside, no second report.
        let mut events = Vec::new();
        d.tick(&body, &mut c, &world, &mut events);
        assert!(events.is_empty());

        d.reset_dead();
        let mut events = Vec::new();
        d.tick(&body, &mut c, &world, &mut events);
        assert_eq!(events, vec![DetectorEvent::Died]);
    }

    #[test]
    fn test_checkpoint_reported_once() {
        let mut world = StaticWorld::new();
        let checkpoint = world.add_surface(
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 3.0, 1.0),
            layers::CHECKPOINT,
            SurfaceEffect::Checkpoint { spawn_offset: Vec3::ZERO },
        );
        let (mut d, mut c) = setup();
        let body = Body::new(Vec3::new(0.0, 1.0, 0.0));

        let mut events = Vec::new();
        d.tick(&body, &mut c, &world, &mut events);
        assert_eq!(events, vec![DetectorEvent::CheckpointReached(checkpoint)]);

        let mut events = Vec::new();
        d.tick(&body, &mut c, &world, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_collectible_reported_once_even_across_respawn() {
        let mut world = StaticWorld::new();
        let pickup = world.add_surface(
            Vec3::new(-0.5, 0.5, -0.5),
            Vec3::new(0.5, 1.5, 0.5),
            layers::COLLECTIBLE,
            SurfaceEffect::Collectible,
        );
        let (mut d, mut c) = setup();
        let body = Body::new(Vec3::new(0.0, 1.0, 0.0));

        let mut events = Vec::new();
        d.tick(&body, &mut c, &world, &mut events);
        assert_eq!(events, vec![DetectorEvent::Collected(pickup)]);

        // The pickup latch survives a death reset.
        d.reset_dead();
        let mut events = Vec::new();
        d.tick(&body, &mut c, &world, &mut events);
        assert!(events.is_empty());
    }
}
