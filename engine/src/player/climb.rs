//! Wall climbing
//!
//! Celeste-style wall climbing against wall-layer surfaces: attach while
//! airborne (the post-dash grace window keeps a fast dash-to-wall viable),
//! climb on stamina, wrap around corners, vault over the top, or leap off.
//!
//! While climbing, this subsystem replaces the movement controller for the
//! tick — the controller's velocity is only written at the exits (vault,
//! leap-off, stamina exhaustion) so momentum hand-back is explicit.

use glam::Vec3;

use crate::camera::{CameraRig, lerp_angle, yaw_facing};
use crate::config::ClimbTuning;
use crate::input::FrameInput;
use crate::physics::{SurfaceId, SurfaceQuery, layers};

use super::Body;
use super::controller::PlayerController;

/// Slack over the snap distance before an edge forces a transition or exit.
const EDGE_SLACK: f32 = 0.6;
/// How far past the body the lateral corner probe reaches, over snap.
const SIDE_PROBE_SLACK: f32 = 0.4;
/// Gap at the side probe that counts as "walked off the surface", over snap.
const CORNER_GAP_SLACK: f32 = 0.35;
/// Horizontal travel allowance while climbing sideways, over snap.
const LATERAL_SLACK: f32 = 0.5;
/// Center offset and radius of the corner-wrap replacement search.
const CORNER_SEARCH_OFFSET: f32 = 0.9;
const CORNER_SEARCH_RADIUS: f32 = 1.2;
/// Replacement walls whose normal is this close to the current one are the
/// same face, not a corner.
const PARALLEL_NORMAL_DOT: f32 = 0.95;
/// Re-orientation rate while climbing (fraction per second).
const REORIENT_SPEED: f32 = 20.0;
/// Clearance above the wall top after a vault, in meters.
const VAULT_CLEARANCE: f32 = 0.05;

fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Fire-and-forget stamina display. The climb subsystem never reads back.
pub trait StaminaUi {
    /// Current stamina as a fraction of the maximum.
    fn set_normalized(&mut self, fraction: f32);
    /// Make the display visible (climb started).
    fn show(&mut self);
    /// Hide the display (climb ended).
    fn hide(&mut self);
}

/// A stamina display that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStaminaUi;

impl StaminaUi for NullStaminaUi {
    fn set_normalized(&mut self, _fraction: f32) {}
    fn show(&mut self) {}
    fn hide(&mut self) {}
}

/// Wall-climb state machine.
#[derive(Debug, Clone)]
pub struct WallClimb {
    cfg: ClimbTuning,
    climbing: bool,
    /// Weak handle: a lookup miss means the wall is gone and the climb
    /// exits, never panics.
    attached: Option<SurfaceId>,
    wall_normal: Vec3,
    wall_right: Vec3,
    stamina: f32,
    grace_timer: f32,
}

impl WallClimb {
    /// Create a detached climber with full stamina.
    pub fn new(cfg: ClimbTuning) -> Self {
        Self {
            cfg,
            climbing: false,
            attached: None,
            wall_normal: Vec3::ZERO,
            wall_right: Vec3::ZERO,
            stamina: cfg.max_stamina,
            grace_timer: 0.0,
        }
    }

    /// Whether a climb is in progress.
    pub fn is_climbing(&self) -> bool {
        self.climbing
    }

    /// Remaining stamina.
    pub fn stamina(&self) -> f32 {
        self.stamina
    }

    /// Outward normal of the attached wall (zero when detached).
    pub fn wall_normal(&self) -> Vec3 {
        self.wall_normal
    }

    /// Detached upkeep: dash grace window, attach attempts, recharge.
    pub fn passive_update<W: SurfaceQuery>(
        &mut self,
        dt: f32,
        controller: &mut PlayerController,
        body: &mut Body,
        camera: &mut CameraRig,
        world: &W,
        ui: &mut dyn StaminaUi,
    ) {
        if self.climbing {
            return;
        }
        if controller.is_dashing() {
            self.grace_timer = self.cfg.grace_time;
        } else if self.grace_timer > 0.0 {
            self.grace_timer -= dt;
        }

        self.try_attach(controller, body, camera, world, ui);
        self.recharge(dt, controller, ui);
    }

    /// One tick of climbing. Replaces the movement controller while
    /// [`is_climbing`](Self::is_climbing) holds.
    pub fn climb_update<W: SurfaceQuery>(
        &mut self,
        dt: f32,
        input: FrameInput,
        controller: &mut PlayerController,
        body: &mut Body,
        camera: &mut CameraRig,
        world: &W,
        ui: &mut dyn StaminaUi,
    ) {
        if input.jump_pressed {
            self.leap_off(controller, ui);
            return;
        }

        self.drain(dt, controller, ui);
        if !self.climbing {
            return; // stamina ran out this tick
        }

        camera.steer(dt, self.cfg.camera_wrap_speed);

        // Wall still there?
        let Some(wall) = self.attached else {
            self.exit_climb(controller, ui);
            return;
        };
        if world.closest_point(wall, body.position).is_none() {
            self.exit_climb(controller, ui);
            return;
        }

        // Climbed down to the ground.
        let below = body.position - Vec3::Y * (body.half_extents.y + 0.1);
        if !world.overlap_sphere(below, 0.2, layers::GROUND).is_empty() {
            self.exit_climb(controller, ui);
            return;
        }

        self.check_edges_and_wrap(input.horizontal, body, camera, world, controller, ui);
        if !self.climbing {
            return;
        }
        let Some(wall) = self.attached else {
            return;
        };

        self.snap_to_wall(body, world);
        body.yaw = lerp_angle(body.yaw, yaw_facing(-self.wall_normal), (REORIENT_SPEED * dt).min(1.0));

        // Vertical movement, with a vault when the head clears the top.
        if input.vertical.abs() > 0.1 {
            if input.vertical > 0.0 {
                let head_y = body.position.y + body.half_extents.y;
                if let Some((_, max)) = world.bounds(wall) {
                    if head_y + self.cfg.climb_speed * dt >= max.y {
                        self.vault(controller, body, world, ui);
                        return;
                    }
                }
            }
            body.position.y += input.vertical * self.cfg.climb_speed * dt;
        }

        // Horizontal movement, gated so the body can't slide off into air.
        if input.horizontal.abs() > 0.1 {
            let new_pos =
                body.position + self.wall_right * input.horizontal * self.cfg.climb_speed * dt;
            if let Some(cp) = world.closest_point(wall, new_pos) {
                let mut diff = cp - new_pos;
                diff.y = 0.0;
                if diff.length() <= self.cfg.snap_distance + LATERAL_SLACK {
                    body.position = new_pos;
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Stamina
    // ------------------------------------------------------------------

    fn drain(&mut self, dt: f32, controller: &mut PlayerController, ui: &mut dyn StaminaUi) {
        self.stamina = move_towards(self.stamina, 0.0, self.cfg.drain_rate * dt);
        ui.set_normalized(self.stamina / self.cfg.max_stamina);
        if self.stamina <= 0.0 {
            self.exit_climb(controller, ui);
        }
    }

    fn recharge(&mut self, dt: f32, controller: &PlayerController, ui: &mut dyn StaminaUi) {
        if !controller.is_grounded() {
            return;
        }
        self.stamina =
            move_towards(self.stamina, self.cfg.max_stamina, self.cfg.recharge_rate * dt);
        ui.set_normalized(self.stamina / self.cfg.max_stamina);
    }

    // ------------------------------------------------------------------
    // Attach
    // ------------------------------------------------------------------

    fn try_attach<W: SurfaceQuery>(
        &mut self,
        controller: &mut PlayerController,
        body: &mut Body,
        camera: &mut CameraRig,
        world: &W,
        ui: &mut dyn StaminaUi,
    ) {
        // Only a dash (or its grace window) can start a climb.
        if self.grace_timer <= 0.0 && !controller.is_dashing() {
            return;
        }
        if controller.is_grounded() || self.stamina <= 0.0 {
            return;
        }

        let candidates = world.overlap_sphere(body.position, self.cfg.attach_radius, layers::WALL);
        let mut best: Option<(SurfaceId, Vec3)> = None;
        let mut best_dist = f32::MAX;
        for id in candidates {
            let Some(cp) = world.closest_point(id, body.position) else { continue };
            let d = cp.distance(body.position);
            if d < best_dist {
                best_dist = d;
                best = Some((id, cp));
            }
        }
        let Some((wall, cp)) = best else { return };

        let mut to_surf = cp - body.position;
        to_surf.y = 0.0;
        if to_surf.length_squared() < 0.001 {
            return; // inside the surface or directly above it
        }

        self.attach(wall, -to_surf.normalize(), controller, body, camera, world, ui);
    }

    fn attach<W: SurfaceQuery>(
        &mut self,
        wall: SurfaceId,
        normal: Vec3,
        controller: &mut PlayerController,
        body: &mut Body,
        camera: &mut CameraRig,
        world: &W,
        ui: &mut dyn StaminaUi,
    ) {
        self.attached = Some(wall);
        self.set_axes(normal);
        self.snap_to_wall(body, world);
        body.yaw = yaw_facing(-self.wall_normal);
        self.climbing = true;
        // The attach consumes both the dash and its grace window; without
        // this a vault or leap would re-attach on the very next tick.
        controller.cancel_dash();
        self.grace_timer = 0.0;
        controller.refill_dash();
        camera.begin_handoff(yaw_facing(-self.wall_normal));
        ui.show();
        log::debug!("climb attach to surface {}", wall.raw());
    }

    fn set_axes(&mut self, normal: Vec3) {
        self.wall_normal = normal;
        self.wall_right = normal.cross(Vec3::Y).normalize();
    }

    /// Keep the body at the snap distance from the wall, horizontally.
    fn snap_to_wall<W: SurfaceQuery>(&self, body: &mut Body, world: &W) {
        let Some(wall) = self.attached else { return };
        let Some(cp) = world.closest_point(wall, body.position) else { return };
        let mut to_surf = cp - body.position;
        to_surf.y = 0.0;
        if to_surf.length_squared() < 0.001 {
            return;
        }
        let diff = to_surf.length() - self.cfg.snap_distance;
        if diff.abs() > 0.01 {
            body.position += to_surf.normalize() * diff;
        }
    }

    // ------------------------------------------------------------------
    // Edges and corners
    // ------------------------------------------------------------------

    fn check_edges_and_wrap<W: SurfaceQuery>(
        &mut self,
        input_h: f32,
        body: &mut Body,
        camera: &mut CameraRig,
        world: &W,
        controller: &mut PlayerController,
        ui: &mut dyn StaminaUi,
    ) {
        let Some(wall) = self.attached else { return };
        let Some(cp) = world.closest_point(wall, body.position) else { return };

        // Drifted too far off the surface: grab a replacement or let go.
        let mut to_wall = cp - body.position;
        to_wall.y = 0.0;
        if to_wall.length() > self.cfg.snap_distance + EDGE_SLACK {
            if !self.transition_to_nearby_wall(body, camera, world) {
                self.exit_climb(controller, ui);
            }
            return;
        }

        // Moving sideways past the surface bound: look around the corner.
        if input_h.abs() > 0.1 {
            let side_dir = self.wall_right * input_h.signum();
            let probe = body.position + side_dir * (self.cfg.snap_distance + SIDE_PROBE_SLACK);
            if let Some(cp_side) = world.closest_point(wall, probe) {
                let mut side_diff = cp_side - probe;
                side_diff.y = 0.0;
                if side_diff.length() > self.cfg.snap_distance + CORNER_GAP_SLACK {
                    self.transition_around_corner(side_dir, body, camera, world);
                }
            }
        }
    }

    fn transition_around_corner<W: SurfaceQuery>(
        &mut self,
        corner_dir: Vec3,
        body: &mut Body,
        camera: &mut CameraRig,
        world: &W,
    ) -> bool {
        let center = body.position + corner_dir * CORNER_SEARCH_OFFSET;
        let nearby = world.overlap_sphere(center, CORNER_SEARCH_RADIUS, layers::WALL);

        let mut best: Option<SurfaceId> = None;
        let mut best_score = f32::MAX;
        for id in nearby {
            if Some(id) == self.attached {
                continue;
            }
            let Some(cp) = world.closest_point(id, body.position) else { continue };
            let mut to_surf = cp - body.position;
            to_surf.y = 0.0;
            if to_surf.length_squared() < 0.001 {
                continue;
            }
            let norm = -to_surf.normalize();
            // A near-parallel normal is the same face, not a corner.
            if norm.dot(self.wall_normal) > PARALLEL_NORMAL_DOT {
                continue;
            }
            let score = to_surf.length();
            if score < best_score {
                best_score = score;
                best = Some(id);
            }
        }
        let Some(next) = best else { return false };

        self.switch_wall(next, body, camera, world);
        true
    }

    fn transition_to_nearby_wall<W: SurfaceQuery>(
        &mut self,
        body: &mut Body,
        camera: &mut CameraRig,
        world: &W,
    ) -> bool {
        let nearby = world.overlap_sphere(body.position, CORNER_SEARCH_RADIUS, layers::WALL);
        for id in nearby {
            if Some(id) == self.attached {
                continue;
            }
            let Some(cp) = world.closest_point(id, body.position) else { continue };
            let mut to_surf = cp - body.position;
            to_surf.y = 0.0;
            if to_surf.length_squared() < 0.001 {
                continue;
            }
            self.switch_wall(id, body, camera, world);
            return true;
        }
        false
    }

    fn switch_wall<W: SurfaceQuery>(
        &mut self,
        next: SurfaceId,
        body: &mut Body,
        camera: &mut CameraRig,
        world: &W,
    ) {
        let Some(cp) = world.closest_point(next, body.position) else { return };
        let mut to_surf = cp - body.position;
        to_surf.y = 0.0;
        self.attached = Some(next);
        self.set_axes(-to_surf.normalize());
        self.snap_to_wall(body, world);
        body.yaw = yaw_facing(-self.wall_normal);
        camera.begin_handoff(yaw_facing(-self.wall_normal));
        log::debug!("climb wrap to surface {}", next.raw());
    }

    // ------------------------------------------------------------------
    // Exits
    // ------------------------------------------------------------------

    fn vault<W: SurfaceQuery>(
        &mut self,
        controller: &mut PlayerController,
        body: &mut Body,
        world: &W,
        ui: &mut dyn StaminaUi,
    ) {
        let Some(wall) = self.attached else { return };
        if let Some((_, max)) = world.bounds(wall) {
            body.position.y = max.y + body.half_extents.y + VAULT_CLEARANCE;
        }
        let normal = self.wall_normal;
        self.attached = None;
        self.climbing = false;
        controller.set_velocity(
            -normal * self.cfg.vault_forward_force + Vec3::Y * self.cfg.vault_up_force,
        );
        ui.hide();
        log::debug!("vault over wall top");
    }

    fn exit_climb(&mut self, controller: &mut PlayerController, ui: &mut dyn StaminaUi) {
        self.climbing = false;
        self.attached = None;
        controller.set_velocity(Vec3::ZERO);
        ui.hide();
    }

    fn leap_off(&mut self, controller: &mut PlayerController, ui: &mut dyn StaminaUi) {
        let leap =
            self.wall_normal * self.cfg.leap_out_force + Vec3::Y * self.cfg.leap_up_force;
        self.climbing = false;
        self.attached = None;
        controller.set_velocity(leap);
        ui.hide();
    }

    /// Full stamina and detached state for a respawn.
    pub fn reset(&mut self) {
        self.climbing = false;
        self.attached = None;
        self.wall_normal = Vec3::ZERO;
        self.wall_right = Vec3::ZERO;
        self.stamina = self.cfg.max_stamina;
        self.grace_timer = 0.0;
    }
}
