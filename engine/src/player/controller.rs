//! Player movement controller
//!
//! Owns the full 3D velocity and integrates it every tick: momentum-based
//! ground/air movement, jumping with coyote time and input buffering, wall
//! slide and alternating wall jumps, and a dash with charges and cooldown.
//!
//! The controller is deliberately ignorant of rendering and windowing: it
//! consumes a [`FrameInput`], a [`CameraRig`] basis, and a [`SurfaceQuery`]
//! world, and moves a [`Body`].
//!
//! # Tick order
//!
//! Input → ground/wall classification → timers → wall slide → jump → ground
//! or air movement → gravity → sweep move → facing. Each stage reads the
//! state the previous stages left; reordering changes behavior (e.g. the
//! coyote timer must refresh before the jump resolution consumes it).

use glam::Vec3;

use crate::camera::{CameraRig, lerp_angle, yaw_facing};
use crate::config::{DashTuning, DetectionTuning, JumpTuning, MovementTuning, WallJumpTuning};
use crate::input::FrameInput;
use crate::physics::{Contact, SurfaceQuery, layers};

use super::Body;

/// Minimum delta time to prevent division issues (seconds).
const MIN_DELTA_TIME: f32 = 0.0001;
/// Maximum delta time to prevent physics glitches on lag spikes (seconds).
const MAX_DELTA_TIME: f32 = 0.1;

/// Downward velocity held while grounded so the body stays pressed onto
/// slopes and moving platforms (m/s).
const GROUNDED_STICK_VELOCITY: f32 = -2.0;
/// A surface counts as a wall when its normal's vertical component is
/// below this.
const WALL_NORMAL_MAX_UP: f32 = 0.3;
/// Wall normals with a dot product at or above this count as the same wall
/// for the alternation rule (~25 degrees apart).
const SAME_WALL_DOT: f32 = 0.9;
/// Fraction of pre-jump horizontal speed redirected along a wall jump.
const MOMENTUM_REDIRECT: f32 = 0.6;
/// Vertical component mixed into the dash direction while jump is held.
const DASH_UP_COMPONENT: f32 = 0.7;
/// Fraction of dash speed the vertical velocity is capped at when an
/// upward dash expires.
const DASH_END_VERTICAL_CAP: f32 = 0.4;

/// Step `current` toward `target` by at most `max_delta`.
fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// What one controller tick did to the world, for the surface detector.
#[derive(Debug, Clone)]
pub struct TickOutput {
    /// Surfaces touched by this tick's sweep.
    pub contacts: Vec<Contact>,
    /// Normalized velocity direction at sweep time (zero when stationary).
    pub move_dir: Vec3,
}

/// Momentum-owning movement controller.
#[derive(Debug, Clone)]
pub struct PlayerController {
    /// Ground/air acceleration profile. Public because the ice binding
    /// swaps the acceleration fields in place.
    pub movement: MovementTuning,
    jump: JumpTuning,
    wall_jump: WallJumpTuning,
    dash: DashTuning,
    detection: DetectionTuning,

    // Full 3D velocity — momentum lives here.
    velocity: Vec3,

    grounded: bool,
    touching_wall: bool,
    wall_normal: Vec3,
    wall_sliding: bool,

    // Alternation memory: the player may jump the same wall again only
    // after jumping a different one.
    last_wall_jump_normal: Option<Vec3>,
    has_wall_jump: bool,

    coyote_timer: f32,
    jump_buffer_timer: f32,
    is_jumping: bool,
    jump_held: bool,
    wall_jump_timer: f32,

    dashes_left: u32,
    is_dashing: bool,
    dash_timer: f32,
    dash_cooldown_timer: f32,
    dash_direction: Vec3,

    input_h: f32,
    input_v: f32,
}

impl PlayerController {
    /// Create a controller with the given tuning, at rest.
    pub fn new(
        movement: MovementTuning,
        jump: JumpTuning,
        wall_jump: WallJumpTuning,
        dash: DashTuning,
        detection: DetectionTuning,
    ) -> Self {
        Self {
            movement,
            jump,
            wall_jump,
            dash,
            detection,
            velocity: Vec3::ZERO,
            grounded: false,
            touching_wall: false,
            wall_normal: Vec3::ZERO,
            wall_sliding: false,
            last_wall_jump_normal: None,
            has_wall_jump: true,
            coyote_timer: 0.0,
            jump_buffer_timer: 0.0,
            is_jumping: false,
            jump_held: false,
            wall_jump_timer: 0.0,
            dashes_left: dash.max_dashes,
            is_dashing: false,
            dash_timer: 0.0,
            dash_cooldown_timer: 0.0,
            dash_direction: Vec3::ZERO,
            input_h: 0.0,
            input_v: 0.0,
        }
    }

    /// Run one simulation tick, moving `body` through `world`.
    pub fn tick<W: SurfaceQuery>(
        &mut self,
        dt: f32,
        input: FrameInput,
        body: &mut Body,
        world: &W,
        camera: &CameraRig,
    ) -> TickOutput {
        let dt = dt.clamp(MIN_DELTA_TIME, MAX_DELTA_TIME);

        self.gather_input(input, body, camera);
        self.check_grounded(body, world);
        self.check_wall(body, world);
        self.check_wall_ground(body, world);
        self.update_timers(dt);
        self.handle_wall_slide();
        self.handle_jump();
        self.handle_movement(dt, camera);
        self.apply_gravity(dt);
        let output = self.apply_move(dt, body, world);
        self.rotate_to_facing(dt, body);
        output
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    fn gather_input(&mut self, input: FrameInput, body: &Body, camera: &CameraRig) {
        self.input_h = input.horizontal;
        self.input_v = input.vertical;
        self.jump_held = input.jump_held;

        if input.jump_pressed {
            self.jump_buffer_timer = self.jump.jump_buffer_time;
        }

        // Jump cut: releasing early shortens the arc.
        if input.jump_released && self.velocity.y > 0.0 && self.is_jumping {
            self.velocity.y *= self.jump.jump_cut_multiplier;
        }

        if input.dash_pressed {
            self.try_dash(body, camera);
        }
    }

    // ------------------------------------------------------------------
    // Classification
    // ------------------------------------------------------------------

    fn check_grounded<W: SurfaceQuery>(&mut self, body: &Body, world: &W) {
        self.grounded = !world
            .overlap_sphere(body.foot_anchor(), self.detection.ground_check_radius, layers::GROUND)
            .is_empty();
    }

    fn check_wall<W: SurfaceQuery>(&mut self, body: &Body, world: &W) {
        let dirs = [body.forward(), -body.forward(), body.right(), -body.right()];
        self.touching_wall = false;

        for dir in dirs {
            if let Some(hit) =
                world.raycast(body.position, dir, self.wall_jump.wall_check_distance, layers::GROUND)
            {
                if hit.normal.dot(Vec3::Y) < WALL_NORMAL_MAX_UP {
                    self.touching_wall = true;
                    self.wall_normal = hit.normal;
                    break;
                }
            }
        }
    }

    /// Standing on top of wall-layer geometry behaves like ground for the
    /// jump grace windows and clears the alternation memory.
    fn check_wall_ground<W: SurfaceQuery>(&mut self, body: &Body, world: &W) {
        let on_wall_top = !world
            .overlap_sphere(
                body.foot_anchor(),
                self.detection.wall_ground_check_radius,
                layers::WALL,
            )
            .is_empty();
        if on_wall_top {
            self.has_wall_jump = true;
            self.last_wall_jump_normal = None;
            self.coyote_timer = self.jump.coyote_time;
        }
    }

    // ------------------------------------------------------------------
    // Timers
    // ------------------------------------------------------------------

    fn update_timers(&mut self, dt: f32) {
        self.jump_buffer_timer -= dt;
        self.dash_cooldown_timer -= dt;
        if self.wall_jump_timer > 0.0 {
            self.wall_jump_timer -= dt;
        }

        if self.grounded {
            self.coyote_timer = self.jump.coyote_time;
            self.dashes_left = self.dash.max_dashes;
            self.is_jumping = false;
            self.has_wall_jump = true;
            self.last_wall_jump_normal = None;
        } else {
            self.coyote_timer -= dt;
        }

        if self.is_dashing {
            self.dash_timer -= dt;
            if self.dash_timer <= 0.0 {
                self.stop_dash();
            }
        }
    }

    // ------------------------------------------------------------------
    // Wall slide
    // ------------------------------------------------------------------

    fn handle_wall_slide(&mut self) {
        let pushing = self.touching_wall && (self.input_h != 0.0 || self.input_v != 0.0);
        self.wall_sliding = pushing && !self.grounded && self.velocity.y < 0.0;

        if self.wall_sliding {
            self.velocity.y = self.velocity.y.max(-self.wall_jump.wall_slide_speed);
        }
    }

    // ------------------------------------------------------------------
    // Jump
    // ------------------------------------------------------------------

    fn handle_jump(&mut self) {
        if self.jump_buffer_timer <= 0.0 {
            return;
        }
        if self.wall_sliding && self.can_wall_jump() {
            self.wall_jump();
        } else if self.coyote_timer > 0.0 {
            self.normal_jump();
        }
    }

    /// Alternation rule: the same wall may be jumped again only after
    /// jumping a different wall (normals more than ~25 degrees apart).
    fn can_wall_jump(&self) -> bool {
        if !self.has_wall_jump {
            return false;
        }
        match self.last_wall_jump_normal {
            None => true,
            Some(last) => self.wall_normal.dot(last) < SAME_WALL_DOT,
        }
    }

    fn normal_jump(&mut self) {
        let base = (self.jump.jump_height * -2.0 * self.jump.gravity).sqrt();

        // Momentum bonus: the faster you run, the slightly higher you jump.
        let h_speed = Vec3::new(self.velocity.x, 0.0, self.velocity.z).length();
        let bonus = (h_speed * self.jump.horizontal_to_jump_bonus).min(self.jump.max_jump_bonus);

        self.velocity.y = base + bonus;
        self.jump_buffer_timer = 0.0;
        self.coyote_timer = 0.0;
        self.is_jumping = true;
    }

    fn wall_jump(&mut self) {
        self.last_wall_jump_normal = Some(self.wall_normal);

        let jump_dir = (self.wall_normal + Vec3::Y).normalize();

        // Redirect existing horizontal momentum instead of snapping to a
        // fixed force.
        let current_speed = Vec3::new(self.velocity.x, 0.0, self.velocity.z).length();
        let out_speed = self.wall_jump.out_force.max(current_speed * MOMENTUM_REDIRECT);

        self.velocity = jump_dir * out_speed;
        self.velocity.y = self.wall_jump.up_force;

        self.jump_buffer_timer = 0.0;
        self.is_jumping = true;
        self.wall_jump_timer = self.wall_jump.lock_time;
        log::debug!("wall jump off normal {}", self.wall_normal);
    }

    // ------------------------------------------------------------------
    // Movement (momentum-based)
    // ------------------------------------------------------------------

    fn handle_movement(&mut self, dt: f32, camera: &CameraRig) {
        // Dash owns the velocity; wall-jump lock suspends input entirely.
        if self.is_dashing || self.wall_jump_timer > 0.0 {
            return;
        }

        let mut input_dir = camera.forward() * self.input_v + camera.right() * self.input_h;
        if input_dir.length_squared() > 1.0 {
            input_dir = input_dir.normalize();
        }
        let has_input = input_dir.length_squared() > 0.0001;

        if self.grounded {
            if has_input {
                let target = input_dir * self.movement.move_speed;
                let step = self.movement.acceleration * dt;
                self.velocity.x = move_towards(self.velocity.x, target.x, step);
                self.velocity.z = move_towards(self.velocity.z, target.z, step);
            } else {
                let step = self.movement.deceleration * dt;
                self.velocity.x = move_towards(self.velocity.x, 0.0, step);
                self.velocity.z = move_towards(self.velocity.z, 0.0, step);
            }
        } else if has_input {
            // Weak nudge; momentum is mostly preserved.
            self.velocity.x += input_dir.x * self.movement.air_acceleration * dt;
            self.velocity.z += input_dir.z * self.movement.air_acceleration * dt;

            // Soft cap: input alone won't push past move speed, but dash or
            // launch momentum decays gradually instead of clamping.
            let h_vel = Vec3::new(self.velocity.x, 0.0, self.velocity.z);
            let h_speed = h_vel.length();
            if h_speed > self.movement.move_speed {
                let excess = h_speed - self.movement.move_speed;
                let capped = h_vel.normalize()
                    * (self.movement.move_speed
                        + excess * (1.0 - self.movement.air_deceleration * dt));
                self.velocity.x = capped.x;
                self.velocity.z = capped.z;
            }
        } else {
            let step = self.movement.air_deceleration * dt;
            self.velocity.x = move_towards(self.velocity.x, 0.0, step);
            self.velocity.z = move_towards(self.velocity.z, 0.0, step);
        }
    }

    // ------------------------------------------------------------------
    // Gravity
    // ------------------------------------------------------------------

    fn apply_gravity(&mut self, dt: f32) {
        if self.is_dashing {
            return;
        }
        if self.grounded && self.velocity.y < 0.0 {
            self.velocity.y = GROUNDED_STICK_VELOCITY;
            return;
        }
        let mult = if self.velocity.y < 0.0 { self.jump.fall_multiplier } else { 1.0 };
        self.velocity.y += self.jump.gravity * mult * dt;
        self.velocity.y = self.velocity.y.max(-self.jump.max_fall_speed);
    }

    // ------------------------------------------------------------------
    // Dash
    // ------------------------------------------------------------------

    fn try_dash(&mut self, body: &Body, camera: &CameraRig) {
        if self.dashes_left == 0 || self.dash_cooldown_timer > 0.0 || self.is_dashing {
            return;
        }

        let mut dir = camera.forward() * self.input_v + camera.right() * self.input_h;
        if dir.length_squared() < 0.01 {
            dir = body.forward();
        }
        dir.y = if self.jump_held { DASH_UP_COMPONENT } else { 0.0 };
        self.dash_direction = dir.normalize();

        self.dashes_left -= 1;
        self.is_dashing = true;
        self.dash_timer = self.dash.duration;
        self.dash_cooldown_timer = self.dash.cooldown;
        self.velocity = self.dash_direction * self.dash.speed;
    }

    fn stop_dash(&mut self) {
        self.is_dashing = false;
        // Momentum carries forward; only the vertical component is capped
        // so an upward dash doesn't float.
        if self.dash_direction.y > 0.0 {
            self.velocity.y = self.velocity.y.min(self.dash.speed * DASH_END_VERTICAL_CAP);
        }
    }

    // ------------------------------------------------------------------
    // Sweep move + facing
    // ------------------------------------------------------------------

    fn apply_move<W: SurfaceQuery>(&mut self, dt: f32, body: &mut Body, world: &W) -> TickOutput {
        let move_dir = self.velocity.normalize_or_zero();
        let result =
            world.sweep_move(body.position, body.half_extents, self.velocity * dt, layers::SOLID);
        body.position = result.position;

        // Kill the velocity component pushing into each touched face.
        for contact in &result.contacts {
            for axis in 0..3 {
                if contact.normal[axis] != 0.0
                    && self.velocity[axis] * contact.normal[axis] < 0.0
                {
                    self.velocity[axis] = 0.0;
                }
            }
        }

        TickOutput { contacts: result.contacts, move_dir }
    }

    fn rotate_to_facing(&mut self, dt: f32, body: &mut Body) {
        let flat = Vec3::new(self.velocity.x, 0.0, self.velocity.z);
        if flat.length_squared() > 0.1 {
            let t = (self.movement.rotation_speed * dt).min(1.0);
            body.yaw = lerp_angle(body.yaw, yaw_facing(flat), t);
        }
    }

    // ------------------------------------------------------------------
    // External surface
    // ------------------------------------------------------------------

    /// Current velocity.
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Overwrite the velocity (climb attach/detach, vault, leap-off).
    pub fn set_velocity(&mut self, v: Vec3) {
        self.velocity = v;
    }

    /// Whether the foot anchor overlaps ground.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Whether the controller is in the wall-slide state.
    pub fn is_wall_sliding(&self) -> bool {
        self.wall_sliding
    }

    /// Whether a dash is in progress.
    pub fn is_dashing(&self) -> bool {
        self.is_dashing
    }

    /// Remaining dash charges.
    pub fn dashes_left(&self) -> u32 {
        self.dashes_left
    }

    /// Restore all dash charges (climb attach reward).
    pub fn refill_dash(&mut self) {
        self.dashes_left = self.dash.max_dashes;
    }

    /// Cancel an in-progress dash without the end-of-dash vertical cap.
    /// The climb attach calls this; controller ticks are skipped while
    /// climbing, so an expired dash would otherwise linger.
    pub fn cancel_dash(&mut self) {
        self.is_dashing = false;
        self.dash_timer = 0.0;
    }

    /// Zero all motion state for a respawn: velocity, timers, flags, and
    /// the wall-jump memory. Tuning (including a live ice swap) is kept.
    pub fn reset(&mut self) {
        self.velocity = Vec3::ZERO;
        self.grounded = false;
        self.touching_wall = false;
        self.wall_normal = Vec3::ZERO;
        self.wall_sliding = false;
        self.last_wall_jump_normal = None;
        self.has_wall_jump = true;
        self.coyote_timer = 0.0;
        self.jump_buffer_timer = 0.0;
        self.is_jumping = false;
        self.jump_held = false;
        self.wall_jump_timer = 0.0;
        self.dashes_left = self.dash.max_dashes;
        self.is_dashing = false;
        self.dash_timer = 0.0;
        self.dash_cooldown_timer = 0.0;
        self.dash_direction = Vec3::ZERO;
        self.input_h = 0.0;
        self.input_v = 0.0;
    }
}
