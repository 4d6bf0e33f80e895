//! Camera rig
//!
//! Window-system agnostic camera state. The locomotion core only depends on
//! the camera for two things: a yaw-only basis (camera-relative forward and
//! right on the XZ plane) used to turn raw input axes into a world-space
//! movement direction, and a steerable yaw target the wall-climb subsystem
//! sets when attaching to or wrapping around a wall. Pitch, position, and
//! smoothing cosmetics live outside this crate.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Hand-off smoothing stops once the yaw is within this angle of the
/// target (~1 degree).
const HANDOFF_EPSILON: f32 = 0.0175;

/// Shortest signed angular difference from `a` to `b`, in radians,
/// wrapped to `[-PI, PI]`.
pub fn delta_angle(a: f32, b: f32) -> f32 {
    let d = (b - a).rem_euclid(TAU);
    if d > PI { d - TAU } else { d }
}

/// Interpolate between angles along the shortest arc. `t` is clamped to
/// `[0, 1]`.
pub fn lerp_angle(a: f32, b: f32, t: f32) -> f32 {
    a + delta_angle(a, b) * t.clamp(0.0, 1.0)
}

/// Yaw that faces the given horizontal direction (yaw 0 looks toward -Z).
pub fn yaw_facing(dir: Vec3) -> f32 {
    dir.x.atan2(-dir.z)
}

/// Yaw-only camera rig.
///
/// Yaw 0 looks toward -Z; positive yaw turns toward +X.
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraRig {
    /// Horizontal angle in radians.
    pub yaw: f32,
    target_yaw: Option<f32>,
}

impl CameraRig {
    /// Create a rig at the given yaw.
    pub fn new(yaw: f32) -> Self {
        Self { yaw, target_yaw: None }
    }

    /// Camera forward projected on the XZ plane (normalized).
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Camera right on the XZ plane, perpendicular to [`forward`](Self::forward).
    pub fn right(&self) -> Vec3 {
        let f = self.forward();
        Vec3::new(-f.z, 0.0, f.x)
    }

    /// Begin steering the yaw toward `target` (radians). Replaces any
    /// pending hand-off.
    pub fn begin_handoff(&mut self, target: f32) {
        self.target_yaw = Some(target);
    }

    /// Whether a hand-off is still in progress.
    pub fn is_steering(&self) -> bool {
        self.target_yaw.is_some()
    }

    /// Advance the pending hand-off, if any, at `speed` (fraction per
    /// second). Clears the target once within ~1 degree.
    pub fn steer(&mut self, dt: f32, speed: f32) {
        if let Some(target) = self.target_yaw {
            self.yaw = lerp_angle(self.yaw, target, speed * dt);
            if delta_angle(self.yaw, target).abs() < HANDOFF_EPSILON {
                self.target_yaw = None;
            }
        }
    }
}
