//! Falling platforms
//!
//! A platform that shakes for a delay after being stepped on, then drops
//! until it has fallen far enough to disappear. The original timed sequence
//! is a phase + elapsed state machine advanced by [`FallingPlatform::tick`];
//! cancellation (player death) is a plain [`FallingPlatform::reset`].

use glam::Vec3;

use crate::config::FallingTuning;

/// Where the platform is in its shake-then-fall sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FallPhase {
    /// Waiting to be stepped on.
    Armed,
    /// Shaking in place before the drop.
    Shaking { elapsed: f32 },
    /// Dropping straight down.
    Falling { fallen: f32 },
    /// Fell far enough; the surface is deactivated.
    Gone,
}

/// State machine for one falling platform.
#[derive(Debug, Clone, Copy)]
pub struct FallingPlatform {
    cfg: FallingTuning,
    phase: FallPhase,
}

impl FallingPlatform {
    /// Create an armed platform.
    pub fn new(cfg: FallingTuning) -> Self {
        Self { cfg, phase: FallPhase::Armed }
    }

    /// Start the shake-then-fall sequence. Idempotent — calling again while
    /// already triggered is a no-op.
    pub fn trigger(&mut self) {
        if matches!(self.phase, FallPhase::Armed) {
            self.phase = FallPhase::Shaking { elapsed: 0.0 };
        }
    }

    /// Advance the sequence.
    pub fn tick(&mut self, dt: f32) {
        match self.phase {
            FallPhase::Armed | FallPhase::Gone => {}
            FallPhase::Shaking { elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed >= self.cfg.shake_delay {
                    self.phase = FallPhase::Falling { fallen: 0.0 };
                } else {
                    self.phase = FallPhase::Shaking { elapsed };
                }
            }
            FallPhase::Falling { fallen } => {
                let fallen = fallen + self.cfg.fall_speed * dt;
                if fallen >= self.cfg.fall_distance {
                    self.phase = FallPhase::Gone;
                } else {
                    self.phase = FallPhase::Falling { fallen };
                }
            }
        }
    }

    /// Offset from the platform's home position this tick.
    pub fn offset(&self) -> Vec3 {
        match self.phase {
            FallPhase::Armed => Vec3::ZERO,
            FallPhase::Shaking { elapsed } => Vec3::new(
                (elapsed * self.cfg.shake_speed).sin() * self.cfg.shake_intensity,
                0.0,
                (elapsed * self.cfg.shake_speed * 0.7).sin() * self.cfg.shake_intensity,
            ),
            FallPhase::Falling { fallen } => Vec3::new(0.0, -fallen, 0.0),
            FallPhase::Gone => Vec3::new(0.0, -self.cfg.fall_distance, 0.0),
        }
    }

    /// Whether the sequence has started.
    pub fn is_triggered(&self) -> bool {
        !matches!(self.phase, FallPhase::Armed)
    }

    /// Whether the platform has fallen away entirely.
    pub fn is_gone(&self) -> bool {
        matches!(self.phase, FallPhase::Gone)
    }

    /// Return to home position and re-arm (player respawn contract).
    pub fn reset(&mut self) {
        self.phase = FallPhase::Armed;
    }
}
