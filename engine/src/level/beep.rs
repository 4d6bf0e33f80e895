//! A/B beep block cycle
//!
//! A two-phase oscillator: blocks of the active side are solid, the other
//! side is passable, and sides swap every period. Near the swap a warning
//! window opens; the warning-progress fraction drives the flicker math
//! front-ends use for rendering.

use serde::{Deserialize, Serialize};

use crate::config::BeepTuning;

/// Which side of the A/B cycle a block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeepSide {
    A,
    B,
}

/// The cycle driver. One per level; blocks read it, never write it.
#[derive(Debug, Clone, Copy)]
pub struct BeepCycle {
    cfg: BeepTuning,
    elapsed: f32,
    a_active: bool,
}

impl BeepCycle {
    /// Create a cycle starting on side A with zero elapsed time.
    pub fn new(cfg: BeepTuning) -> Self {
        Self { cfg, elapsed: 0.0, a_active: true }
    }

    /// Advance the cycle. Flips the active side exactly once per period.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        if self.elapsed >= self.cfg.period {
            self.elapsed = 0.0;
            self.a_active = !self.a_active;
        }
    }

    /// Restart on side A with zero elapsed time (respawn contract).
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.a_active = true;
    }

    /// The currently solid side.
    pub fn active_side(&self) -> BeepSide {
        if self.a_active { BeepSide::A } else { BeepSide::B }
    }

    /// Whether a block of the given side is currently solid.
    pub fn is_solid(&self, side: BeepSide) -> bool {
        side == self.active_side()
    }

    /// Progress within the current period, 0 → 1.
    pub fn cycle_progress(&self) -> f32 {
        self.elapsed / self.cfg.period
    }

    /// True when the remaining time is within the warning window.
    pub fn in_warning(&self) -> bool {
        self.cfg.period - self.elapsed <= self.cfg.warning_window
    }

    /// 0 at warning start, 1 at the swap; 0 outside the warning window.
    pub fn warning_progress(&self) -> f32 {
        let remaining = self.cfg.period - self.elapsed;
        if remaining <= self.cfg.warning_window {
            1.0 - remaining / self.cfg.warning_window
        } else {
            0.0
        }
    }

    /// Flicker frequency at the given warning progress: interpolates from
    /// the slow start frequency to the fast end frequency.
    pub fn flicker_frequency(&self, warning_progress: f32) -> f32 {
        let t = warning_progress.clamp(0.0, 1.0);
        self.cfg.flicker_freq_start + (self.cfg.flicker_freq_end - self.cfg.flicker_freq_start) * t
    }

    /// Flicker alpha for an active block at wall-clock `time`.
    ///
    /// Barely flickers at warning start; dips toward the configured
    /// minimum alpha as the swap approaches. Returns 1.0 outside the
    /// warning window.
    pub fn flicker_alpha(&self, time: f32) -> f32 {
        if !self.in_warning() {
            return 1.0;
        }
        let wp = self.warning_progress();
        let freq = self.flicker_frequency(wp);
        let sine = ((time * freq).sin() + 1.0) * 0.5;
        let min_alpha = 0.85 + (self.cfg.flicker_min_alpha - 0.85) * wp;
        min_alpha + (1.0 - min_alpha) * sine
    }
}
