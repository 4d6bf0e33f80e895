//! Tuning configuration
//!
//! Every gameplay constant in the crate lives in one of the serde-derived
//! structs below, so levels can ship tuned JSON instead of recompiling.
//! Defaults carry the shipped tuning. All values are SI (meters, seconds,
//! m/s, m/s²) except where noted.

use std::path::Path;

use serde::{Deserialize, Serialize};

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Errors that can occur while loading or saving a tuning file.
#[derive(Debug)]
pub enum ConfigError {
    /// Standard I/O error.
    IoError(std::io::Error),
    /// JSON serialization/deserialization error.
    JsonError(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::JsonError(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::JsonError(e)
    }
}

// ============================================================================
// TUNING STRUCTS
// ============================================================================

/// Ground and air movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Target ground speed in m/s.
    pub move_speed: f32,
    /// How fast you reach move speed on ground (m/s²).
    pub acceleration: f32,
    /// How fast you slow down on ground (m/s²).
    pub deceleration: f32,
    /// Much weaker in air — momentum preserved (m/s²).
    pub air_acceleration: f32,
    /// Very weak air drag — momentum bleeds slowly (m/s²).
    pub air_deceleration: f32,
    /// Facing interpolation rate (fraction per second).
    pub rotation_speed: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            move_speed: 8.0,
            acceleration: 14.0,
            deceleration: 10.0,
            air_acceleration: 5.0,
            air_deceleration: 2.0,
            rotation_speed: 15.0,
        }
    }
}

/// Jump arc, gravity, and jump grace windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpTuning {
    /// Apex height of a plain standing jump, in meters.
    pub jump_height: f32,
    /// Gravity in m/s², negative (pulls down).
    pub gravity: f32,
    /// Gravity multiplier while descending.
    pub fall_multiplier: f32,
    /// Upward velocity multiplier applied on jump release (short hop).
    pub jump_cut_multiplier: f32,
    /// Grace window after leaving ground during which a jump still counts
    /// as a ground jump, in seconds.
    pub coyote_time: f32,
    /// Grace window before landing during which a jump press is remembered,
    /// in seconds.
    pub jump_buffer_time: f32,
    /// Terminal fall speed in m/s (positive).
    pub max_fall_speed: f32,
    /// How much horizontal speed adds to jump height.
    /// 0 = no bonus, 1 = full transfer.
    pub horizontal_to_jump_bonus: f32,
    /// Max extra upward velocity that horizontal speed can add, in m/s.
    pub max_jump_bonus: f32,
}

impl Default for JumpTuning {
    fn default() -> Self {
        Self {
            jump_height: 3.5,
            gravity: -30.0,
            fall_multiplier: 2.5,
            jump_cut_multiplier: 0.4,
            coyote_time: 0.12,
            jump_buffer_time: 0.12,
            max_fall_speed: 40.0,
            horizontal_to_jump_bonus: 0.08,
            max_jump_bonus: 4.0,
        }
    }
}

/// Wall slide and wall jump.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallJumpTuning {
    /// Max downward speed while wall-sliding, in m/s (positive).
    pub wall_slide_speed: f32,
    /// Vertical velocity set by a wall jump, in m/s.
    pub up_force: f32,
    /// Minimum outgoing horizontal speed of a wall jump, in m/s.
    pub out_force: f32,
    /// How long horizontal movement input is suspended after a wall jump,
    /// in seconds.
    pub lock_time: f32,
    /// Wall probe raycast length from the body center, in meters.
    pub wall_check_distance: f32,
}

impl Default for WallJumpTuning {
    fn default() -> Self {
        Self {
            wall_slide_speed: 1.5,
            up_force: 12.0,
            out_force: 10.0,
            lock_time: 0.2,
            wall_check_distance: 0.6,
        }
    }
}

/// Dash.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashTuning {
    /// Dash speed in m/s.
    pub speed: f32,
    /// Dash duration in seconds.
    pub duration: f32,
    /// Cooldown between dashes in seconds.
    pub cooldown: f32,
    /// Dash charges restored on grounding.
    pub max_dashes: u32,
}

impl Default for DashTuning {
    fn default() -> Self {
        Self {
            speed: 22.0,
            duration: 0.18,
            cooldown: 0.25,
            max_dashes: 1,
        }
    }
}

/// Wall climbing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimbTuning {
    /// Climb movement speed in m/s.
    pub climb_speed: f32,
    /// Target perpendicular offset maintained between the body and the
    /// climbed surface, in meters.
    pub snap_distance: f32,
    /// Stamina pool.
    pub max_stamina: f32,
    /// Stamina drained per second while climbing.
    pub drain_rate: f32,
    /// Stamina recovered per second while grounded.
    pub recharge_rate: f32,
    /// Upward velocity imparted by a vault, in m/s.
    pub vault_up_force: f32,
    /// Forward (over the wall) velocity imparted by a vault, in m/s.
    pub vault_forward_force: f32,
    /// Upward velocity imparted by a leap-off, in m/s.
    pub leap_up_force: f32,
    /// Outward velocity imparted by a leap-off, in m/s.
    pub leap_out_force: f32,
    /// Radius of the attach overlap query, in meters.
    pub attach_radius: f32,
    /// Camera yaw hand-off steering rate (fraction per second).
    pub camera_wrap_speed: f32,
    /// Post-dash window during which a wall attach is still permitted,
    /// in seconds.
    pub grace_time: f32,
}

impl Default for ClimbTuning {
    fn default() -> Self {
        Self {
            climb_speed: 5.0,
            snap_distance: 0.55,
            max_stamina: 1.0,
            drain_rate: 0.15,
            recharge_rate: 0.8,
            vault_up_force: 10.0,
            vault_forward_force: 5.0,
            leap_up_force: 13.0,
            leap_out_force: 10.0,
            attach_radius: 1.1,
            camera_wrap_speed: 5.0,
            grace_time: 0.15,
        }
    }
}

/// Probe geometry for the surface detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionTuning {
    /// Radius of the foot-anchor ground overlap, in meters.
    pub ground_check_radius: f32,
    /// Radius of the wall-base ground probe, in meters.
    pub wall_ground_check_radius: f32,
    /// Radius of the death-zone / checkpoint overlap probes, in meters.
    pub probe_radius: f32,
    /// Length of the downward ice re-validation raycast, in meters.
    pub ice_probe_distance: f32,
}

impl Default for DetectionTuning {
    fn default() -> Self {
        Self {
            ground_check_radius: 0.25,
            wall_ground_check_radius: 0.25,
            probe_radius: 1.0,
            ice_probe_distance: 1.2,
        }
    }
}

/// A/B beep block cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeepTuning {
    /// How long each side stays active, in seconds (same for A and B).
    pub period: f32,
    /// How many seconds before the swap the warning starts.
    pub warning_window: f32,
    /// Flicker frequency at the start of the warning (slow), in Hz.
    pub flicker_freq_start: f32,
    /// Flicker frequency at the end of the warning (fast), in Hz.
    pub flicker_freq_end: f32,
    /// Minimum alpha during flicker (0 = fully transparent dips).
    pub flicker_min_alpha: f32,
}

impl Default for BeepTuning {
    fn default() -> Self {
        Self {
            period: 3.0,
            warning_window: 1.0,
            flicker_freq_start: 3.0,
            flicker_freq_end: 18.0,
            flicker_min_alpha: 0.15,
        }
    }
}

/// Falling platform timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallingTuning {
    /// How long the platform shakes before dropping, in seconds.
    pub shake_delay: f32,
    /// Shake amplitude in meters.
    pub shake_intensity: f32,
    /// Shake oscillation rate in rad/s.
    pub shake_speed: f32,
    /// Drop speed in m/s.
    pub fall_speed: f32,
    /// Distance fallen before the platform disappears, in meters.
    pub fall_distance: f32,
}

impl Default for FallingTuning {
    fn default() -> Self {
        Self {
            shake_delay: 1.2,
            shake_intensity: 0.05,
            shake_speed: 40.0,
            fall_speed: 12.0,
            fall_distance: 30.0,
        }
    }
}

/// Lives and game-over flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    /// Lives at level start (and after a full reset).
    pub max_lives: u32,
    /// Delay between losing the last life and the level-reset signal,
    /// in seconds.
    pub game_over_delay: f32,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            max_lives: 3,
            game_over_delay: 2.0,
        }
    }
}

/// Aggregate of every tuning table in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub movement: MovementTuning,
    pub jump: JumpTuning,
    pub wall_jump: WallJumpTuning,
    pub dash: DashTuning,
    pub climb: ClimbTuning,
    pub detection: DetectionTuning,
    pub beep: BeepTuning,
    pub falling: FallingTuning,
    pub game: GameTuning,
}

impl Tuning {
    /// Parse a tuning table from a JSON string. Missing fields fall back
    /// to defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a tuning table from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Write the tuning table to a JSON file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
