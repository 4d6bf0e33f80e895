//! Keyboard Input Module
//!
//! Contains keyboard state tracking for movement, jump and dash keys.
//! Decoupled from the windowing system through generic key codes.

/// Generic key codes for the controls this crate cares about, independent
/// of the windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    // Movement keys
    W,
    A,
    S,
    D,

    // Arrow keys (alternate movement)
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    /// Jump
    Space,
    /// Dash
    ShiftLeft,
    ShiftRight,
    /// Dash (alternate)
    X,

    /// Catch-all for unhandled keys
    Unknown,
}

/// Tracks which control keys are currently held down.
///
/// This struct maintains raw held state; edge detection (pressed this
/// tick / released this tick) is done by [`InputTracker`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlKeys {
    /// W / ArrowUp - move away from the camera
    pub forward: bool,
    /// S / ArrowDown - move toward the camera
    pub backward: bool,
    /// A / ArrowLeft - strafe left
    pub left: bool,
    /// D / ArrowRight - strafe right
    pub right: bool,
    /// Space - jump
    pub jump: bool,
    /// Shift / X - dash
    pub dash: bool,
}

impl ControlKeys {
    /// Create a new control state with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update state based on a key press/release.
    ///
    /// Returns `true` if the key was a control key and was handled,
    /// `false` otherwise.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key {
            KeyCode::W | KeyCode::ArrowUp => {
                self.forward = pressed;
                true
            }
            KeyCode::S | KeyCode::ArrowDown => {
                self.backward = pressed;
                true
            }
            KeyCode::A | KeyCode::ArrowLeft => {
                self.left = pressed;
                true
            }
            KeyCode::D | KeyCode::ArrowRight => {
                self.right = pressed;
                true
            }
            KeyCode::Space => {
                self.jump = pressed;
                true
            }
            KeyCode::ShiftLeft | KeyCode::ShiftRight | KeyCode::X => {
                self.dash = pressed;
                true
            }
            _ => false,
        }
    }

    /// Forward/backward movement direction (-1, 0, or 1).
    pub fn forward_axis(&self) -> i32 {
        (self.forward as i32) - (self.backward as i32)
    }

    /// Left/right movement direction (-1, 0, or 1).
    pub fn right_axis(&self) -> i32 {
        (self.right as i32) - (self.left as i32)
    }

    /// Reset all keys to released state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Input for one simulation tick, with edges resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Strafe axis in [-1, 1] (camera-relative right).
    pub horizontal: f32,
    /// Forward axis in [-1, 1] (camera-relative forward).
    pub vertical: f32,
    /// Jump went down this tick.
    pub jump_pressed: bool,
    /// Jump went up this tick.
    pub jump_released: bool,
    /// Jump is currently held.
    pub jump_held: bool,
    /// Dash went down this tick.
    pub dash_pressed: bool,
}

impl FrameInput {
    /// No input at all.
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Movement axes only, no buttons.
    pub fn axes(horizontal: f32, vertical: f32) -> Self {
        Self { horizontal, vertical, ..Self::default() }
    }
}

/// Produces [`FrameInput`]s from successive [`ControlKeys`] snapshots,
/// detecting press and release edges across ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputTracker {
    prev_jump: bool,
    prev_dash: bool,
}

impl InputTracker {
    /// Create a tracker with no keys previously held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample the current key state into a tick input.
    pub fn sample(&mut self, keys: &ControlKeys) -> FrameInput {
        let input = FrameInput {
            horizontal: keys.right_axis() as f32,
            vertical: keys.forward_axis() as f32,
            jump_pressed: keys.jump && !self.prev_jump,
            jump_released: !keys.jump && self.prev_jump,
            jump_held: keys.jump,
            dash_pressed: keys.dash && !self.prev_dash,
        };
        self.prev_jump = keys.jump;
        self.prev_dash = keys.dash;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_from_keys() {
        let mut keys = ControlKeys::new();
        keys.handle_key(KeyCode::W, true);
        keys.handle_key(KeyCode::D, true);
        assert_eq!(keys.forward_axis(), 1);
        assert_eq!(keys.right_axis(), 1);

        keys.handle_key(KeyCode::S, true);
        assert_eq!(keys.forward_axis(), 0);
    }

    #[test]
    fn test_unhandled_key_returns_false() {
        let mut keys = ControlKeys::new();
        assert!(!keys.handle_key(KeyCode::Unknown, true));
        assert!(keys.handle_key(KeyCode::Space, true));
    }

    #[test]
    fn test_jump_edges() {
        let mut keys = ControlKeys::new();
        let mut tracker = InputTracker::new();

        keys.handle_key(KeyCode::Space, true);
        let input = tracker.sample(&keys);
        assert!(input.jump_pressed);
        assert!(input.jump_held);
        assert!(!input.jump_released);

        // Held: no new edge.
        let input = tracker.sample(&keys);
        assert!(!input.jump_pressed);
        assert!(input.jump_held);

        keys.handle_key(KeyCode::Space, false);
        let input = tracker.sample(&keys);
        assert!(input.jump_released);
        assert!(!input.jump_held);
    }

    #[test]
    fn test_dash_edge_fires_once() {
        let mut keys = ControlKeys::new();
        let mut tracker = InputTracker::new();

        keys.handle_key(KeyCode::ShiftLeft, true);
        assert!(tracker.sample(&keys).dash_pressed);
        assert!(!tracker.sample(&keys).dash_pressed);
    }
}
