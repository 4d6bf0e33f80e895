//! Input Module
//!
//! Platform-agnostic input handling for the locomotion core. Key state is
//! tracked with generic key codes (decoupled from any windowing system);
//! [`InputTracker`] turns held-key state into the per-tick [`FrameInput`]
//! the simulation consumes, detecting press/release edges across ticks.

pub mod keyboard;

pub use keyboard::{ControlKeys, FrameInput, InputTracker, KeyCode};
