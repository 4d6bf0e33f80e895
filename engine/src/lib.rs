//! Cliffside Core Library
//!
//! A frame-stepped 3D platformer locomotion and interaction core:
//! momentum-based movement with coyote time and jump buffering, wall
//! slide/jump with an alternation rule, dashing, stamina-driven wall
//! climbing, and the level mechanics that interact with them (timed beep
//! blocks, falling platforms, ice surfaces, checkpoints, collectibles,
//! death zones) plus a lives/respawn session machine.
//!
//! The crate is window-system and renderer agnostic. The embedding game
//! loop feeds it per-tick [`input::FrameInput`]s and a camera yaw, steps
//! [`player::Player`], [`level::Level`], and [`game::GameSession`], and
//! reacts to the event values they return.
//!
//! # Modules
//!
//! - [`physics`] - Surface query interface and the AABB static world
//! - [`input`] - Platform-agnostic key state and per-tick input edges
//! - [`camera`] - Yaw-only camera rig with the climb hand-off contract
//! - [`config`] - Serde-backed tuning tables with JSON load/save
//! - [`player`] - Movement controller, wall climb, surface detector
//! - [`level`] - Beep cycle, falling platforms, checkpoints, collectibles
//! - [`game`] - Lives, death, respawn and game-over sequencing
//!
//! # Example
//!
//! ```ignore
//! use cliffside_core::camera::CameraRig;
//! use cliffside_core::config::Tuning;
//! use cliffside_core::game::GameSession;
//! use cliffside_core::input::{ControlKeys, InputTracker};
//! use cliffside_core::level::Level;
//! use cliffside_core::player::{NullStaminaUi, Player};
//! use glam::Vec3;
//!
//! let tuning = Tuning::default();
//! let mut level = Level::new(build_world(), tuning.falling, tuning.beep);
//! let mut player = Player::new(&tuning, Vec3::new(0.0, 1.0, 0.0));
//! let mut session = GameSession::new(tuning.game, Vec3::new(0.0, 1.0, 0.0));
//! let mut camera = CameraRig::new(0.0);
//! let mut keys = ControlKeys::new();
//! let mut tracker = InputTracker::new();
//! let mut ui = NullStaminaUi;
//!
//! // Per tick:
//! let input = tracker.sample(&keys);
//! level.tick(dt);
//! let events = player.tick(dt, input, &mut camera, &level.world, &mut ui);
//! session.apply(&events, &mut player, &mut level);
//! session.tick(dt, &mut player, &mut level);
//! ```

pub mod camera;
pub mod config;
pub mod game;
pub mod input;
pub mod level;
pub mod physics;
pub mod player;

pub use camera::CameraRig;
pub use config::Tuning;
pub use game::{GameSession, SessionEvent};
pub use input::FrameInput;
pub use level::Level;
pub use physics::{StaticWorld, SurfaceId, SurfaceQuery};
pub use player::{DetectorEvent, Player};
