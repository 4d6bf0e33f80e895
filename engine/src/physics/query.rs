//! Surface query interface
//!
//! The locomotion core never talks to a concrete physics engine; it talks to
//! [`SurfaceQuery`]. Surfaces are referenced by opaque [`SurfaceId`] handles
//! and a handle may stop resolving at any time (platform fell away, beep
//! block went passable) — callers treat a lookup miss as "surface gone",
//! never as a bug.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::level::beep::BeepSide;

/// Opaque handle to a surface. Stable for the lifetime of the level; may
/// stop resolving when the surface deactivates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub(crate) u32);

impl SurfaceId {
    /// Raw index, for logging.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Collision layer bits. Queries take a mask; a surface matches when the
/// bitwise AND is non-zero.
pub mod layers {
    /// Walkable / slideable solid geometry.
    pub const GROUND: u32 = 1 << 0;
    /// Climbable walls.
    pub const WALL: u32 = 1 << 1;
    /// Kill volumes (non-solid).
    pub const DEATH: u32 = 1 << 2;
    /// Checkpoint trigger volumes (non-solid).
    pub const CHECKPOINT: u32 = 1 << 3;
    /// Collectible pickup volumes (non-solid).
    pub const COLLECTIBLE: u32 = 1 << 4;

    /// Everything.
    pub const ALL: u32 = u32::MAX;
    /// Layers the body collides with.
    pub const SOLID: u32 = GROUND | WALL;
}

/// Replacement ground acceleration profile while standing on ice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IceParams {
    /// Ground acceleration on ice (m/s²).
    pub acceleration: f32,
    /// Ground deceleration on ice (m/s²).
    pub deceleration: f32,
    /// Air acceleration while the ice binding is live (m/s²).
    pub air_acceleration: f32,
}

impl Default for IceParams {
    fn default() -> Self {
        Self {
            acceleration: 4.0,
            deceleration: 2.0,
            air_acceleration: 6.0,
        }
    }
}

/// Gameplay behavior attached to a surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum SurfaceEffect {
    /// Plain geometry.
    #[default]
    None,
    /// Shakes and drops after being stepped on.
    Falling,
    /// Swaps the player's acceleration profile while stood on.
    Icy(IceParams),
    /// Latches a respawn point on contact.
    Checkpoint {
        /// Respawn position relative to the surface bounds center.
        spawn_offset: Vec3,
    },
    /// Kills on contact.
    DeathZone,
    /// Solid only while its side of the A/B cycle is active.
    Beep(BeepSide),
    /// Picked up on contact, once per level.
    Collectible,
}

/// A raycast hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// World-space hit position.
    pub point: Vec3,
    /// Outward surface normal at the hit (axis-aligned, normalized).
    pub normal: Vec3,
    /// Distance from the ray origin.
    pub distance: f32,
    /// The surface that was hit.
    pub surface: SurfaceId,
}

/// A surface the body touched during a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// The touched surface.
    pub surface: SurfaceId,
    /// Outward normal of the touched face.
    pub normal: Vec3,
}

/// Result of a collide-and-slide sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    /// Final body center after the sweep.
    pub position: Vec3,
    /// Surfaces touched while resolving the motion.
    pub contacts: Vec<Contact>,
}

/// Everything the locomotion core asks of the world.
///
/// Inactive surfaces are invisible to every method except [`effect`](Self::effect).
pub trait SurfaceQuery {
    /// Surfaces whose bounds intersect the sphere (inclusive on the face).
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: u32) -> Vec<SurfaceId>;

    /// Closest hit along the ray, or `None` within `max_distance`.
    /// `dir` must be normalized.
    fn raycast(&self, origin: Vec3, dir: Vec3, max_distance: f32, mask: u32) -> Option<Hit>;

    /// Closest point on the surface's bounds to `point`. `None` if the
    /// surface is gone.
    fn closest_point(&self, surface: SurfaceId, point: Vec3) -> Option<Vec3>;

    /// Current world-space bounds (home + offset). `None` if the surface is
    /// gone.
    fn bounds(&self, surface: SurfaceId) -> Option<(Vec3, Vec3)>;

    /// The surface's gameplay effect. Resolves even for inactive surfaces
    /// so detectors can classify what they just lost contact with.
    fn effect(&self, surface: SurfaceId) -> SurfaceEffect;

    /// Move an AABB body through the world, clamping against matching
    /// surfaces axis by axis. Returns the resolved center and the faces
    /// touched on the way.
    fn sweep_move(&self, center: Vec3, half_extents: Vec3, motion: Vec3, mask: u32)
    -> SweepResult;
}
