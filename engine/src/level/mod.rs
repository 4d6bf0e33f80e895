//! Level mechanics
//!
//! [`Level`] owns the static world plus the stateful mechanics layered on
//! top of it: falling platforms, the A/B beep cycle, and checkpoint
//! activation latches. Each tick it projects mechanic state onto the world
//! (platform offsets, beep solidity) so the locomotion core only ever sees
//! plain surfaces through the query interface.
//!
//! Nothing here is a global: the level is an owned value passed by
//! reference, created on level load and dropped on unload.

pub mod beep;
pub mod falling;

use glam::Vec3;

use crate::config::{BeepTuning, FallingTuning};
use crate::physics::{StaticWorld, SurfaceEffect, SurfaceId, SurfaceQuery};

pub use beep::{BeepCycle, BeepSide};
pub use falling::FallingPlatform;

/// A level: static world + mechanics state.
#[derive(Debug, Clone)]
pub struct Level {
    /// The surface-query substrate. Public so the embedding loop can run
    /// its own queries (cameras, AI, debug overlays).
    pub world: StaticWorld,
    falling: Vec<(SurfaceId, FallingPlatform)>,
    beep_surfaces: Vec<(SurfaceId, BeepSide)>,
    cycle: BeepCycle,
    activated_checkpoints: Vec<SurfaceId>,
    collected: Vec<SurfaceId>,
}

impl Level {
    /// Wrap a built world, binding mechanic state to every surface whose
    /// effect calls for it.
    pub fn new(world: StaticWorld, falling_cfg: FallingTuning, beep_cfg: BeepTuning) -> Self {
        let falling = world
            .surfaces_where(|e| matches!(e, SurfaceEffect::Falling))
            .into_iter()
            .map(|id| (id, FallingPlatform::new(falling_cfg)))
            .collect();
        let beep_surfaces = world
            .surfaces_where(|e| matches!(e, SurfaceEffect::Beep(_)))
            .into_iter()
            .filter_map(|id| match world.effect(id) {
                SurfaceEffect::Beep(side) => Some((id, side)),
                _ => None,
            })
            .collect();
        Self {
            world,
            falling,
            beep_surfaces,
            cycle: BeepCycle::new(beep_cfg),
            activated_checkpoints: Vec::new(),
            collected: Vec::new(),
        }
    }

    /// Advance mechanics and project their state onto the world.
    pub fn tick(&mut self, dt: f32) {
        self.cycle.tick(dt);
        for (id, side) in &self.beep_surfaces {
            self.world.set_active(*id, self.cycle.is_solid(*side));
        }
        for (id, platform) in &mut self.falling {
            platform.tick(dt);
            self.world.set_offset(*id, platform.offset());
            if platform.is_gone() {
                self.world.set_active(*id, false);
            }
        }
    }

    /// Read access to the beep cycle (blocks and renderers consume it
    /// read-only).
    pub fn beep_cycle(&self) -> &BeepCycle {
        &self.cycle
    }

    /// Start the fall sequence of a platform. No-op for non-falling
    /// surfaces or platforms already triggered.
    pub fn trigger_fall(&mut self, surface: SurfaceId) {
        if let Some((_, platform)) = self.falling.iter_mut().find(|(id, _)| *id == surface) {
            platform.trigger();
        }
    }

    /// Activate a checkpoint; returns the respawn position on first
    /// activation, `None` if already active or not a checkpoint.
    pub fn activate_checkpoint(&mut self, surface: SurfaceId) -> Option<Vec3> {
        if self.activated_checkpoints.contains(&surface) {
            return None;
        }
        let SurfaceEffect::Checkpoint { spawn_offset } = self.world.effect(surface) else {
            return None;
        };
        let (min, max) = self.world.bounds(surface)?;
        self.activated_checkpoints.push(surface);
        let spawn = (min + max) * 0.5 + spawn_offset;
        log::info!("checkpoint activated, respawn set to {spawn}");
        Some(spawn)
    }

    /// Whether a checkpoint has been activated.
    pub fn is_checkpoint_active(&self, surface: SurfaceId) -> bool {
        self.activated_checkpoints.contains(&surface)
    }

    /// Pick up a collectible: deactivate the surface and latch it as
    /// collected. No-op for non-collectible surfaces or ones already taken.
    pub fn collect(&mut self, surface: SurfaceId) {
        if self.collected.contains(&surface) {
            return;
        }
        if !matches!(self.world.effect(surface), SurfaceEffect::Collectible) {
            return;
        }
        self.collected.push(surface);
        self.world.set_active(surface, false);
        log::info!("collectible {} taken ({} total)", surface.raw(), self.collected.len());
    }

    /// How many collectibles have been picked up.
    pub fn collected_count(&self) -> usize {
        self.collected.len()
    }

    /// Whether a collectible has been picked up.
    pub fn is_collected(&self, surface: SurfaceId) -> bool {
        self.collected.contains(&surface)
    }

    /// Respawn contract: re-arm all falling platforms and restart the beep
    /// cycle. Checkpoint and collectible latches survive a respawn (only a
    /// full level reload clears them).
    pub fn reset_platforms(&mut self) {
        for (id, platform) in &mut self.falling {
            platform.reset();
            self.world.set_offset(*id, Vec3::ZERO);
            self.world.set_active(*id, true);
        }
        self.cycle.reset();
        for (id, side) in &self.beep_surfaces {
            self.world.set_active(*id, *side == BeepSide::A);
        }
    }
}
