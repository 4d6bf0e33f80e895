//! Game session
//!
//! Lives, checkpoints, and the death/respawn/game-over sequencing. The
//! session owns no world state of its own beyond the counters; it drives
//! the [`Player`] and [`Level`] it is handed each tick.
//!
//! The respawn contract is strict: deactivate → (one tick) → reset
//! platforms and cycle → teleport → reset controller and climb → reactivate
//! → clear the death latch. The one-tick gap lets every other system
//! observe the deactivated player before the world snaps back.

use glam::Vec3;

use crate::config::GameTuning;
use crate::level::Level;
use crate::player::{DetectorEvent, Player};

/// Session-level happenings for the embedding loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The player was respawned at the current checkpoint.
    Respawned,
    /// Lives ran out; the level should be reloaded.
    LevelReset,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Playing,
    /// Death acknowledged; the respawn executes next tick.
    PendingReset,
    GameOverDelay { elapsed: f32 },
}

/// Lives and respawn state machine.
#[derive(Debug, Clone)]
pub struct GameSession {
    cfg: GameTuning,
    lives: u32,
    game_over: bool,
    /// Latched from the first death report until the respawn completes, so
    /// overlapping death sources cost one life.
    dying: bool,
    initial_spawn: Vec3,
    checkpoint: Vec3,
    phase: Phase,
}

impl GameSession {
    /// Start a session with full lives; the checkpoint starts at the
    /// spawn point.
    pub fn new(cfg: GameTuning, spawn: Vec3) -> Self {
        Self {
            cfg,
            lives: cfg.max_lives,
            game_over: false,
            dying: false,
            initial_spawn: spawn,
            checkpoint: spawn,
            phase: Phase::Playing,
        }
    }

    /// Remaining lives.
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Whether the last life was just lost.
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Current respawn position.
    pub fn checkpoint(&self) -> Vec3 {
        self.checkpoint
    }

    /// Move the respawn position (checkpoint activation).
    pub fn set_checkpoint(&mut self, pos: Vec3) {
        self.checkpoint = pos;
        log::info!("checkpoint saved at {pos}");
    }

    /// Report a player death. Costs one life, deactivates the player, and
    /// schedules either a respawn or the game-over delay. Re-entrant calls
    /// while already dying are ignored.
    pub fn player_died(&mut self, player: &mut Player) {
        if self.dying {
            return;
        }
        self.dying = true;
        self.lives = self.lives.saturating_sub(1);
        player.set_active(false);

        if self.lives == 0 {
            self.game_over = true;
            self.phase = Phase::GameOverDelay { elapsed: 0.0 };
            log::info!("game over");
        } else {
            self.phase = Phase::PendingReset;
            log::info!("player died, {} lives left", self.lives);
        }
    }

    /// Advance the sequencing machine.
    pub fn tick(&mut self, dt: f32, player: &mut Player, level: &mut Level) -> Option<SessionEvent> {
        match self.phase {
            Phase::Playing => None,
            Phase::PendingReset => {
                self.respawn(player, level, self.checkpoint);
                Some(SessionEvent::Respawned)
            }
            Phase::GameOverDelay { elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed >= self.cfg.game_over_delay {
                    // Fresh run: full lives, spawn-point respawn. The
                    // embedding loop reloads the level on this signal.
                    self.lives = self.cfg.max_lives;
                    self.game_over = false;
                    self.checkpoint = self.initial_spawn;
                    self.respawn(player, level, self.initial_spawn);
                    log::info!("level reset");
                    Some(SessionEvent::LevelReset)
                } else {
                    self.phase = Phase::GameOverDelay { elapsed };
                    None
                }
            }
        }
    }

    fn respawn(&mut self, player: &mut Player, level: &mut Level, at: Vec3) {
        level.reset_platforms();
        player.body.position = at;
        player.controller.reset();
        player.climb.reset();
        player.set_active(true);
        player.detector.reset_dead();
        self.dying = false;
        self.phase = Phase::Playing;
        log::info!("respawned at {at}");
    }

    /// Dispatch a tick's detector events onto the level and this session.
    pub fn apply(&mut self, events: &[DetectorEvent], player: &mut Player, level: &mut Level) {
        for event in events {
            match *event {
                DetectorEvent::FallTriggered(id) => level.trigger_fall(id),
                DetectorEvent::CheckpointReached(id) => {
                    if let Some(spawn) = level.activate_checkpoint(id) {
                        self.set_checkpoint(spawn);
                    }
                }
                DetectorEvent::Collected(id) => level.collect(id),
                DetectorEvent::Died => self.player_died(player),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;
    use crate::physics::{StaticWorld, SurfaceEffect, SurfaceQuery, layers};

    const DT: f32 = 0.016;

    fn setup() -> (GameSession, Player, Level) {
        let tuning = Tuning::default();
        let mut world = StaticWorld::new();
        world.add_surface(
            Vec3::new(-50.0, -1.0, -50.0),
            Vec3::new(50.0, 0.0, 50.0),
            layers::GROUND,
            SurfaceEffect::None,
        );
        world.add_surface(
            Vec3::new(5.0, 0.0, -2.0),
            Vec3::new(9.0, 0.5, 2.0),
            layers::GROUND,
            SurfaceEffect::Falling,
        );
        world.add_surface(
            Vec3::new(12.0, 1.0, -0.5),
            Vec3::new(13.0, 2.0, 0.5),
            layers::COLLECTIBLE,
            SurfaceEffect::Collectible,
        );
        let level = Level::new(world, tuning.falling, tuning.beep);
        let spawn = Vec3::new(0.0, 0.901, 0.0);
        let session = GameSession::new(tuning.game, spawn);
        let player = Player::new(&tuning, spawn);
        (session, player, level)
    }

    #[test]
    fn test_death_costs_one_life_and_deactivates() {
        let (mut session, mut player, _) = setup();
        session.player_died(&mut player);
        assert_eq!(session.lives(), 2);
        assert!(!player.is_active());
        assert!(!session.is_game_over());
    }

    #[test]
    fn test_dying_latch_absorbs_duplicate_reports() {
        let (mut session, mut player, _) = setup();
        session.player_died(&mut player);
        session.player_died(&mut player);
        assert_eq!(session.lives(), 2, "overlapping death sources cost one life");
    }

    #[test]
    fn test_respawn_restores_player_and_platforms() {
        let (mut session, mut player, mut level) = setup();
        let falling = level.world.surfaces_where(|e| matches!(e, SurfaceEffect::Falling))[0];

        level.trigger_fall(falling);
        for _ in 0..300 {
            level.tick(DT);
        }
        assert!(!level.world.is_active(falling));

        session.set_checkpoint(Vec3::new(7.0, 1.4, 0.0));
        player.controller.set_velocity(Vec3::new(9.0, -3.0, 0.0));
        session.player_died(&mut player);
        assert!(!player.is_active());

        // The respawn happens one tick later.
        let event = session.tick(DT, &mut player, &mut level);
        assert_eq!(event, Some(SessionEvent::Respawned));
        assert!(player.is_active());
        assert_eq!(player.body.position, Vec3::new(7.0, 1.4, 0.0));
        assert_eq!(player.controller.velocity(), Vec3::ZERO);
        assert!(!player.detector.is_dead());
        assert!(level.world.is_active(falling), "platforms re-armed");

        // Back to playing: further ticks are quiet.
        assert_eq!(session.tick(DT, &mut player, &mut level), None);
    }

    #[test]
    fn test_game_over_emits_level_reset_exactly_once() {
        let (mut session, mut player, mut level) = setup();
        session.player_died(&mut player);
        let _ = session.tick(DT, &mut player, &mut level);
        session.player_died(&mut player);
        let _ = session.tick(DT, &mut player, &mut level);
        session.player_died(&mut player);
        assert!(session.is_game_over());
        assert_eq!(session.lives(), 0);

        // Nothing until the delay elapses (2s at 16ms = 125 ticks).
        let mut resets = 0;
        for _ in 0..124 {
            if session.tick(DT, &mut player, &mut level) == Some(SessionEvent::LevelReset) {
                resets += 1;
            }
        }
        assert_eq!(resets, 0);

        for _ in 0..10 {
            if session.tick(DT, &mut player, &mut level) == Some(SessionEvent::LevelReset) {
                resets += 1;
            }
        }
        assert_eq!(resets, 1, "the reset signal fires exactly once");
        assert_eq!(session.lives(), 3);
        assert!(!session.is_game_over());
        assert!(player.is_active());
    }

    #[test]
    fn test_apply_routes_events() {
        let (mut session, mut player, mut level) = setup();
        let falling = level.world.surfaces_where(|e| matches!(e, SurfaceEffect::Falling))[0];

        session.apply(&[DetectorEvent::FallTriggered(falling)], &mut player, &mut level);
        // Platform is now shaking: offset becomes non-zero as time passes.
        level.tick(0.5);
        assert!(level.world.bounds(falling).unwrap().0 != Vec3::new(5.0, 0.0, -2.0));

        let pickup = level.world.surfaces_where(|e| matches!(e, SurfaceEffect::Collectible))[0];
        session.apply(&[DetectorEvent::Collected(pickup)], &mut player, &mut level);
        assert_eq!(level.collected_count(), 1);
        assert!(!level.world.is_active(pickup));

        session.apply(&[DetectorEvent::Died], &mut player, &mut level);
        assert_eq!(session.lives(), 2);
    }
}
