//! Game state and core simulation types
//!
//! All session state lives in [`GameState`], owned by the frame driver and
//! mutated only through [`crate::sim::advance`] and [`GameState::restart`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Aabb;
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended; frozen until restart
    GameOver,
}

/// The player's paddle
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal movement per update while a key is held
    pub speed: f32,
    /// Invulnerability blink indicator (render skips alternating ticks)
    pub is_blinking: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(0.0, PLAYER_START_Y),
            size: Vec2::splat(PLAYER_SIZE),
            speed: PLAYER_SPEED,
            is_blinking: false,
        }
    }
}

impl Player {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A falling block
#[derive(Debug, Clone)]
pub struct Block {
    pub pos: Vec2,
    pub size: Vec2,
    /// Descent per update (scales with the level it spawned at)
    pub speed: f32,
    /// Rolled 1-3 at spawn. Cosmetic: a single projectile hit destroys the
    /// block regardless.
    pub hit_points: u8,
}

impl Block {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// An upward-moving projectile
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Projectile {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Why a life was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeLostReason {
    /// A block fell past the bottom of the screen
    PassedScreen,
    /// A block collided with the player
    HitPlayer,
}

/// Side effects produced by the simulation, drained by the frame driver
/// (sound cues, HUD refreshes). Fire-and-forget: dropping them never
/// affects simulation correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ProjectileFired,
    BlockDestroyed,
    LevelUp { level: u32 },
    LifeLost { reason: LifeLostReason },
    GameOver,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Simulation clock in milliseconds, advanced by the caller
    pub clock_ms: f64,
    pub score: u32,
    pub lives: u8,
    pub level: u32,
    pub phase: GamePhase,
    pub player: Player,
    pub blocks: Vec<Block>,
    pub projectiles: Vec<Projectile>,
    /// Wall-clock period between block spawns (shrinks with level)
    pub spawn_interval_ms: f64,
    last_spawn_ms: f64,
    /// Expiry of the active invulnerability window, if any. At most one
    /// window is active at a time.
    invulnerable_until_ms: Option<f64>,
    /// Events accumulated by `advance`, drained by the driver
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            clock_ms: 0.0,
            score: 0,
            lives: START_LIVES,
            level: 1,
            phase: GamePhase::Playing,
            player: Player::default(),
            blocks: Vec::new(),
            projectiles: Vec::new(),
            spawn_interval_ms: BASE_SPAWN_INTERVAL_MS,
            last_spawn_ms: 0.0,
            invulnerable_until_ms: None,
            events: Vec::new(),
        }
    }

    /// Reset the session for a fresh run. The RNG stream and clock carry on.
    pub fn restart(&mut self) {
        self.score = 0;
        self.lives = START_LIVES;
        self.level = 1;
        self.phase = GamePhase::Playing;
        self.blocks.clear();
        self.projectiles.clear();
        self.player.pos.x = 0.0;
        self.player.is_blinking = false;
        self.spawn_interval_ms = BASE_SPAWN_INTERVAL_MS;
        self.last_spawn_ms = self.clock_ms;
        self.invulnerable_until_ms = None;
        self.events.clear();
    }

    /// Whether an invulnerability window is currently active
    pub fn is_invulnerable(&self) -> bool {
        matches!(self.invulnerable_until_ms, Some(until) if self.clock_ms < until)
    }

    /// Open the invulnerability window and start blinking
    pub(crate) fn start_invulnerability(&mut self) {
        self.invulnerable_until_ms = Some(self.clock_ms + INVULNERABILITY_MS);
        self.player.is_blinking = true;
    }

    /// Clear the window once the clock passes its expiry
    pub(crate) fn expire_invulnerability(&mut self) {
        if let Some(until) = self.invulnerable_until_ms {
            if self.clock_ms >= until {
                self.invulnerable_until_ms = None;
                self.player.is_blinking = false;
            }
        }
    }

    pub(crate) fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// True once the spawner's period has elapsed
    pub(crate) fn spawn_due(&self) -> bool {
        self.clock_ms - self.last_spawn_ms > self.spawn_interval_ms
    }

    pub(crate) fn mark_spawned(&mut self) {
        self.last_spawn_ms = self.clock_ms;
    }

    /// Drain pending events for the driver to dispatch
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
