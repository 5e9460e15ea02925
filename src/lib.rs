//! Block Rain - a falling-block arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, game state)
//! - `renderer`: WebGPU textured-quad rendering pipeline
//! - `audio`: Procedural sound effects (web only)
//! - `settings`: Player preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
///
/// All positions and sizes are in normalized device coordinates: the
/// playfield spans [-1, 1] on both axes regardless of pixel resolution.
pub mod consts {
    /// Player paddle size (width and height)
    pub const PLAYER_SIZE: f32 = 0.1;
    /// Player horizontal movement per update while a key is held
    pub const PLAYER_SPEED: f32 = 0.01;
    /// Player vertical resting position
    pub const PLAYER_START_Y: f32 = -0.8;
    /// Horizontal clamp for the player's x position
    pub const PLAYER_MAX_X: f32 = 0.9;

    /// Projectile dimensions
    pub const PROJECTILE_WIDTH: f32 = 0.02;
    pub const PROJECTILE_HEIGHT: f32 = 0.04;
    /// Projectile upward movement per update
    pub const PROJECTILE_SPEED: f32 = 0.015;

    /// Block size (width and height)
    pub const BLOCK_SIZE: f32 = 0.1;
    /// Block descent per update, multiplied by the current level
    pub const BLOCK_BASE_SPEED: f32 = 0.002;
    /// Blocks spawn at a random x within [-SPAWN_X_RANGE, SPAWN_X_RANGE]
    pub const SPAWN_X_RANGE: f32 = 0.8;

    /// Starting lives
    pub const START_LIVES: u8 = 3;
    /// Score awarded per destroyed block
    pub const SCORE_PER_BLOCK: u32 = 100;
    /// Level increments at every full multiple of this score
    pub const LEVEL_SCORE_STEP: u32 = 1000;

    /// Initial wall-clock period between block spawns
    pub const BASE_SPAWN_INTERVAL_MS: f64 = 2000.0;
    /// Spawn interval floor
    pub const MIN_SPAWN_INTERVAL_MS: f64 = 500.0;
    /// Spawn interval shrinks by this much per level
    pub const SPAWN_INTERVAL_STEP_MS: f64 = 100.0;

    /// Invulnerability window after losing a life
    pub const INVULNERABILITY_MS: f64 = 1000.0;
    /// Blink half-period while invulnerable
    pub const BLINK_PERIOD_MS: f64 = 100.0;

    /// Projectile-block hits use a circle test with radius
    /// (projectile width + block width) * this factor
    pub const HIT_RADIUS_FACTOR: f32 = 0.75;
}
