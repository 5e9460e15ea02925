//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Explicit clock advanced by the caller
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod update;

pub use collision::{Aabb, projectile_hits_block};
pub use state::{Block, GameEvent, GamePhase, GameState, LifeLostReason, Player, Projectile};
pub use update::{InputState, advance};
