//! Per-frame simulation step
//!
//! [`advance`] is the whole game: it owns movement integration, collision
//! resolution, spawn timing, scoring, and the lives/level/invulnerability
//! state machine. It never touches the renderer, DOM, or audio; side
//! effects leave as [`GameEvent`]s.

use glam::Vec2;
use rand::Rng;

use super::collision::projectile_hits_block;
use super::state::{Block, GameEvent, GamePhase, GameState, LifeLostReason, Projectile};
use crate::consts::*;

/// Held-key flags read by each update. `fire` is edge-triggered: the driver
/// sets it on key-down and clears it after the update that consumed it.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// Advance the session by one update.
///
/// `dt_ms` drives the wall-clock mechanisms (spawner, invulnerability
/// expiry, blink phase); entity movement is one fixed step per call.
/// A game-over session is frozen entirely until [`GameState::restart`].
pub fn advance(state: &mut GameState, input: &InputState, dt_ms: f64) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    state.clock_ms += dt_ms;
    state.expire_invulnerability();

    // Horizontal movement, clamped to the playfield
    if input.left {
        state.player.pos.x = (state.player.pos.x - state.player.speed).max(-PLAYER_MAX_X);
    }
    if input.right {
        state.player.pos.x = (state.player.pos.x + state.player.speed).min(PLAYER_MAX_X);
    }

    move_projectiles(state);
    move_blocks(state);

    if state.phase == GamePhase::Playing && state.spawn_due() {
        spawn_block(state);
        state.mark_spawned();
    }

    // Fired projectiles take their first movement step next update
    if input.fire && state.phase == GamePhase::Playing {
        fire_projectile(state);
    }
}

/// Move projectiles up, drop off-screen ones, resolve block hits.
/// Iterates from the end so removal never skips an element.
fn move_projectiles(state: &mut GameState) {
    for i in (0..state.projectiles.len()).rev() {
        state.projectiles[i].pos.y += state.projectiles[i].speed;

        if state.projectiles[i].pos.y > 1.0 {
            state.projectiles.swap_remove(i);
            continue;
        }

        let bounds = state.projectiles[i].bounds();
        let hit = state
            .blocks
            .iter()
            .position(|block| projectile_hits_block(&bounds, &block.bounds()));
        if let Some(j) = hit {
            state.blocks.swap_remove(j);
            state.projectiles.swap_remove(i);
            award_block(state);
        }
    }
}

/// Move blocks down; blocks leaving the screen or striking the player
/// cost a life.
fn move_blocks(state: &mut GameState) {
    for i in (0..state.blocks.len()).rev() {
        state.blocks[i].pos.y -= state.blocks[i].speed;

        if state.blocks[i].pos.y < -1.0 {
            state.blocks.swap_remove(i);
            lose_life(state, LifeLostReason::PassedScreen);
            continue;
        }

        if !state.is_invulnerable()
            && state.blocks[i].bounds().overlaps(&state.player.bounds())
        {
            state.blocks.swap_remove(i);
            lose_life(state, LifeLostReason::HitPlayer);
        }
    }
}

/// Score a destroyed block and handle level progression
fn award_block(state: &mut GameState) {
    state.score += SCORE_PER_BLOCK;
    state.events.push(GameEvent::BlockDestroyed);

    if state.score % LEVEL_SCORE_STEP == 0 {
        state.level += 1;
        state.spawn_interval_ms = (BASE_SPAWN_INTERVAL_MS
            - state.level as f64 * SPAWN_INTERVAL_STEP_MS)
            .max(MIN_SPAWN_INTERVAL_MS);
        state.events.push(GameEvent::LevelUp { level: state.level });
    }
}

/// Decrement lives unless shielded by an active invulnerability window.
/// Opens a fresh window on every counted loss, so at most one is active.
fn lose_life(state: &mut GameState, reason: LifeLostReason) {
    if state.is_invulnerable() {
        return;
    }

    state.lives = state.lives.saturating_sub(1);
    state.events.push(GameEvent::LifeLost { reason });
    state.start_invulnerability();

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver);
    }
}

fn fire_projectile(state: &mut GameState) {
    let origin = Vec2::new(
        state.player.pos.x,
        state.player.pos.y + state.player.size.y,
    );
    state.projectiles.push(Projectile {
        pos: origin,
        size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
        speed: PROJECTILE_SPEED,
    });
    state.events.push(GameEvent::ProjectileFired);
}

/// Drop one block from the top at a random x, falling faster each level
fn spawn_block(state: &mut GameState) {
    let level = state.level;
    let rng = state.rng_mut();
    let x = rng.random_range(-SPAWN_X_RANGE..SPAWN_X_RANGE);
    let hit_points = rng.random_range(1..=3);
    state.blocks.push(Block {
        pos: Vec2::new(x, 1.0),
        size: Vec2::splat(BLOCK_SIZE),
        speed: BLOCK_BASE_SPEED * level as f32,
        hit_points,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f64 = 16.0;

    fn held(left: bool, right: bool) -> InputState {
        InputState { left, right, fire: false }
    }

    fn fire() -> InputState {
        InputState { left: false, right: false, fire: true }
    }

    /// A block placed by hand, out of the spawner's control
    fn block_at(x: f32, y: f32, speed: f32) -> Block {
        Block {
            pos: Vec2::new(x, y),
            size: Vec2::splat(BLOCK_SIZE),
            speed,
            hit_points: 1,
        }
    }

    #[test]
    fn held_keys_move_and_clamp() {
        let mut state = GameState::new(1);

        for _ in 0..200 {
            advance(&mut state, &held(false, true), DT);
        }
        assert!((state.player.pos.x - PLAYER_MAX_X).abs() < 1e-6);

        for _ in 0..400 {
            advance(&mut state, &held(true, false), DT);
        }
        assert!((state.player.pos.x + PLAYER_MAX_X).abs() < 1e-6);
    }

    #[test]
    fn projectile_removed_after_exact_update_count() {
        let mut state = GameState::new(1);
        advance(&mut state, &fire(), DT);
        assert_eq!(state.projectiles.len(), 1);

        // Spawned at the player's top edge, not yet moved
        let start_y = PLAYER_START_Y + PLAYER_SIZE;
        assert!((state.projectiles[0].pos.y - start_y).abs() < 1e-6);

        // ceil((1.0 - start_y) / speed) updates to leave the screen
        let updates = ((1.0 - start_y) / PROJECTILE_SPEED).ceil() as usize;
        for _ in 0..updates - 1 {
            advance(&mut state, &InputState::default(), DT);
        }
        assert_eq!(state.projectiles.len(), 1);

        advance(&mut state, &InputState::default(), DT);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn destroying_block_scores_without_costing_lives() {
        let mut state = GameState::new(1);
        state.blocks.push(block_at(0.0, 0.0, 0.002));
        state.projectiles.push(Projectile {
            pos: Vec2::new(0.04, -0.02),
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            speed: PROJECTILE_SPEED,
        });

        advance(&mut state, &InputState::default(), DT);

        assert!(state.blocks.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.score, SCORE_PER_BLOCK);
        assert_eq!(state.lives, START_LIVES);
        assert!(state.take_events().contains(&GameEvent::BlockDestroyed));
    }

    #[test]
    fn level_up_at_exact_score_multiples() {
        let mut state = GameState::new(1);
        state.score = 3900;
        state.level = 4;
        state.blocks.push(block_at(0.0, 0.0, 0.002));
        state.projectiles.push(Projectile {
            pos: Vec2::new(0.04, -0.02),
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            speed: PROJECTILE_SPEED,
        });

        advance(&mut state, &InputState::default(), DT);

        assert_eq!(state.score, 4000);
        assert_eq!(state.level, 5);
        assert!((state.spawn_interval_ms - 1500.0).abs() < f64::EPSILON);
        assert!(state.take_events().contains(&GameEvent::LevelUp { level: 5 }));
    }

    #[test]
    fn spawn_interval_floors_at_minimum() {
        let mut state = GameState::new(1);
        state.score = 19_900;
        state.level = 19;
        state.blocks.push(block_at(0.0, 0.0, 0.002));
        state.projectiles.push(Projectile {
            pos: Vec2::new(0.04, -0.02),
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            speed: PROJECTILE_SPEED,
        });

        advance(&mut state, &InputState::default(), DT);

        assert_eq!(state.level, 20);
        assert!((state.spawn_interval_ms - MIN_SPAWN_INTERVAL_MS).abs() < f64::EPSILON);
    }

    #[test]
    fn passing_block_costs_a_life() {
        let mut state = GameState::new(1);
        state.blocks.push(block_at(0.5, -0.999, 0.002));

        advance(&mut state, &InputState::default(), DT);

        assert!(state.blocks.is_empty());
        assert_eq!(state.lives, START_LIVES - 1);
        assert!(state.take_events().contains(&GameEvent::LifeLost {
            reason: LifeLostReason::PassedScreen
        }));
    }

    #[test]
    fn block_striking_player_costs_a_life() {
        let mut state = GameState::new(1);
        state.blocks.push(block_at(0.0, PLAYER_START_Y + 0.05, 0.002));

        advance(&mut state, &InputState::default(), DT);

        assert!(state.blocks.is_empty());
        assert_eq!(state.lives, START_LIVES - 1);
        assert!(state.take_events().contains(&GameEvent::LifeLost {
            reason: LifeLostReason::HitPlayer
        }));
    }

    #[test]
    fn invulnerability_shields_until_expiry() {
        let mut state = GameState::new(1);

        // First loss opens the window
        state.blocks.push(block_at(0.5, -0.999, 0.002));
        advance(&mut state, &InputState::default(), DT);
        assert_eq!(state.lives, START_LIVES - 1);
        assert!(state.is_invulnerable());
        assert!(state.player.is_blinking);

        // While shielded the player ignores overlapping blocks entirely
        state.blocks.push(block_at(0.0, PLAYER_START_Y + 0.05, 0.0));
        advance(&mut state, &InputState::default(), DT);
        assert_eq!(state.blocks.len(), 1);
        assert_eq!(state.lives, START_LIVES - 1);

        // A passing block while shielded is removed but costs nothing
        state.blocks.push(block_at(0.5, -0.999, 0.002));
        advance(&mut state, &InputState::default(), DT);
        assert_eq!(state.blocks.len(), 1);
        assert_eq!(state.lives, START_LIVES - 1);

        // Window expires after its fixed duration
        state.blocks.clear();
        advance(&mut state, &InputState::default(), INVULNERABILITY_MS + 1.0);
        assert!(!state.is_invulnerable());
        assert!(!state.player.is_blinking);

        // Collisions cost lives again
        state.blocks.push(block_at(0.0, PLAYER_START_Y + 0.05, 0.0));
        advance(&mut state, &InputState::default(), DT);
        assert!(state.blocks.is_empty());
        assert_eq!(state.lives, START_LIVES - 2);
    }

    #[test]
    fn game_over_fires_once_and_freezes_state() {
        let mut state = GameState::new(1);
        state.lives = 1;
        state.blocks.push(block_at(0.5, -0.999, 0.002));

        advance(&mut state, &InputState::default(), DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        let events = state.take_events();
        assert_eq!(events.iter().filter(|e| **e == GameEvent::GameOver).count(), 1);

        // Frozen: no movement, no firing, no spawning, no clock
        let clock = state.clock_ms;
        let x = state.player.pos.x;
        for _ in 0..500 {
            advance(&mut state, &InputState { left: false, right: true, fire: true }, DT);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.pos.x, x);
        assert_eq!(state.clock_ms, clock);
        assert!(state.projectiles.is_empty());
        assert!(state.blocks.is_empty());
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn restart_resets_the_session() {
        let mut state = GameState::new(1);
        state.lives = 1;
        state.blocks.push(block_at(0.5, -0.999, 0.002));
        advance(&mut state, &fire(), DT);
        for _ in 0..30 {
            advance(&mut state, &held(false, true), DT);
        }
        assert_eq!(state.phase, GamePhase::GameOver);

        state.restart();

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, START_LIVES);
        assert_eq!(state.level, 1);
        assert!(state.blocks.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.player.pos.x, 0.0);
        assert!((state.spawn_interval_ms - BASE_SPAWN_INTERVAL_MS).abs() < f64::EPSILON);
        assert!(!state.is_invulnerable());

        // Spawner is re-armed relative to the restart instant
        advance(&mut state, &InputState::default(), BASE_SPAWN_INTERVAL_MS + 1.0);
        assert_eq!(state.blocks.len(), 1);
    }

    #[test]
    fn spawner_respects_interval_and_level() {
        let mut state = GameState::new(1);

        advance(&mut state, &InputState::default(), 1999.0);
        assert!(state.blocks.is_empty());

        advance(&mut state, &InputState::default(), 2.0);
        assert_eq!(state.blocks.len(), 1);
        let block = &state.blocks[0];
        assert!(block.pos.x >= -SPAWN_X_RANGE && block.pos.x <= SPAWN_X_RANGE);
        assert_eq!(block.pos.y, 1.0);
        assert!((block.speed - BLOCK_BASE_SPEED).abs() < 1e-6);
        assert!((1..=3).contains(&block.hit_points));
    }

    #[test]
    fn same_seed_spawns_identically() {
        let mut a = GameState::new(99);
        let mut b = GameState::new(99);
        for _ in 0..4 {
            advance(&mut a, &InputState::default(), 2100.0);
            advance(&mut b, &InputState::default(), 2100.0);
        }
        assert_eq!(a.blocks.len(), b.blocks.len());
        for (ba, bb) in a.blocks.iter().zip(&b.blocks) {
            assert_eq!(ba.pos, bb.pos);
            assert_eq!(ba.hit_points, bb.hit_points);
        }
    }

    proptest! {
        #[test]
        fn player_x_never_leaves_clamp_range(
            steps in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..600)
        ) {
            let mut state = GameState::new(42);
            for (left, right) in steps {
                advance(&mut state, &held(left, right), DT);
                prop_assert!(state.player.pos.x >= -PLAYER_MAX_X);
                prop_assert!(state.player.pos.x <= PLAYER_MAX_X);
            }
        }
    }
}
