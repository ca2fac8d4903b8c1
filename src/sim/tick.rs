//! Simulation tick
//!
//! Advances the world by one step: player movement, platform motion with
//! boundary reflection, then the barrier collision pass.

use glam::Vec2;

use super::state::{GameEvent, GamePhase, GameState, Player};
use crate::platform::input::{Direction, HeldKeys};

/// Input snapshot for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Directions held at the start of the tick
    pub held: HeldKeys,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    pub fn holding(held: HeldKeys) -> Self {
        Self { held, pause: false }
    }
}

/// Unit step for a direction in canvas space (y grows downward)
fn unit(dir: Direction) -> Vec2 {
    match dir {
        Direction::Left => Vec2::NEG_X,
        Direction::Right => Vec2::X,
        Direction::Up => Vec2::NEG_Y,
        Direction::Down => Vec2::Y,
    }
}

/// Sum of the held directions, scaled to one step of player movement
fn movement(player: &Player, held: &HeldKeys, dt: f32) -> Vec2 {
    held.iter()
        .map(|dir| unit(dir) * player.speed * dt)
        .fold(Vec2::ZERO, |acc, step| acc + step)
}

/// Advance the game state by one step of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    // Move player (no clamping; the player may leave the visible area)
    let step = movement(&state.player, &input.held, dt);
    state.player.rect.translate(step);

    // Move platforms and their barriers
    let bounds = state.bounds;
    for (index, platform) in state.platforms.iter_mut().enumerate() {
        for axis in platform.advance(bounds, dt).into_iter().flatten() {
            state.events.push(GameEvent::PlatformReflected {
                platform: index,
                axis,
            });
        }
    }

    check_collisions(state, step);
}

/// Test the player against every barrier, counting hits.
///
/// Each overlapping barrier pushes the player back against the held
/// movement once, so simultaneous hits stack. Later barriers are tested
/// against the already-nudged position. The pass stops as soon as the hit
/// limit is reached.
fn check_collisions(state: &mut GameState, step: Vec2) {
    for (p, platform) in state.platforms.iter().enumerate() {
        for (b, barrier) in platform.barriers.iter().enumerate() {
            if !state.player.rect.is_colliding(&barrier.rect) {
                continue;
            }

            state.hits += 1;
            state.player.rect.translate(-step);
            state.events.push(GameEvent::BarrierHit {
                platform: p,
                barrier: b,
                hits: state.hits,
            });
            log::debug!(
                "Barrier {}/{} hit at tick {} ({}/{})",
                p,
                b,
                state.time_ticks,
                state.hits,
                state.hit_limit
            );

            if state.hits >= state.hit_limit {
                state.phase = GamePhase::GameOver;
                state.events.push(GameEvent::GameOver { hits: state.hits });
                log::info!("Game over after {} ticks", state.time_ticks);
                return;
            }
        }
    }
}
