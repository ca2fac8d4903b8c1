//! Game state and core simulation types
//!
//! Everything a session needs lives in [`GameState`]; a restart simply
//! builds a new one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Hit limit reached; the host restarts the session
    GameOver,
}

/// World axis, used to report which velocity component reflected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Something the host should react to (sound, HUD, session end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player overlapped a barrier; `hits` is the counter after the hit
    BarrierHit {
        platform: usize,
        barrier: usize,
        hits: u32,
    },
    /// A platform crossed the world boundary and reversed on `axis`
    PlatformReflected { platform: usize, axis: Axis },
    /// Hit limit reached. Emitted exactly once per session.
    GameOver { hits: u32 },
}

/// The player-controlled box
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    /// Movement speed in pixels per second
    pub speed: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            rect: Rect::new(PLAYER_START_X, PLAYER_START_Y, PLAYER_SIZE, PLAYER_SIZE),
            speed: PLAYER_SPEED,
        }
    }
}

/// An obstacle riding on a platform. It has no velocity of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barrier {
    pub rect: Rect,
}

impl Barrier {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
        }
    }
}

/// A moving platform carrying zero or more barriers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    /// Velocity in pixels per second
    pub vel: Vec2,
    pub barriers: Vec<Barrier>,
}

impl Platform {
    pub fn new(rect: Rect, vel: Vec2, barriers: Vec<Barrier>) -> Self {
        Self { rect, vel, barriers }
    }

    /// Advance by one step and bounce off the world edges.
    ///
    /// The platform moves with its current velocity, then any axis whose
    /// box now sticks out of `bounds` is reversed. Barriers are carried by
    /// the velocity *after* that decision, so on a bounce tick they step
    /// back while the platform overshoots.
    ///
    /// Returns the axes that reflected this step.
    pub fn advance(&mut self, bounds: Vec2, dt: f32) -> [Option<Axis>; 2] {
        self.rect.translate(self.vel * dt);

        let mut reflected = [None, None];
        if self.rect.left() < 0.0 || self.rect.right() > bounds.x {
            self.vel.x = -self.vel.x;
            reflected[0] = Some(Axis::X);
        }
        if self.rect.top() < 0.0 || self.rect.bottom() > bounds.y {
            self.vel.y = -self.vel.y;
            reflected[1] = Some(Axis::Y);
        }

        let carry = self.vel * dt;
        for barrier in &mut self.barriers {
            barrier.rect.translate(carry);
        }

        reflected
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// World size; platforms bounce inside [0, w] x [0, h]
    pub bounds: Vec2,
    pub player: Player,
    /// Platforms in a fixed order (iteration order is part of determinism)
    pub platforms: Vec<Platform>,
    /// Barrier hits so far
    pub hits: u32,
    /// Hits that end the session
    pub hit_limit: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Events produced since the host last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session with the given world contents
    pub fn new(bounds: Vec2, player: Player, platforms: Vec<Platform>, hit_limit: u32) -> Self {
        Self {
            bounds,
            player,
            platforms,
            hits: 0,
            hit_limit,
            time_ticks: 0,
            phase: GamePhase::Playing,
            events: Vec::new(),
        }
    }

    /// Follow the render surface size. Takes effect on the next tick.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.bounds = Vec2::new(width, height);
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Hand queued events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over every barrier with its platform and barrier index
    pub fn barriers(&self) -> impl Iterator<Item = (usize, usize, &Barrier)> {
        self.platforms.iter().enumerate().flat_map(|(p, platform)| {
            platform
                .barriers
                .iter()
                .enumerate()
                .map(move |(b, barrier)| (p, b, barrier))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Vec2 {
        Vec2::new(WORLD_WIDTH, WORLD_HEIGHT)
    }

    #[test]
    fn test_platform_moves_barriers_with_it() {
        let mut platform = Platform::new(
            Rect::new(100.0, 200.0, 150.0, 20.0),
            Vec2::new(120.0, 0.0),
            vec![Barrier::new(120.0, 180.0, 20.0, 20.0)],
        );

        let reflected = platform.advance(bounds(), 0.5);
        assert_eq!(reflected, [None, None]);
        assert_eq!(platform.rect.pos, Vec2::new(160.0, 200.0));
        assert_eq!(platform.barriers[0].rect.pos, Vec2::new(180.0, 180.0));
    }

    #[test]
    fn test_platform_reflects_off_left_edge() {
        let mut platform = Platform::new(
            Rect::new(0.0, 100.0, 50.0, 10.0),
            Vec2::new(-1.0, 0.0),
            Vec::new(),
        );

        let reflected = platform.advance(bounds(), 1.0);
        assert_eq!(platform.rect.left(), -1.0);
        assert_eq!(reflected[0], Some(Axis::X));
        assert!(platform.vel.x > 0.0);

        // Back inside: no second flip
        let reflected = platform.advance(bounds(), 1.0);
        assert_eq!(platform.rect.left(), 0.0);
        assert_eq!(reflected[0], None);
        assert!(platform.vel.x > 0.0);
    }

    #[test]
    fn test_platform_reflects_off_bottom_edge() {
        let mut platform = Platform::new(
            Rect::new(10.0, 585.0, 50.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec::new(),
        );

        let reflected = platform.advance(bounds(), 1.0);
        assert_eq!(reflected, [None, Some(Axis::Y)]);
        assert_eq!(platform.vel.y, -10.0);
    }

    #[test]
    fn test_barriers_follow_post_reflection_velocity() {
        let mut platform = Platform::new(
            Rect::new(745.0, 100.0, 50.0, 10.0),
            Vec2::new(10.0, 0.0),
            vec![Barrier::new(760.0, 90.0, 10.0, 10.0)],
        );

        platform.advance(bounds(), 1.0);
        // Platform overshoots with the old velocity...
        assert_eq!(platform.rect.left(), 755.0);
        // ...while its barrier already steps back with the new one
        assert_eq!(platform.barriers[0].rect.left(), 750.0);
    }

    #[test]
    fn test_barrier_iteration_order() {
        let platforms = vec![
            Platform::new(
                Rect::new(0.0, 0.0, 10.0, 10.0),
                Vec2::ZERO,
                vec![Barrier::new(0.0, 0.0, 1.0, 1.0), Barrier::new(1.0, 0.0, 1.0, 1.0)],
            ),
            Platform::new(Rect::new(0.0, 0.0, 10.0, 10.0), Vec2::ZERO, Vec::new()),
            Platform::new(
                Rect::new(0.0, 0.0, 10.0, 10.0),
                Vec2::ZERO,
                vec![Barrier::new(2.0, 0.0, 1.0, 1.0)],
            ),
        ];
        let state = GameState::new(bounds(), Player::default(), platforms, HIT_LIMIT);

        let ids: Vec<(usize, usize)> = state.barriers().map(|(p, b, _)| (p, b)).collect();
        assert_eq!(ids, vec![(0, 0), (0, 1), (2, 0)]);
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = GameState::new(bounds(), Player::default(), Vec::new(), HIT_LIMIT);
        state.events.push(GameEvent::GameOver { hits: 3 });

        assert_eq!(state.drain_events(), vec![GameEvent::GameOver { hits: 3 }]);
        assert!(state.drain_events().is_empty());
    }
}
