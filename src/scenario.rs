//! World layouts
//!
//! A [`Scenario`] describes a session's starting world: its size, where the
//! player spawns, the platforms with their barriers, and how many hits end
//! the run. `build()` turns it into a fresh [`GameState`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::per_second;
use crate::sim::{Barrier, GameState, Platform, Player, Rect};

/// Scenario loading/validation failure
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("malformed scenario JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid scenario: {0}")]
    Invalid(String),
}

/// A platform and the barriers it carries, as laid out at session start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformLayout {
    pub rect: Rect,
    /// Velocity in pixels per second
    pub vel: Vec2,
    #[serde(default)]
    pub barriers: Vec<Rect>,
}

/// Starting layout of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// World size in pixels
    pub bounds: Vec2,
    /// Player spawn box
    pub player: Rect,
    /// Player speed in pixels per second
    #[serde(default = "default_player_speed")]
    pub player_speed: f32,
    pub platforms: Vec<PlatformLayout>,
    #[serde(default = "default_hit_limit")]
    pub hit_limit: u32,
}

fn default_player_speed() -> f32 {
    PLAYER_SPEED
}

fn default_hit_limit() -> u32 {
    HIT_LIMIT
}

/// Helper for the hand-placed layout: velocities given per frame
fn classic_platform(rect: Rect, dx: f32, dy: f32, barrier: Rect) -> PlatformLayout {
    PlatformLayout {
        rect,
        vel: Vec2::new(per_second(dx), per_second(dy)),
        barriers: vec![barrier],
    }
}

impl Scenario {
    /// The reference three-platform maze
    pub fn classic() -> Self {
        Self {
            bounds: Vec2::new(WORLD_WIDTH, WORLD_HEIGHT),
            player: Rect::new(PLAYER_START_X, PLAYER_START_Y, PLAYER_SIZE, PLAYER_SIZE),
            player_speed: PLAYER_SPEED,
            platforms: vec![
                classic_platform(
                    Rect::new(100.0, 200.0, 150.0, 20.0),
                    2.0,
                    0.0,
                    Rect::new(120.0, 180.0, 20.0, 20.0),
                ),
                classic_platform(
                    Rect::new(300.0, 400.0, 200.0, 20.0),
                    0.0,
                    2.0,
                    Rect::new(350.0, 380.0, 30.0, 30.0),
                ),
                classic_platform(
                    Rect::new(500.0, 150.0, 100.0, 20.0),
                    3.0,
                    0.0,
                    Rect::new(520.0, 130.0, 20.0, 20.0),
                ),
            ],
            hit_limit: HIT_LIMIT,
        }
    }

    /// Generate a layout from a seed. Same seed and bounds, same layout.
    ///
    /// Platforms sit in horizontal lanes below the spawn corner. Each one
    /// oscillates along a single axis and carries up to two barriers resting
    /// on its top edge.
    pub fn random(seed: u64, bounds: Vec2) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let platform_count = rng.random_range(3..=5u32);
        let lane_top = (PLAYER_START_Y + PLAYER_SIZE) * 3.0;
        let lane_span = (bounds.y - lane_top - 40.0).max(platform_count as f32);
        let lane_height = lane_span / platform_count as f32;

        let mut platforms = Vec::with_capacity(platform_count as usize);
        for lane in 0..platform_count {
            let width = rng.random_range(80.0..220.0f32).min(bounds.x * 0.5);
            let height = 20.0;
            let x = rng.random_range(0.0..=(bounds.x - width).max(0.0));
            let y = lane_top + lane as f32 * lane_height + lane_height / 2.0;

            let speed = per_second(rng.random_range(1.5..3.5f32));
            let speed = if rng.random_bool(0.5) { speed } else { -speed };
            let vel = if rng.random_bool(0.7) {
                Vec2::new(speed, 0.0)
            } else {
                Vec2::new(0.0, speed)
            };

            let barrier_count = rng.random_range(0..=2u32);
            let mut barriers = Vec::with_capacity(barrier_count as usize);
            for _ in 0..barrier_count {
                let size = rng.random_range(20.0..35.0f32);
                let bx = x + rng.random_range(0.0..=(width - size).max(0.0));
                barriers.push(Rect::new(bx, y - size, size, size));
            }

            platforms.push(PlatformLayout {
                rect: Rect::new(x, y, width, height),
                vel,
                barriers,
            });
        }

        log::info!(
            "Generated layout {} with {} platforms",
            seed,
            platforms.len()
        );

        Self {
            bounds,
            player: Rect::new(PLAYER_START_X, PLAYER_START_Y, PLAYER_SIZE, PLAYER_SIZE),
            player_speed: PLAYER_SPEED,
            platforms,
            hit_limit: HIT_LIMIT,
        }
    }

    /// Parse and validate a JSON layout
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn to_json(&self) -> Result<String, ScenarioError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject layouts the simulation cannot run sensibly
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if !is_positive(self.bounds) {
            return Err(ScenarioError::Invalid(format!(
                "world bounds must be positive, got {:?}",
                self.bounds
            )));
        }
        check_rect("player", &self.player)?;
        if !self.player_speed.is_finite() || self.player_speed < 0.0 {
            return Err(ScenarioError::Invalid(format!(
                "player speed must be a non-negative number, got {}",
                self.player_speed
            )));
        }
        if self.hit_limit == 0 {
            return Err(ScenarioError::Invalid("hit limit must be at least 1".into()));
        }

        for (i, platform) in self.platforms.iter().enumerate() {
            check_rect(&format!("platform {i}"), &platform.rect)?;
            if !platform.vel.is_finite() {
                return Err(ScenarioError::Invalid(format!(
                    "platform {i} velocity is not finite"
                )));
            }
            for (j, barrier) in platform.barriers.iter().enumerate() {
                check_rect(&format!("platform {i} barrier {j}"), barrier)?;
            }
        }

        Ok(())
    }

    /// Resize the world, shifting any platform that would start outside it
    /// back in along with its barriers. A platform wider than the world
    /// keeps its left edge at 0.
    pub fn fit_to(&mut self, bounds: Vec2) {
        self.bounds = bounds;
        for platform in &mut self.platforms {
            let rect = &platform.rect;
            let shift = Vec2::new(
                (bounds.x - rect.right()).min(0.0).max(-rect.left()),
                (bounds.y - rect.bottom()).min(0.0).max(-rect.top()),
            );
            if shift == Vec2::ZERO {
                continue;
            }
            platform.rect.translate(shift);
            for barrier in &mut platform.barriers {
                barrier.translate(shift);
            }
        }
    }

    /// Start a new session from this layout
    pub fn build(&self) -> GameState {
        let player = Player {
            rect: self.player,
            speed: self.player_speed,
        };
        let platforms = self
            .platforms
            .iter()
            .map(|layout| {
                Platform::new(
                    layout.rect,
                    layout.vel,
                    layout.barriers.iter().map(|rect| Barrier { rect: *rect }).collect(),
                )
            })
            .collect();

        GameState::new(self.bounds, player, platforms, self.hit_limit)
    }
}

fn is_positive(v: Vec2) -> bool {
    v.is_finite() && v.x > 0.0 && v.y > 0.0
}

fn check_rect(what: &str, rect: &Rect) -> Result<(), ScenarioError> {
    if !rect.pos.is_finite() || !is_positive(rect.size) {
        return Err(ScenarioError::Invalid(format!(
            "{what} needs a finite position and positive size, got {rect:?}"
        )));
    }
    Ok(())
}
