//! Split Brain - A barrier-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, reflection, collisions, hit count)
//! - `scenario`: World layouts (reference layout, seeded random layouts, JSON)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction (input capture)
//! - `audio`: Procedural sound effects (Web Audio)
//! - `settings`: Persisted player preferences

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod scenario;
pub mod settings;
pub mod sim;

pub use scenario::{Scenario, ScenarioError};
pub use settings::{LayoutKind, Settings};

/// Game configuration constants
pub mod consts {
    /// Reference animation frame rate
    pub const FRAME_RATE: f32 = 60.0;
    /// Reference simulation timestep (one animation frame)
    pub const SIM_DT: f32 = 1.0 / FRAME_RATE;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame the accumulator accepts (a backgrounded tab reports seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default world dimensions (replaced by the canvas size at runtime)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 50.0;
    pub const PLAYER_START_Y: f32 = 50.0;
    pub const PLAYER_SIZE: f32 = 30.0;
    /// 5 px per frame
    pub const PLAYER_SPEED: f32 = 300.0;

    /// Hits that end the session
    pub const HIT_LIMIT: u32 = 3;
}

/// Convert a per-frame quantity (pixels per reference frame) to per-second
#[inline]
pub fn per_second(value: f32) -> f32 {
    value * consts::FRAME_RATE
}
