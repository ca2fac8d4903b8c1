//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Explicit timestep only
//! - Stable iteration order (platforms, then their barriers, in order)
//! - No rendering or platform dependencies beyond the input snapshot

pub mod clock;
pub mod rect;
pub mod state;
pub mod tick;

pub use clock::FixedStep;
pub use rect::Rect;
pub use state::{Axis, Barrier, GameEvent, GamePhase, GameState, Platform, Player};
pub use tick::{TickInput, tick};
