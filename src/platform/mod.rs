//! Platform abstraction layer
//!
//! Handles browser/native differences for input events. Storage lives with
//! the types that persist themselves (see `settings`).

pub mod input;

pub use input::{Direction, HeldKeys};
