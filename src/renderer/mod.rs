//! WebGPU rendering module
//!
//! The renderer only reads [`GameState`]; nothing flows back into the
//! simulation.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use vertex::Vertex;

use crate::sim::{GamePhase, GameState};
use vertex::colors;

/// Build the frame: platforms, then barriers on top, then the player
pub fn frame_vertices(state: &GameState) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for platform in &state.platforms {
        vertices.extend(shapes::rect(&platform.rect, colors::PLATFORM));
    }
    // A barrier knocked off its platform by a bounce may overlap another one
    for (_, _, barrier) in state.barriers() {
        vertices.extend(shapes::rect(&barrier.rect, colors::BARRIER));
    }

    vertices.extend(shapes::rect(&state.player.rect, colors::PLAYER));
    vertices
}

/// HUD overlay text
pub fn hud_text(state: &GameState) -> String {
    format!("Hits: {}/{}", state.hits, state.hit_limit)
}

/// What the DOM overlay shows. The host redraws it only when this changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudView {
    pub text: String,
    pub paused: bool,
}

impl HudView {
    pub fn of(state: &GameState) -> Self {
        Self {
            text: hud_text(state),
            paused: state.phase == GamePhase::Paused,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;

    #[test]
    fn test_frame_draws_every_box() {
        let state = Scenario::classic().build();
        let vertices = frame_vertices(&state);
        // 3 platforms + 3 barriers + player, 6 vertices each
        assert_eq!(vertices.len(), 7 * 6);

        // Player is drawn last
        let last = &vertices[vertices.len() - 1];
        assert_eq!(last.color, colors::PLAYER);
        assert!(vertices[..18].iter().all(|v| v.color == colors::PLATFORM));
        assert!(vertices[18..36].iter().all(|v| v.color == colors::BARRIER));
    }

    #[test]
    fn test_hud_text() {
        let mut state = Scenario::classic().build();
        assert_eq!(hud_text(&state), "Hits: 0/3");
        state.hits = 2;
        assert_eq!(hud_text(&state), "Hits: 2/3");
    }

    #[test]
    fn test_hud_view_changes_only_with_hits_or_pause() {
        let mut state = Scenario::classic().build();
        let shown = HudView::of(&state);

        // Movement alone leaves the overlay as is
        state.player.rect.translate(glam::Vec2::new(10.0, 0.0));
        state.time_ticks += 1;
        assert_eq!(HudView::of(&state), shown);

        state.hits = 1;
        assert_ne!(HudView::of(&state), shown);

        let shown = HudView::of(&state);
        state.phase = GamePhase::Paused;
        assert!(HudView::of(&state).paused);
        assert_ne!(HudView::of(&state), shown);
    }
}
