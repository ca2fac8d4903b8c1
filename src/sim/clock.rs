//! Fixed-step pacing for the host frame loop

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Turns variable frame times into a whole number of `SIM_DT` ticks
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame's elapsed seconds and get the number of ticks to run.
    ///
    /// At most `MAX_SUBSTEPS` ticks are due per frame. Time beyond that is
    /// dropped, keeping only the phase within the current tick, so a slow
    /// stretch never turns into a fast-forward once frames speed up again.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut due = 0;
        while self.accumulator >= SIM_DT && due < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            due += 1;
        }

        if self.accumulator >= SIM_DT {
            log::debug!("Dropping {:.3}s of frame backlog", self.accumulator);
            self.accumulator %= SIM_DT;
        }

        due
    }

    /// Time carried into the next frame
    pub fn leftover(&self) -> f32 {
        self.accumulator
    }
}
