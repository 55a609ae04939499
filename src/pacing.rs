//! Frame pacing
//!
//! Turns display-refresh callbacks into simulation steps. Step size is always
//! one nominal frame so the per-frame tuning constants keep their meaning.

use crate::consts::{FRAME_DT, MAX_SUBSTEPS, NOMINAL_FRAME_MS};
use crate::tuning::PacingMode;

/// Steps to run for one refresh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steps {
    pub count: u32,
    pub dt: f32,
}

#[derive(Debug, Clone)]
pub struct FramePacer {
    mode: PacingMode,
    /// Unconsumed time, in nominal frames
    accumulator: f64,
    last_time: Option<f64>,
}

impl FramePacer {
    pub fn new(mode: PacingMode) -> Self {
        Self {
            mode,
            accumulator: 0.0,
            last_time: None,
        }
    }

    pub fn mode(&self) -> PacingMode {
        self.mode
    }

    /// Steps due at refresh timestamp `now_ms`
    pub fn advance(&mut self, now_ms: f64) -> Steps {
        let steps = match self.mode {
            PacingMode::PerRefresh => 1,
            PacingMode::FixedStep => {
                let elapsed_frames = match self.last_time {
                    Some(last) => (now_ms - last).max(0.0) / NOMINAL_FRAME_MS,
                    None => 1.0,
                };
                // Cap the catch-up after a long gap (hidden tab, debugger)
                self.accumulator += elapsed_frames.min(MAX_SUBSTEPS as f64);

                let mut substeps = 0;
                while self.accumulator >= 1.0 && substeps < MAX_SUBSTEPS {
                    self.accumulator -= 1.0;
                    substeps += 1;
                }
                substeps
            }
        };
        self.last_time = Some(now_ms);
        Steps {
            count: steps,
            dt: FRAME_DT,
        }
    }
}
