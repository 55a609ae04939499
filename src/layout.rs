//! Canvas sizing
//!
//! The canvas keeps a fixed aspect ratio and fits inside half the window,
//! leaving room below it for the control row.

use serde::{Deserialize, Serialize};

use crate::sim::Bounds;

/// Canvas size in whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width as f32, self.height as f32)
    }
}

/// Fit a canvas of `aspect` (width / height) into a window of the given size
pub fn fit_canvas(window_w: f32, window_h: f32, aspect: f32, control_space: f32) -> CanvasSize {
    let half_w = window_w / 2.0;
    let half_h = window_h / 2.0;

    let (mut w, mut h) = if half_h > 0.0 && half_w / half_h > aspect {
        (half_h * aspect, half_h)
    } else {
        (half_w, half_w / aspect)
    };

    let max_h = window_h - control_space;
    if h > max_h {
        h = max_h.max(0.0);
        w = h * aspect;
    }

    CanvasSize {
        width: w.round().max(0.0) as u32,
        height: h.round().max(0.0) as u32,
    }
}
