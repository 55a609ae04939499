//! Rendering module
//!
//! The simulation never draws directly. Each frame clears a [`Surface`] and
//! then draws every sprite at its current position and rotation. The browser
//! build implements the trait on a 2D canvas context.

use crate::sim::{Bounds, IconId, Sprite};

/// A drawing target for sprites
pub trait Surface {
    /// Erase the whole drawing area
    fn clear(&mut self, bounds: Bounds);

    /// Draw one icon bitmap centered at `sprite.pos`, rotated by `sprite.rotation`
    fn draw_sprite(&mut self, sprite: &Sprite);
}

/// Draw every sprite, in spawn order
pub fn draw_sprites<S: Surface + ?Sized>(surface: &mut S, sprites: &[Sprite]) {
    for sprite in sprites {
        surface.draw_sprite(sprite);
    }
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear { width: f32, height: f32 },
    Sprite { icon: IconId, x: f32, y: f32, rotation: f32, size: f32 },
}

/// Surface that records draw calls instead of drawing (headless runs, tests)
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
    pub frames: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw calls since the most recent clear
    pub fn last_frame(&self) -> &[DrawCall] {
        let start = self
            .calls
            .iter()
            .rposition(|c| matches!(c, DrawCall::Clear { .. }))
            .unwrap_or(0);
        &self.calls[start..]
    }

    pub fn reset(&mut self) {
        self.calls.clear();
        self.frames = 0;
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, bounds: Bounds) {
        self.frames += 1;
        self.calls.push(DrawCall::Clear {
            width: bounds.width,
            height: bounds.height,
        });
    }

    fn draw_sprite(&mut self, sprite: &Sprite) {
        self.calls.push(DrawCall::Sprite {
            icon: sprite.icon,
            x: sprite.pos.x,
            y: sprite.pos.y,
            rotation: sprite.rotation,
            size: sprite.size(),
        });
    }
}
