//! Sprite model
//!
//! Every sprite is a circle of the same radius carrying a rotating bitmap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Index of an icon in the manifest. Many sprites may share one bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IconId(pub u16);

impl IconId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stable sprite identifier, allocated in spawn order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpriteId(pub u32);

/// A bouncing icon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub id: SpriteId,
    /// Bitmap drawn for this sprite (not owned)
    pub icon: IconId,
    /// Center, in canvas pixels
    pub pos: Vec2,
    /// Pixels per nominal frame
    pub vel: Vec2,
    /// Radians, not normalized
    pub rotation: f32,
    /// Radians per nominal frame
    pub angular_vel: f32,
    pub radius: f32,
}

impl Sprite {
    pub fn new(id: SpriteId, icon: IconId, radius: f32) -> Self {
        Self {
            id,
            icon,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            rotation: 0.0,
            angular_vel: 0.0,
            radius,
        }
    }

    /// Advance position and rotation by `dt` frames
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.rotation += self.angular_vel * dt;
    }

    /// Bitmap edge length
    #[inline]
    pub fn size(&self) -> f32 {
        self.radius * 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate() {
        let mut sprite = Sprite::new(SpriteId(1), IconId(0), 50.0);
        sprite.pos = Vec2::new(100.0, 100.0);
        sprite.vel = Vec2::new(2.0, -1.0);
        sprite.angular_vel = 0.1;

        sprite.integrate(1.0);
        assert_eq!(sprite.pos, Vec2::new(102.0, 99.0));
        assert!((sprite.rotation - 0.1).abs() < 1e-6);

        sprite.integrate(0.5);
        assert_eq!(sprite.pos, Vec2::new(103.0, 98.5));
    }
}
