//! Edge spawning
//!
//! New sprites enter from a random canvas edge, fully on-canvas, moving inward.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::sprite::{IconId, Sprite, SpriteId};
use super::state::Bounds;
use crate::centered_noise;
use crate::tuning::Tuning;

/// A canvas boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    /// Unit vector pointing from this edge into the canvas (+y is down)
    pub fn inward(self) -> Vec2 {
        match self {
            Edge::Top => Vec2::Y,
            Edge::Bottom => Vec2::NEG_Y,
            Edge::Left => Vec2::X,
            Edge::Right => Vec2::NEG_X,
        }
    }

    /// Pick an edge uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Build a sprite entering from a random edge
pub fn spawn_at_edge<R: Rng + ?Sized>(
    id: SpriteId,
    icon: IconId,
    bounds: Bounds,
    tuning: &Tuning,
    rng: &mut R,
) -> (Sprite, Edge) {
    let radius = tuning.radius();
    let mut sprite = Sprite::new(id, icon, radius);
    sprite.rotation = rng.random::<f32>() * TAU;
    sprite.angular_vel = centered_noise(rng, tuning.spawn_spin);

    let edge = Edge::random(rng);
    let speed = tuning.min_speed + rng.random::<f32>() * (tuning.max_speed - tuning.min_speed);

    // Room along an edge once the sprite is kept fully on-canvas
    let span_x = (bounds.width - 2.0 * radius).max(0.0);
    let span_y = (bounds.height - 2.0 * radius).max(0.0);

    let along = rng.random::<f32>();
    let drift = centered_noise(rng, speed);

    match edge {
        Edge::Top => {
            sprite.pos = Vec2::new(along * span_x + radius, radius);
            sprite.vel = Vec2::new(drift, speed.abs());
        }
        Edge::Bottom => {
            sprite.pos = Vec2::new(along * span_x + radius, bounds.height - radius);
            sprite.vel = Vec2::new(drift, -speed.abs());
        }
        Edge::Left => {
            sprite.pos = Vec2::new(radius, along * span_y + radius);
            sprite.vel = Vec2::new(speed.abs(), drift);
        }
        Edge::Right => {
            sprite.pos = Vec2::new(bounds.width - radius, along * span_y + radius);
            sprite.vel = Vec2::new(-speed.abs(), drift);
        }
    }

    (sprite, edge)
}
