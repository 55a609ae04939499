//! World state
//!
//! The sprite list is append-only: sprites live for the whole session.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::sprite::{IconId, Sprite, SpriteId};

/// Canvas extent in pixels. The origin is the top-left corner and +y points down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether a circle lies entirely inside (touching counts as inside)
    pub fn contains_circle(&self, pos: Vec2, radius: f32) -> bool {
        pos.x - radius >= 0.0
            && pos.x + radius <= self.width
            && pos.y - radius >= 0.0
            && pos.y + radius <= self.height
    }
}

/// All simulated state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub bounds: Bounds,
    /// Active sprites in spawn order
    pub sprites: Vec<Sprite>,
    /// Physics steps taken (frozen frames do not count)
    pub steps: u64,
    /// Generator state, so a restored world continues the same stream
    rng: Pcg32,
    next_id: u32,
}

impl World {
    pub fn new(bounds: Bounds, seed: u64) -> Self {
        Self {
            seed,
            bounds,
            sprites: Vec::new(),
            steps: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new sprite ID
    pub fn next_sprite_id(&mut self) -> SpriteId {
        let id = SpriteId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Split borrow of sprites and RNG for the per-frame passes
    pub fn parts_mut(&mut self) -> (&mut [Sprite], &mut Pcg32, Bounds) {
        (self.sprites.as_mut_slice(), &mut self.rng, self.bounds)
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Count sprites showing a given icon
    pub fn count_icon(&self, icon: IconId) -> usize {
        self.sprites.iter().filter(|s| s.icon == icon).count()
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.id == id)
    }
}
