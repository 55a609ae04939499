//! Collision detection and response
//!
//! Walls reflect with a little random jitter so bounces never become
//! perfectly periodic. Sprite pairs exchange the normal component of their
//! relative velocity (equal masses, fully elastic) and are always pushed
//! apart so they never stay interpenetrated.

use glam::Vec2;
use rand::Rng;

use super::spawn::Edge;
use super::sprite::Sprite;
use super::state::Bounds;
use crate::centered_noise;

/// Walls touched by one sprite in one pass (at most one per axis)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHits {
    pub horizontal: Option<Edge>,
    pub vertical: Option<Edge>,
}

impl WallHits {
    pub fn any(&self) -> bool {
        self.horizontal.is_some() || self.vertical.is_some()
    }

    pub fn count(&self) -> u32 {
        self.horizontal.is_some() as u32 + self.vertical.is_some() as u32
    }
}

/// Reflect a sprite off any canvas wall it crosses.
///
/// X and Y are tested independently, so a corner bounce flips both.
/// Afterwards `radius <= x <= width - radius` and likewise for y.
pub fn resolve_wall<R: Rng + ?Sized>(
    sprite: &mut Sprite,
    bounds: Bounds,
    randomness: f32,
    spin_factor: f32,
    rng: &mut R,
) -> WallHits {
    let r = sprite.radius;
    let mut hits = WallHits::default();

    if sprite.pos.x - r < 0.0 {
        sprite.pos.x = r;
        sprite.vel.x = sprite.vel.x.abs() + centered_noise(rng, randomness);
        hits.horizontal = Some(Edge::Left);
    } else if sprite.pos.x + r > bounds.width {
        sprite.pos.x = bounds.width - r;
        sprite.vel.x = -sprite.vel.x.abs() + centered_noise(rng, randomness);
        hits.horizontal = Some(Edge::Right);
    }
    if hits.horizontal.is_some() {
        sprite.angular_vel += centered_noise(rng, spin_factor);
    }

    if sprite.pos.y - r < 0.0 {
        sprite.pos.y = r;
        sprite.vel.y = sprite.vel.y.abs() + centered_noise(rng, randomness);
        hits.vertical = Some(Edge::Top);
    } else if sprite.pos.y + r > bounds.height {
        sprite.pos.y = bounds.height - r;
        sprite.vel.y = -sprite.vel.y.abs() + centered_noise(rng, randomness);
        hits.vertical = Some(Edge::Bottom);
    }
    if hits.vertical.is_some() {
        sprite.angular_vel += centered_noise(rng, spin_factor);
    }

    hits
}

/// Outcome of checking one pair of sprites
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairOutcome {
    /// Not touching
    Apart,
    /// Centers coincide exactly; no normal exists so the pair is skipped
    Coincident,
    /// Overlapping; `exchanged` is false when the pair was already separating
    Contact { exchanged: bool, overlap: f32 },
}

/// Resolve a circle-circle contact between two sprites.
///
/// Approaching pairs swap the normal component of their relative velocity
/// and receive random spin kicks of `spin_factor * spin_scale`. Any
/// overlapping pair is pushed apart by half the overlap each, along the normal.
pub fn resolve_pair<R: Rng + ?Sized>(
    a: &mut Sprite,
    b: &mut Sprite,
    spin_factor: f32,
    spin_scale: f32,
    rng: &mut R,
) -> PairOutcome {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    let min_dist = a.radius + b.radius;

    if dist >= min_dist {
        return PairOutcome::Apart;
    }
    if dist <= 0.0 {
        return PairOutcome::Coincident;
    }

    let normal = delta / dist;
    let approach = (a.vel - b.vel).dot(normal);

    let exchanged = approach > 0.0;
    if exchanged {
        let impulse: Vec2 = approach * normal;
        a.vel -= impulse;
        b.vel += impulse;

        let kick = spin_factor * spin_scale;
        a.angular_vel += centered_noise(rng, kick);
        b.angular_vel += centered_noise(rng, kick);
    }

    let overlap = (min_dist - dist) / 2.0;
    a.pos -= overlap * normal;
    b.pos += overlap * normal;

    PairOutcome::Contact { exchanged, overlap }
}

/// Check every unordered pair `(i, j)`, `i < j`, in index order.
///
/// Resolution is sequential: a sprite may be pushed by several neighbors in
/// one pass. Returns the number of pairs that were in contact.
pub fn resolve_all_pairs<R: Rng + ?Sized>(
    sprites: &mut [Sprite],
    spin_factor: f32,
    spin_scale: f32,
    rng: &mut R,
) -> u32 {
    let mut contacts = 0;
    for i in 0..sprites.len() {
        let (head, tail) = sprites.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if let PairOutcome::Contact { .. } = resolve_pair(a, b, spin_factor, spin_scale, rng) {
                contacts += 1;
            }
        }
    }
    contacts
}
