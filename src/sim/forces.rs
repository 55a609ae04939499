//! Per-frame force models
//!
//! Exactly one model acts each unfrozen frame, chosen by the drain flag.

use rand::Rng;

use super::sprite::Sprite;
use crate::centered_noise;
use crate::tuning::Tuning;

/// Force model applied before integration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForceModel {
    /// Small random velocity noise that keeps sprites lively
    Jiggle { strength: f32 },
    /// Constant downward pull plus drag on velocity and spin
    Drain { gravity: f32, drag: f32 },
}

impl ForceModel {
    pub fn select(draining: bool, tuning: &Tuning) -> Self {
        if draining {
            ForceModel::Drain {
                gravity: tuning.drain_gravity,
                drag: tuning.drain_drag,
            }
        } else {
            ForceModel::Jiggle {
                strength: tuning.jiggle_strength,
            }
        }
    }

    /// Perturb one sprite's velocity for a step of `dt` frames
    pub fn apply<R: Rng + ?Sized>(&self, sprite: &mut Sprite, dt: f32, rng: &mut R) {
        match *self {
            ForceModel::Jiggle { strength } => {
                sprite.vel.x += centered_noise(rng, strength) * dt;
                sprite.vel.y += centered_noise(rng, strength) * dt;
            }
            ForceModel::Drain { gravity, drag } => {
                sprite.vel.y += gravity * dt;
                let damping = if dt == 1.0 { drag } else { drag.powf(dt) };
                sprite.vel *= damping;
                sprite.angular_vel *= damping;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::sprite::{IconId, SpriteId};
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn sprite() -> Sprite {
        let mut s = Sprite::new(SpriteId(1), IconId(0), 50.0);
        s.pos = Vec2::new(400.0, 200.0);
        s.vel = Vec2::new(2.0, -1.0);
        s.angular_vel = 0.05;
        s
    }

    #[test]
    fn test_select() {
        let tuning = Tuning::default();
        assert!(matches!(ForceModel::select(false, &tuning), ForceModel::Jiggle { .. }));
        assert!(matches!(ForceModel::select(true, &tuning), ForceModel::Drain { .. }));
    }

    #[test]
    fn test_jiggle_is_bounded() {
        let mut rng = Pcg32::seed_from_u64(8);
        let model = ForceModel::Jiggle { strength: 0.1 };
        for _ in 0..500 {
            let mut s = sprite();
            model.apply(&mut s, 1.0, &mut rng);
            assert!((s.vel.x - 2.0).abs() <= 0.05);
            assert!((s.vel.y + 1.0).abs() <= 0.05);
            assert_eq!(s.angular_vel, 0.05);
        }
    }

    #[test]
    fn test_drain_gravity_then_drag() {
        let mut rng = Pcg32::seed_from_u64(8);
        let model = ForceModel::Drain { gravity: 0.15, drag: 0.97 };
        let mut s = sprite();
        model.apply(&mut s, 1.0, &mut rng);

        assert!((s.vel.x - 2.0 * 0.97).abs() < 1e-6);
        assert!((s.vel.y - (-1.0 + 0.15) * 0.97).abs() < 1e-6);
        assert!((s.angular_vel - 0.05 * 0.97).abs() < 1e-6);
    }

    #[test]
    fn test_drain_pulls_down_and_bleeds_horizontal() {
        let mut rng = Pcg32::seed_from_u64(8);
        let model = ForceModel::Drain { gravity: 0.15, drag: 0.97 };
        let mut s = sprite();
        let vy0 = s.vel.y;
        let mut prev_speed_x = s.vel.x.abs();

        for _ in 0..30 {
            model.apply(&mut s, 1.0, &mut rng);
            assert!(s.vel.x.abs() <= prev_speed_x);
            prev_speed_x = s.vel.x.abs();
        }
        assert!(s.vel.y > vy0);
        assert!(s.vel.y > 0.0);
    }
}
