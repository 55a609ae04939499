//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Explicit timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod forces;
pub mod spawn;
pub mod sprite;
pub mod state;
pub mod tick;

pub use collision::{PairOutcome, WallHits, resolve_all_pairs, resolve_pair, resolve_wall};
pub use forces::ForceModel;
pub use spawn::{Edge, spawn_at_edge};
pub use sprite::{IconId, Sprite, SpriteId};
pub use state::{Bounds, World};
pub use tick::{StepReport, launch, tick};
