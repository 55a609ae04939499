//! Icon Bounce - a bouncing-icon screensaver toy
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, forces, collisions)
//! - `renderer`: Drawing-surface abstraction
//! - `assets`: Icon manifest and image load barrier
//! - `app`: Frame driver tying simulation, controls and rendering together
//! - `tuning`: Data-driven physics constants

pub mod app;
pub mod assets;
pub mod layout;
pub mod pacing;
pub mod recorder;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use app::App;
pub use assets::{AssetError, AssetRegistry, IconEntry, IconManifest, LoadBarrier};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Default tuning constants.
///
/// Velocities are in pixels per nominal frame, so every per-frame constant
/// is applied as-is when `dt == 1.0`.
pub mod consts {
    /// Icon bitmap size in pixels (sprites collide as circles of half this)
    pub const ICON_SIZE: f32 = 100.0;

    /// Per-frame random velocity noise while not draining
    pub const JIGGLE_STRENGTH: f32 = 0.1;

    /// Spawn speed range (pixels/frame)
    pub const MIN_SPEED: f32 = 1.0;
    pub const MAX_SPEED: f32 = 3.0;

    /// Random perturbation added to a reflected wall velocity
    pub const WALL_RANDOMNESS: f32 = 0.5;

    /// Drain mode: downward acceleration (pixels/frame²) and drag factor
    pub const DRAIN_GRAVITY: f32 = 0.15;
    pub const DRAIN_DRAG: f32 = 0.97;

    /// Width of the initial angular velocity range (radians/frame)
    pub const SPAWN_SPIN: f32 = 0.04;
    /// Sprite-sprite spin kicks are this much stronger than wall kicks
    pub const PAIR_SPIN_SCALE: f32 = 4.0;
    /// Upper bound of the spin slider
    pub const MAX_SPIN_FACTOR: f32 = 0.2;

    /// Canvas aspect ratio (16:9)
    pub const ASPECT: f32 = 16.0 / 9.0;
    /// Vertical space reserved below the canvas for the controls
    pub const CONTROL_SPACE: f32 = 80.0;

    /// One nominal frame (60 Hz) in milliseconds
    pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Fixed-step integration delta, in nominal frames
    pub const FRAME_DT: f32 = 1.0;
    /// Maximum substeps per refresh to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
}

/// Uniform sample in `[-0.5, 0.5)` scaled by `magnitude`
#[inline]
pub fn centered_noise<R: rand::Rng + ?Sized>(rng: &mut R, magnitude: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * magnitude
}
