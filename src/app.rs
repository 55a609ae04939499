//! Frame driver
//!
//! Owns the world, the mode settings and the asset registry, and exposes the
//! small interface the controls need: spawn, freeze, drain, spin.

use crate::assets::{AssetError, AssetRegistry};
use crate::layout::{CanvasSize, fit_canvas};
use crate::pacing::FramePacer;
use crate::recorder::{RecordCommand, Recorder};
use crate::renderer::{Surface, draw_sprites};
use crate::settings::Settings;
use crate::sim::{IconId, SpriteId, StepReport, World, launch, tick};
use crate::tuning::Tuning;
use crate::ui::ControlAction;

/// Everything the running toy needs between frames
#[derive(Debug)]
pub struct App {
    pub tuning: Tuning,
    pub world: World,
    pub settings: Settings,
    pub assets: AssetRegistry,
    pub recorder: Recorder,
    pacer: FramePacer,
    canvas: CanvasSize,
}

impl App {
    /// `protocol` is the page protocol (`"https:"`, `"file:"`, ...)
    pub fn new(tuning: Tuning, canvas: CanvasSize, seed: u64, protocol: &str) -> Self {
        let assets = AssetRegistry::new(&tuning.icons);
        let pacer = FramePacer::new(tuning.pacing);
        Self {
            world: World::new(canvas.bounds(), seed),
            settings: Settings::default(),
            assets,
            recorder: Recorder::new(protocol),
            pacer,
            canvas,
            tuning,
        }
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Recompute the canvas for a new window size
    pub fn resize(&mut self, window_w: f32, window_h: f32) -> CanvasSize {
        let canvas = fit_canvas(window_w, window_h, self.tuning.aspect, self.tuning.control_space);
        if canvas != self.canvas {
            log::debug!("Canvas resized to {}x{}", canvas.width, canvas.height);
            self.canvas = canvas;
            self.world.set_bounds(canvas.bounds());
        }
        canvas
    }

    /// Add a sprite for an icon whose bitmap has loaded
    pub fn spawn(&mut self, icon: IconId) -> Result<SpriteId, AssetError> {
        self.assets.ensure_available(icon)?;
        Ok(launch(&mut self.world, icon, &self.tuning))
    }

    pub fn set_frozen(&mut self, frozen: bool) {
        self.settings.frozen = frozen;
        log::info!("Frozen: {}", frozen);
    }

    pub fn set_draining(&mut self, draining: bool) {
        self.settings.draining = draining;
        log::info!("Draining: {}", draining);
    }

    pub fn set_spin_factor(&mut self, spin_factor: f32) -> f32 {
        self.settings.set_spin_factor(spin_factor, self.tuning.max_spin_factor)
    }

    /// Apply a control action. Returns a command when the recorder must act.
    pub fn apply(&mut self, action: ControlAction) -> Option<RecordCommand> {
        match action {
            ControlAction::Launch(icon) => {
                if let Err(e) = self.spawn(icon) {
                    log::warn!("{}", e);
                }
                None
            }
            ControlAction::ToggleFreeze => {
                self.set_frozen(!self.settings.frozen);
                None
            }
            ControlAction::ToggleDrain => {
                self.set_draining(!self.settings.draining);
                None
            }
            ControlAction::SetSpin(value) => {
                self.set_spin_factor(value);
                None
            }
            ControlAction::ToggleRecord => Some(self.recorder.toggle()),
        }
    }

    /// Record a finished image load. Returns true when the loop should start.
    pub fn image_loaded(&mut self, icon: IconId) -> bool {
        self.assets.mark_loaded(icon)
    }

    /// Record a failed image load. Returns true when the loop should start.
    pub fn image_failed(&mut self, icon: IconId) -> bool {
        self.assets.mark_failed(icon)
    }

    /// True once, when there was nothing to load at all
    pub fn ready_without_images(&mut self) -> bool {
        self.assets.poll_release()
    }

    /// Run one display refresh: clear, step (unless frozen), draw
    pub fn frame<S: Surface + ?Sized>(&mut self, now_ms: f64, surface: &mut S) -> StepReport {
        surface.clear(self.world.bounds);

        let steps = self.pacer.advance(now_ms);
        let mut report = StepReport::default();
        for _ in 0..steps.count {
            let step = tick(&mut self.world, &self.settings, &self.tuning, steps.dt);
            report.stepped |= step.stepped;
            report.wall_hits += step.wall_hits;
            report.contacts += step.contacts;
        }

        draw_sprites(surface, &self.world.sprites);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{IconEntry, IconManifest};
    use crate::renderer::RecordingSurface;

    fn app() -> App {
        let canvas = CanvasSize { width: 800, height: 450 };
        App::new(Tuning::default(), canvas, 42, "https:")
    }

    #[test]
    fn test_spawn_requires_loaded_image() {
        let mut app = app();
        assert!(matches!(app.spawn(IconId(0)), Err(AssetError::NotLoaded(_))));

        app.image_loaded(IconId(0));
        assert!(app.spawn(IconId(0)).is_ok());
        assert_eq!(app.world.sprites.len(), 1);
    }

    #[test]
    fn test_launch_of_failed_image_is_noop() {
        let mut app = app();
        app.image_failed(IconId(1));
        assert_eq!(app.apply(ControlAction::Launch(IconId(1))), None);
        assert!(app.world.sprites.is_empty());
    }

    #[test]
    fn test_barrier_starts_once() {
        let mut app = app();
        let mut starts = 0;
        for i in 0..7u16 {
            let done = if i % 2 == 0 {
                app.image_loaded(IconId(i))
            } else {
                app.image_failed(IconId(i))
            };
            starts += done as u32;
        }
        assert_eq!(starts, 1);
        assert!(!app.ready_without_images());
    }

    #[test]
    fn test_empty_manifest_ready_immediately() {
        let tuning = Tuning {
            icons: IconManifest::new(vec![]),
            ..Default::default()
        };
        let mut app = App::new(tuning, CanvasSize { width: 800, height: 450 }, 1, "https:");
        assert!(app.ready_without_images());
        assert!(!app.ready_without_images());
    }

    #[test]
    fn test_actions_toggle_modes() {
        let mut app = app();
        app.apply(ControlAction::ToggleFreeze);
        app.apply(ControlAction::ToggleDrain);
        app.apply(ControlAction::SetSpin(0.07));
        assert!(app.settings.frozen);
        assert!(app.settings.draining);
        assert_eq!(app.settings.spin_factor, 0.07);

        app.apply(ControlAction::ToggleFreeze);
        assert!(!app.settings.frozen);
    }

    #[test]
    fn test_record_action_returns_command() {
        let mut app = app();
        assert_eq!(app.apply(ControlAction::ToggleRecord), Some(RecordCommand::Start));
        assert_eq!(app.apply(ControlAction::ToggleRecord), Some(RecordCommand::Stop));
    }

    #[test]
    fn test_unvalidated_spin_limit_does_not_panic() {
        let tuning = Tuning {
            max_spin_factor: f32::NAN,
            ..Default::default()
        };
        let mut app = App::new(tuning, CanvasSize { width: 800, height: 450 }, 3, "https:");
        assert_eq!(app.set_spin_factor(0.1), 0.0);
        app.apply(ControlAction::SetSpin(0.05));
        assert_eq!(app.settings.spin_factor, 0.0);
    }

    #[test]
    fn test_resize_updates_bounds() {
        let mut app = app();
        let canvas = app.resize(1280.0, 2000.0);
        assert_eq!(canvas, CanvasSize { width: 640, height: 360 });
        assert_eq!(app.world.bounds.width, 640.0);
        assert_eq!(app.canvas(), canvas);
    }

    #[test]
    fn test_frame_draws_every_sprite() {
        let tuning = Tuning {
            icons: IconManifest::new(vec![IconEntry::new("One", "one.png")]),
            ..Default::default()
        };
        let mut app = App::new(tuning, CanvasSize { width: 800, height: 450 }, 9, "https:");
        assert!(app.image_loaded(IconId(0)));
        for _ in 0..3 {
            app.spawn(IconId(0)).unwrap();
        }

        let mut surface = RecordingSurface::new();
        let report = app.frame(0.0, &mut surface);
        assert!(report.stepped);
        assert_eq!(surface.frames, 1);
        assert_eq!(surface.last_frame().len(), 4);
    }
}
