//! End-to-end frame driver scenarios

use glam::Vec2;
use icon_bounce::layout::CanvasSize;
use icon_bounce::renderer::{DrawCall, RecordingSurface};
use icon_bounce::sim::{Bounds, Edge, IconId, SpriteId, World, spawn_at_edge, tick};
use icon_bounce::ui::ControlAction;
use icon_bounce::{App, Settings, Tuning};

fn loaded_app(seed: u64) -> App {
    let mut app = App::new(
        Tuning::default(),
        CanvasSize { width: 800, height: 450 },
        seed,
        "http:",
    );
    let count = app.tuning.icons.len() as u16;
    for i in 0..count {
        app.image_loaded(IconId(i));
    }
    app
}

#[test]
fn frozen_frames_still_render() {
    let mut app = loaded_app(7);
    for i in 0..7u16 {
        app.apply(ControlAction::Launch(IconId(i)));
    }
    // Let things move a bit first
    let mut surface = RecordingSurface::new();
    for f in 0..30 {
        app.frame(f as f64 * 16.0, &mut surface);
    }

    app.apply(ControlAction::ToggleFreeze);
    let before = app.world.sprites.clone();
    surface.reset();

    for f in 30..90 {
        let report = app.frame(f as f64 * 16.0, &mut surface);
        assert!(!report.stepped);
    }

    assert_eq!(app.world.sprites, before);
    assert_eq!(surface.frames, 60);
    let drawn = surface
        .last_frame()
        .iter()
        .filter(|c| matches!(c, DrawCall::Sprite { .. }))
        .count();
    assert_eq!(drawn, 7);
}

#[test]
fn drain_pulls_sprite_down() {
    let mut app = loaded_app(11);
    app.apply(ControlAction::Launch(IconId(0)));
    {
        let sprite = &mut app.world.sprites[0];
        sprite.pos = Vec2::new(400.0, 120.0);
        sprite.vel = Vec2::new(1.5, -2.0);
    }
    app.apply(ControlAction::ToggleDrain);

    let vy0 = app.world.sprites[0].vel.y;
    let mut prev_vx = app.world.sprites[0].vel.x.abs();
    let mut surface = RecordingSurface::new();
    for f in 0..20 {
        app.frame(f as f64 * 16.0, &mut surface);
        let vx = app.world.sprites[0].vel.x.abs();
        assert!(vx <= prev_vx);
        prev_vx = vx;
    }
    assert!(app.world.sprites[0].vel.y > vy0);
}

#[test]
fn drain_settles_sprites_at_bottom() {
    let mut app = loaded_app(5);
    for i in 0..3u16 {
        app.apply(ControlAction::Launch(IconId(i)));
    }
    app.apply(ControlAction::ToggleDrain);

    let mut surface = RecordingSurface::new();
    for f in 0..1500 {
        app.frame(f as f64 * 16.0, &mut surface);
    }
    let floor = app.world.bounds.height - app.tuning.radius();
    let lowest = app
        .world
        .sprites
        .iter()
        .map(|s| s.pos.y)
        .fold(f32::MIN, f32::max);
    assert!(lowest > floor - 10.0, "lowest sprite at {}", lowest);
}

#[test]
fn wall_pass_keeps_lone_sprite_inside() {
    let tuning = Tuning::default();
    let settings = Settings {
        spin_factor: 0.1,
        ..Default::default()
    };

    // One sprite per world so no pair push can interfere
    for seed in 0..5u64 {
        let mut world = World::new(Bounds::new(800.0, 450.0), seed);
        let id = world.next_sprite_id();
        let bounds = world.bounds;
        let (mut sprite, _) = spawn_at_edge(id, IconId(0), bounds, &tuning, world.rng());
        sprite.vel *= 3.0;
        world.sprites.push(sprite);

        for _ in 0..1000 {
            tick(&mut world, &settings, &tuning, 1.0);
            let s = &world.sprites[0];
            assert!(world.bounds.contains_circle(s.pos, s.radius), "escaped at {:?}", s.pos);
        }
    }
}

#[test]
fn top_edge_spawn_on_16_by_9_canvas() {
    let tuning = Tuning {
        min_speed: 1.0,
        max_speed: 3.0,
        ..Default::default()
    };
    let bounds = Bounds::new(800.0, 450.0);
    let mut world = World::new(bounds, 1);

    let mut checked = 0;
    for n in 0..400 {
        let (sprite, edge) = spawn_at_edge(SpriteId(n), IconId(0), bounds, &tuning, world.rng());
        if edge != Edge::Top {
            continue;
        }
        let r = sprite.radius;
        assert!(0.0 <= sprite.pos.y && sprite.pos.y == r);
        assert!(sprite.vel.y > 0.0);
        assert!(sprite.pos.x >= r && sprite.pos.x <= bounds.width - r);
        checked += 1;
    }
    assert!(checked > 50);
}
