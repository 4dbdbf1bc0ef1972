use bevy::prelude::*;

use super::*;

const VIEW: Vec2 = Vec2::new(1280.0, 720.0);

#[test]
fn horizontal_follow_is_clamped_to_the_level() {
    let level = Level::builtin().unwrap();

    assert_eq!(camera_target(Vec2::new(10.0, 100.0), &level, VIEW).x, 640.0);
    assert_eq!(camera_target(Vec2::new(1500.0, 100.0), &level, VIEW).x, 1500.0);
    assert_eq!(
        camera_target(Vec2::new(level.width() - 1.0, 100.0), &level, VIEW).x,
        level.width() - 640.0
    );
}

#[test]
fn sections_of_nineteen_tiles_scroll_by_seventeen() {
    let level = Level::builtin().unwrap();
    let ts = level.tile_size;
    let first = SECTION_TILES * ts * 0.5;

    assert_eq!(camera_target(Vec2::new(800.0, 10.0), &level, VIEW).y, first);
    assert_eq!(camera_target(Vec2::new(800.0, 17.5 * ts), &level, VIEW).y, first);
    assert_eq!(camera_target(Vec2::new(800.0, 18.9 * ts), &level, VIEW).y, first);
    assert_eq!(camera_target(Vec2::new(800.0, 19.5 * ts), &level, VIEW).y, first + 17.0 * ts);
    assert_eq!(camera_target(Vec2::new(800.0, 38.5 * ts), &level, VIEW).y, first + 34.0 * ts);
    // Below the level the first page is kept.
    assert_eq!(camera_target(Vec2::new(800.0, -50.0), &level, VIEW).y, first);
}
