mod common;

use avian2d::prelude::*;
use bevy::prelude::*;

use platformer_game::plugins::interactions::{MovingPlatform, Patrol};
use platformer_game::plugins::level::{Marker, MarkerKind};

const TRIGGER_LEFT: f32 = 150.0;
const TRIGGER_RIGHT: f32 = 450.0;
const PLATFORM_HALF_W: f32 = 54.0;
const TRIGGER_HALF_W: f32 = 18.0;

fn platform_app() -> App {
    let mut markers = common::core_markers(900.0, 1000.0, 1050.0);
    markers.push(Marker::sized(MarkerKind::MovingTile, 300.0, 150.0, 108.0, 18.0));
    markers.push(Marker::sized(MarkerKind::TileBouncer, TRIGGER_LEFT, 150.0, 36.0, 36.0));
    markers.push(Marker::sized(MarkerKind::TileBouncer, TRIGGER_RIGHT, 150.0, 36.0, 36.0));

    let mut app = common::app_with_level(common::flat_level(32, None, markers));
    common::tick(&mut app, 1);
    app
}

fn platform(app: &mut App) -> (Entity, f32, Patrol) {
    let (e, tf, patrol) = app
        .world_mut()
        .query_filtered::<(Entity, &Transform, &Patrol), With<MovingPlatform>>()
        .single(app.world())
        .unwrap();
    (e, tf.translation.x, *patrol)
}

#[test]
fn platform_reverses_exactly_at_trigger_overlap() {
    let mut app = platform_app();
    let step = 80.0 * common::TICK.as_secs_f32();

    let (_, _, patrol) = platform(&mut app);
    assert_eq!(patrol.velocity_x(), -80.0);

    // Run until the first reversal and check it happened on the first overlapping tick.
    let mut flipped_at = None;
    for _ in 0..200 {
        common::tick(&mut app, 1);
        let (_, x, patrol) = platform(&mut app);
        if patrol.direction > 0.0 {
            flipped_at = Some(x);
            break;
        }
    }
    let x = flipped_at.expect("platform never reversed");
    let touch_x = TRIGGER_LEFT + TRIGGER_HALF_W + PLATFORM_HALF_W;
    assert!(x <= touch_x + 1e-3, "reversed before touching: {x}");
    assert!(x > touch_x - step * 2.5, "reversed late: {x}");

    // Still overlapping for a few ticks while leaving: no second flip.
    for _ in 0..5 {
        common::tick(&mut app, 1);
        assert_eq!(platform(&mut app).2.direction, 1.0);
    }

    // And it travels to the right trigger and turns around again.
    let mut turned_back = false;
    for _ in 0..400 {
        common::tick(&mut app, 1);
        let (_, x, patrol) = platform(&mut app);
        if patrol.direction < 0.0 {
            let touch_x = TRIGGER_RIGHT - TRIGGER_HALF_W - PLATFORM_HALF_W;
            assert!(x >= touch_x - 1e-3 && x < touch_x + step * 2.5, "second reversal at {x}");
            turned_back = true;
            break;
        }
    }
    assert!(turned_back);
}

#[test]
fn platform_has_no_gravity() {
    let mut app = platform_app();
    common::tick(&mut app, 30);
    let (e, _, _) = platform(&mut app);
    let tf = app.world().get::<Transform>(e).unwrap();
    assert_eq!(tf.translation.y, 150.0);
    assert_eq!(app.world().get::<LinearVelocity>(e).unwrap().y, 0.0);
}

#[test]
fn resting_player_rides_the_platform() {
    let mut app = platform_app();
    let (_, x, _) = platform(&mut app);

    // Feet on the platform top (150 + 9).
    common::teleport_player(&mut app, Vec2::new(x, 159.0 + 17.0));
    common::tick(&mut app, 2);
    let before = common::player_position(&mut app);
    let (_, platform_before, _) = platform(&mut app);

    common::tick(&mut app, 10);
    let after = common::player_position(&mut app);
    let (_, platform_after, _) = platform(&mut app);

    let platform_moved = platform_after - platform_before;
    assert!(platform_moved < -5.0);
    assert!(
        ((after.x - before.x) - platform_moved).abs() < 2.0,
        "player moved {} while platform moved {platform_moved}",
        after.x - before.x
    );
}
