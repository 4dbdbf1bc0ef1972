mod common;

use avian2d::prelude::*;
use bevy::prelude::*;

use platformer_game::plugins::hud::{AmmoIcon, AmmoLedger};
use platformer_game::plugins::interactions::pickups::{item_box_layers_pass_through, item_box_layers_solid};
use platformer_game::plugins::interactions::{BoxBounce, ItemBox};
use platformer_game::plugins::level::{Marker, MarkerKind};
use platformer_game::plugins::player::PlayerInput;

const SPAWN_X: f32 = 90.0;
/// Box bottom sits 60 above the standing player's head (y = 70).
const BOX_Y: f32 = 148.0;

fn box_app() -> App {
    let mut markers = common::core_markers(SPAWN_X, 1000.0, 1050.0);
    markers.push(Marker::new(MarkerKind::ItemBox, SPAWN_X, BOX_Y));

    let mut app = common::app_with_level(common::flat_level(32, None, markers));
    common::start(&mut app);
    app
}

fn item_box(app: &mut App) -> (ItemBox, BoxBounce, CollisionLayers) {
    app.world_mut()
        .query::<(&ItemBox, &BoxBounce, &CollisionLayers)>()
        .single(app.world())
        .map(|(b, bounce, layers)| (*b, *bounce, *layers))
        .unwrap()
}

fn jump_once(app: &mut App) {
    common::set_input(app, PlayerInput { jump_pressed: true, jump_held: true, ..default() });
    common::tick(app, 1);
    common::set_input(app, PlayerInput { jump_held: true, ..default() });
}

fn ammo(app: &App) -> u32 {
    app.world().resource::<AmmoLedger>().count()
}

#[test]
fn head_bump_opens_the_box_once() {
    let mut app = box_app();
    assert!(!item_box(&mut app).0.activated);
    assert_eq!(ammo(&app), 0);

    jump_once(&mut app);
    let mut opened = false;
    for _ in 0..60 {
        common::tick(&mut app, 1);
        let (b, bounce, layers) = item_box(&mut app);
        if b.activated {
            assert!(bounce.0.is_some(), "box opened without bouncing");
            assert_eq!(layers, item_box_layers_pass_through());
            opened = true;
            break;
        }
    }
    assert!(opened, "head bump never opened the box");
    assert_eq!(ammo(&app), 1);

    common::set_input(&mut app, PlayerInput::default());
    common::tick(&mut app, 1);
    assert_eq!(common::count::<AmmoIcon>(&mut app), 1);

    // The bounce ends and the box is solid again.
    common::tick(&mut app, 40);
    let (b, bounce, layers) = item_box(&mut app);
    assert!(b.activated);
    assert_eq!(bounce.0, None);
    assert_eq!(layers, item_box_layers_solid());

    // An open box pays out nothing more.
    jump_once(&mut app);
    common::tick(&mut app, 60);
    common::set_input(&mut app, PlayerInput::default());
    common::tick(&mut app, 1);
    assert_eq!(ammo(&app), 1);
    assert_eq!(common::count::<AmmoIcon>(&mut app), 1);
}

#[test]
fn box_out_of_reach_stays_closed() {
    let mut markers = common::core_markers(SPAWN_X, 1000.0, 1050.0);
    markers.push(Marker::new(MarkerKind::ItemBox, SPAWN_X + 36.0 * 6.0, BOX_Y));
    let mut app = common::app_with_level(common::flat_level(32, None, markers));
    common::start(&mut app);

    jump_once(&mut app);
    common::tick(&mut app, 60);

    assert!(!item_box(&mut app).0.activated);
    assert_eq!(ammo(&app), 0);
    assert_eq!(common::count::<AmmoIcon>(&mut app), 0);
}
