//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `platformer_game::game::configure_headless` to install gameplay plugins.
//! - every `app.update()` advances time by exactly one fixed tick.

#![allow(dead_code)]

use std::time::Duration;

use avian2d::prelude::*;
use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use platformer_game::plugins::level::{Level, LevelData, Marker, MarkerKind};
use platformer_game::plugins::player::{Player, PlayerInput};

/// Default fixed timestep (64 Hz).
pub const TICK: Duration = Duration::from_micros(15_625);

pub fn app_headless() -> App {
    let mut app = App::new();

    // Add AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(TICK));

    platformer_game::game::configure_headless(&mut app);
    app.finish();
    app.cleanup();
    app
}

/// Headless app playing `level` instead of the built-in one.
pub fn app_with_level(level: Level) -> App {
    let mut app = App::new();
    app.insert_resource(level);
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(TICK));

    platformer_game::game::configure_headless(&mut app);
    app.finish();
    app.cleanup();
    app
}

/// Enter the level and let the player settle on the floor.
pub fn start(app: &mut App) {
    tick(app, 10);
}

pub fn tick(app: &mut App, n: usize) {
    for _ in 0..n {
        app.update();
    }
}

/// `columns` wide, six rows tall: walls left and right, a one-tile floor with a
/// three-tile pit starting at `pit_column` (if any). Floor top is y = 36.
pub fn flat_level(columns: usize, pit_column: Option<usize>, markers: Vec<Marker>) -> Level {
    let wall_row = |fill: char| {
        let mut row = String::from("#");
        row.extend(std::iter::repeat_n(fill, columns - 2));
        row.push('#');
        row
    };

    let mut rows: Vec<String> = (0..5).map(|_| wall_row('.')).collect();
    let mut floor: Vec<char> = wall_row('#').chars().collect();
    if let Some(pit) = pit_column {
        for c in pit..pit + 3 {
            floor[c] = '.';
        }
    }
    rows.push(floor.into_iter().collect());

    Level::from_data(LevelData { tile_size: 36.0, rows, markers }).expect("test level is valid")
}

/// Floor-standing height for a marker in `flat_level`.
pub const FLOOR_Y: f32 = 54.0;

pub fn core_markers(spawn_x: f32, checkpoint_x: f32, victory_x: f32) -> Vec<Marker> {
    vec![
        Marker::new(MarkerKind::PlayerSpawn, spawn_x, FLOOR_Y),
        Marker::new(MarkerKind::CheckpointSpawn, checkpoint_x, FLOOR_Y),
        Marker::new(MarkerKind::VictoryFlag, victory_x, FLOOR_Y),
    ]
}

pub fn player(app: &mut App) -> Entity {
    app.world_mut()
        .query_filtered::<Entity, With<Player>>()
        .single(app.world())
        .expect("exactly one player")
}

pub fn player_position(app: &mut App) -> Vec2 {
    let e = player(app);
    app.world().get::<Transform>(e).unwrap().translation.truncate()
}

/// Move the player (and its physics position) without simulating the path.
pub fn teleport_player(app: &mut App, at: Vec2) {
    let e = player(app);
    let world = app.world_mut();
    let mut tf = world.get_mut::<Transform>(e).unwrap();
    tf.translation.x = at.x;
    tf.translation.y = at.y;
    if let Some(mut position) = world.get_mut::<Position>(e) {
        position.0 = at;
    }
    world.get_mut::<LinearVelocity>(e).unwrap().0 = Vec2::ZERO;
}

pub fn set_input(app: &mut App, input: PlayerInput) {
    app.world_mut().insert_resource(input);
}

pub fn count<C: Component>(app: &mut App) -> usize {
    app.world_mut().query::<&C>().iter(app.world()).count()
}
