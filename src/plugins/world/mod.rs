//! World plugin: static level geometry and tile visuals.
//!
//! Solid tiles become one static collider per horizontal run. Water, ladder and
//! spike tiles are drawn only; their overlap volumes live on `Level::sensors`.
//! Water and the victory flag shimmer on a shared 250 ms clock.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState};
use crate::plugins::level::{Level, TileKind};

const SOLID_COLOR: Color = Color::srgb(0.25, 0.27, 0.33);
const LADDER_COLOR: Color = Color::srgb(0.55, 0.4, 0.2);
const SPIKE_COLOR: Color = Color::srgb(0.8, 0.8, 0.85);
const WATER_COLORS: [Color; 2] = [Color::srgba(0.15, 0.35, 0.8, 0.7), Color::srgba(0.2, 0.45, 0.9, 0.7)];
const MARKER_COLOR: Color = Color::srgb(0.3, 0.9, 0.4);
const FLAG_COLORS: [Color; 2] = [Color::srgb(0.3, 0.9, 0.4), Color::srgb(0.95, 0.95, 0.3)];

/// Water and the victory flag swap between their two colours at this period.
pub const SHIMMER_PERIOD_SECS: f32 = 0.25;

#[derive(Component, Debug, Clone, Copy)]
pub struct Solid;

#[derive(Component, Debug, Clone, Copy)]
pub struct WaterTile {
    /// Neighbouring tiles start on opposite colours.
    pub phase: usize,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct FlagPole;

#[derive(Resource, Debug, Clone)]
pub struct TileShimmer {
    pub timer: Timer,
    pub frame: usize,
}

impl Default for TileShimmer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(SHIMMER_PERIOD_SECS, TimerMode::Repeating),
            frame: 0,
        }
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<TileShimmer>()
        .add_systems(OnEnter(GameState::InGame), (spawn_solids, spawn_tile_visuals, spawn_markers))
        .add_systems(Update, shimmer_tiles.run_if(in_state(GameState::InGame)));
}

pub fn solid_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::World, [Layer::Player, Layer::Enemy, Layer::PlayerBullet])
}

pub(crate) fn spawn_solids(mut commands: Commands, level: Res<Level>) {
    for (i, run) in level.solids.iter().enumerate() {
        let size = run.size();
        commands.spawn((
            Name::new(format!("Solid{i}")),
            Solid,
            Sprite {
                color: SOLID_COLOR,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(run.center().extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            solid_layers(),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

fn spawn_tile_visuals(mut commands: Commands, level: Res<Level>) {
    let ts = level.tile_size;

    for (column, row) in level.tiles_of(TileKind::Water) {
        commands.spawn((
            WaterTile { phase: column + row },
            Sprite::from_color(WATER_COLORS[(column + row) % 2], Vec2::splat(ts)),
            Transform::from_translation(level.tile_center(column, row).extend(6.0)),
            DespawnOnExit(GameState::InGame),
        ));
    }

    for (column, row) in level.tiles_of(TileKind::Climb) {
        commands.spawn((
            Sprite::from_color(LADDER_COLOR, Vec2::new(ts * 0.6, ts)),
            Transform::from_translation(level.tile_center(column, row).extend(-1.0)),
            DespawnOnExit(GameState::InGame),
        ));
    }

    for (column, row) in level.tiles_of(TileKind::Spikes) {
        let center = level.tile_center(column, row) - Vec2::Y * ts * 0.25;
        commands.spawn((
            Sprite::from_color(SPIKE_COLOR, Vec2::new(ts, ts * 0.5)),
            Transform::from_translation(center.extend(0.0)),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

fn spawn_markers(mut commands: Commands, level: Res<Level>) {
    let pole = Vec2::new(6.0, level.tile_size * 2.0);
    let lift = Vec2::Y * level.tile_size * 0.5;

    commands.spawn((
        Name::new("Checkpoint"),
        Sprite::from_color(MARKER_COLOR, pole),
        Transform::from_translation((level.checkpoint + lift).extend(-1.0)),
        DespawnOnExit(GameState::InGame),
    ));
    commands.spawn((
        Name::new("VictoryFlag"),
        FlagPole,
        Sprite::from_color(FLAG_COLORS[0], pole),
        Transform::from_translation((level.victory + lift).extend(-1.0)),
        DespawnOnExit(GameState::InGame),
    ));
}

pub(crate) fn shimmer_tiles(
    time: Res<Time>,
    mut shimmer: ResMut<TileShimmer>,
    mut q_water: Query<(&WaterTile, &mut Sprite), Without<FlagPole>>,
    mut q_flags: Query<&mut Sprite, With<FlagPole>>,
) {
    if !shimmer.timer.tick(time.delta()).just_finished() {
        return;
    }
    shimmer.frame = (shimmer.frame + 1) % 2;

    for (tile, mut sprite) in &mut q_water {
        sprite.color = WATER_COLORS[(tile.phase + shimmer.frame) % 2];
    }
    for mut sprite in &mut q_flags {
        sprite.color = FLAG_COLORS[shimmer.frame];
    }
}
