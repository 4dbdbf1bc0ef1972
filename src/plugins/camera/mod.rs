//! Camera plugin (render-only).
//!
//! Horizontally the camera follows the player, clamped so it never shows past
//! the level edges. Vertically it pages: the level is cut into sections of 19
//! tiles, and the view for section `n` sits `17 * n` tiles up, so two tiles of
//! the previous section stay visible.
//! Both axes ease toward their target by a fixed fraction per frame.
//!
//! Disjointness of the player and camera `Transform` queries is encoded with
//! `Without<...>` filters.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy::transform::TransformSystems;
use bevy::window::PrimaryWindow;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::level::Level;
use crate::plugins::player::Player;

pub const SECTION_TILES: f32 = 19.0;
pub const SCROLL_TILES: f32 = 17.0;
pub const FOLLOW_LERP: f32 = 0.1;

const FALLBACK_VIEW: Vec2 = Vec2::new(1280.0, 720.0);

#[derive(Component)]
pub struct MainCamera;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_camera)
        .add_systems(
            PostUpdate,
            follow_player
                .before(TransformSystems::Propagate)
                .run_if(in_state(GameState::InGame)),
        );
}

/// Where the camera wants to be for a player at `player`.
pub fn camera_target(player: Vec2, level: &Level, view: Vec2) -> Vec2 {
    let half_w = view.x * 0.5;
    let width = level.width();
    let x = if width <= view.x {
        width * 0.5
    } else {
        player.x.clamp(half_w, width - half_w)
    };

    let section = SECTION_TILES * level.tile_size;
    let scroll = SCROLL_TILES * level.tile_size;
    let page = (player.y / section).floor().max(0.0);
    let y = page * scroll + section * 0.5;

    Vec2::new(x, y)
}

fn spawn_camera(mut commands: Commands, level: Res<Level>) {
    let start = camera_target(level.spawn, &level, FALLBACK_VIEW);
    commands.spawn((
        Name::new("MainCamera"),
        Camera2d,
        MainCamera,
        FireflyConfig::default(),
        Transform::from_translation(start.extend(999.0)),
        DespawnOnExit(GameState::InGame),
    ));
}

fn follow_player(
    level: Res<Level>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_player: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    mut q_cam: Query<&mut Transform, (With<MainCamera>, Without<Player>)>,
) {
    let (Ok(tf_player), Ok(mut tf_cam)) = (q_player.single(), q_cam.single_mut()) else {
        return;
    };
    let view = q_window
        .single()
        .map(|w| Vec2::new(w.width(), w.height()))
        .unwrap_or(FALLBACK_VIEW);

    let target = camera_target(tf_player.translation.truncate(), &level, view);
    let current = tf_cam.translation.truncate();
    let next = current.lerp(target, FOLLOW_LERP);
    tf_cam.translation.x = next.x;
    tf_cam.translation.y = next.y;
}

#[cfg(test)]
mod tests;
