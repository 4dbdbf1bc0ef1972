//! Lighting plugin (Firefly) (render-only).
//!
//! A lantern follows the player, coins glow, and hostiles cast shadows. Gameplay
//! entities are decorated as they appear, so respawned coins and enemies light
//! up without the gameplay plugins knowing about Firefly.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::enemies::{Boss, ENEMY_SIZE, Enemy};
use crate::plugins::interactions::Coin;
use crate::plugins::level::Level;
use crate::plugins::player::Player;

/// Roughly one screen section across.
pub const LANTERN_RANGE: f32 = 380.0;

#[derive(Component)]
pub struct Lantern;

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<FireflyPlugin>() {
        app.add_plugins(FireflyPlugin);
    }

    app.add_systems(OnEnter(GameState::InGame), spawn_lantern)
        .add_systems(
            Update,
            (carry_lantern, light_coins, shadow_hostiles).run_if(in_state(GameState::InGame)),
        );
}

/// The lantern starts on the spawn point so the first frame is not dark.
fn spawn_lantern(mut commands: Commands, level: Res<Level>) {
    commands.spawn((
        Name::new("Lantern"),
        Lantern,
        PointLight2d {
            color: Color::srgb(0.95, 0.85, 0.65),
            radius: LANTERN_RANGE,
            ..default()
        },
        Transform::from_translation(level.spawn.extend(10.0)),
        DespawnOnExit(GameState::InGame),
    ));
}

fn carry_lantern(
    q_player: Query<&Transform, (With<Player>, Without<Lantern>)>,
    mut q_lantern: Query<&mut Transform, (With<Lantern>, Without<Player>)>,
) {
    let (Ok(tf_player), Ok(mut tf_lantern)) = (q_player.single(), q_lantern.single_mut()) else {
        return;
    };
    let at = tf_player.translation.truncate();
    tf_lantern.translation = at.extend(tf_lantern.translation.z);
}

fn light_coins(mut commands: Commands, q: Query<Entity, Added<Coin>>) {
    for e in &q {
        commands.entity(e).try_insert(PointLight2d {
            color: Color::srgb(1.0, 0.85, 0.3),
            radius: 60.0,
            ..default()
        });
    }
}

fn shadow_hostiles(mut commands: Commands, q: Query<Entity, Or<(Added<Enemy>, Added<Boss>)>>) {
    for e in &q {
        commands.entity(e).try_insert(Occluder2d::circle(ENEMY_SIZE.x * 0.5));
    }
}
