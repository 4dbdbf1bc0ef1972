//! Enemies plugin: patrolling grunts, the boss, and contact damage.
//!
//! Hostiles are transient: the life cycle despawns and rebuilds the whole set
//! (with their bounce triggers) from level data on every respawn. Bullet damage
//! is resolved by the projectiles plugin; this module only owns the data and the
//! "touching a hostile kills the player" rule.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{
    geometry::Hitbox,
    layers::Layer,
    movement::Facing,
    schedule::GameplaySystems,
    state::GameState,
    tunables::Tunables,
};
use crate::plugins::interactions::{
    Interaction, PairRule, Pairing,
    patrol::{BounceTarget, Patrol, bounce_trigger},
};
use crate::plugins::level::Level;
use crate::plugins::lifecycle::{DeathCause, DeathTrigger};
use crate::plugins::physics::ArcadeBody;

/// Body of every hostile. The boss differs only in health and colour.
pub const ENEMY_SIZE: Vec2 = Vec2::new(30.0, 30.0);

#[derive(Component, Debug, Clone, Copy)]
pub struct Enemy;

/// Unsigned, saturating: health is never observed below zero.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boss {
    pub health: u32,
}

impl Boss {
    /// Apply one bullet. Returns `true` when this hit was lethal.
    pub fn take_hit(&mut self) -> bool {
        if self.health == 0 {
            return false;
        }
        self.health -= 1;
        self.health == 0
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_scene_hostiles)
        .add_systems(
            FixedPostUpdate,
            kill_player_on_contact.in_set(GameplaySystems::Resolve),
        );
}

fn hostile_body(size: Vec2, speed: f32) -> impl Bundle {
    (
        RigidBody::Dynamic,
        Collider::rectangle(size.x, size.y),
        CollisionLayers::new(Layer::Enemy, [Layer::World, Layer::PlayerBullet]),
        LockedAxes::ROTATION_LOCKED,
        Friction::ZERO.with_combine_rule(CoefficientCombine::Min),
        LinearVelocity::ZERO,
        ArcadeBody {
            acceleration: 0.0,
            drag: 0.0,
            max_velocity: Vec2::new(speed, 1000.0),
        },
        Hitbox::from_size(size),
        Patrol::new(speed, BounceTarget::Enemy),
        Facing::Left,
        DespawnOnExit(GameState::InGame),
    )
}

/// Spawn every enemy, boss and enemy bounce trigger the level lists.
pub fn spawn_hostiles(commands: &mut Commands, level: &Level, tunables: &Tunables) {
    for &at in &level.enemy_spawns {
        commands.spawn((
            Name::new("Enemy"),
            Enemy,
            Pairing(PairRule::PlayerEnemy),
            Sprite {
                color: Color::srgb(0.9, 0.25, 0.25),
                custom_size: Some(ENEMY_SIZE),
                ..default()
            },
            Transform::from_translation(at.extend(3.0)),
            hostile_body(ENEMY_SIZE, tunables.enemy_speed),
        ));
    }

    for &at in &level.boss_spawns {
        commands.spawn((
            Name::new("Boss"),
            Boss { health: tunables.boss_health },
            Pairing(PairRule::PlayerBoss),
            Sprite {
                color: Color::srgb(0.6, 0.1, 0.45),
                custom_size: Some(ENEMY_SIZE),
                ..default()
            },
            Transform::from_translation(at.extend(3.0)),
            hostile_body(ENEMY_SIZE, tunables.enemy_speed),
        ));
    }

    let trigger_size = Vec2::splat(level.tile_size);
    for &at in &level.enemy_bouncers {
        commands.spawn(bounce_trigger(BounceTarget::Enemy, at, trigger_size));
    }
}

fn spawn_scene_hostiles(mut commands: Commands, level: Res<Level>, tunables: Res<Tunables>) {
    spawn_hostiles(&mut commands, &level, &tunables);
}

pub(crate) fn kill_player_on_contact(
    mut interactions: MessageReader<Interaction>,
    mut deaths: MessageWriter<DeathTrigger>,
) {
    for hit in interactions.read() {
        let cause = match hit.rule {
            PairRule::PlayerEnemy => DeathCause::Enemy,
            PairRule::PlayerBoss => DeathCause::Boss,
            _ => continue,
        };
        deaths.write(DeathTrigger { cause });
    }
}
