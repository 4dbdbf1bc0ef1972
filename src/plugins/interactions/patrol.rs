//! Patrolling bodies (enemies, bosses, moving platforms) and their bounce triggers.
//!
//! A patrol moves at constant horizontal speed and turns around on the first
//! tick it overlaps a trigger it is heading toward. Heading away from a trigger
//! it is still overlapping is ignored, so each contact flips it exactly once.

use avian2d::prelude::*;
use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use super::{Interaction, PairRule, Pairing};
use crate::common::{
    geometry::Hitbox, layers::Layer, movement::Facing, state::GameState, tunables::Tunables,
};
use crate::plugins::level::Level;
use crate::plugins::player::Player;

/// Feet may float this far above a platform top and still ride it.
pub const CARRY_ABOVE: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceTarget {
    Enemy,
    Platform,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Patrol {
    pub speed: f32,
    /// -1 left, +1 right.
    pub direction: f32,
    pub responds_to: BounceTarget,
}

impl Patrol {
    /// Patrols start out heading left.
    pub fn new(speed: f32, responds_to: BounceTarget) -> Self {
        Self { speed, direction: -1.0, responds_to }
    }

    #[inline]
    pub fn velocity_x(&self) -> f32 {
        self.speed * self.direction
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BounceTrigger {
    pub target: BounceTarget,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct MovingPlatform;

#[inline]
pub fn heading_toward(patrol_x: f32, direction: f32, trigger_x: f32) -> bool {
    (trigger_x - patrol_x) * direction > 0.0
}

/// Resting on top: horizontally over the platform, feet near its top, not rising.
pub fn is_riding(player: &Aabb2d, vertical_velocity: f32, platform: &Aabb2d, below_tolerance: f32) -> bool {
    let over = player.max.x > platform.min.x && player.min.x < platform.max.x;
    let feet = player.min.y;
    let top = platform.max.y;
    over && feet >= top - below_tolerance && feet <= top + CARRY_ABOVE && vertical_velocity <= 0.5
}

pub fn bounce_trigger(target: BounceTarget, at: Vec2, size: Vec2) -> impl Bundle {
    (
        Name::new("BounceTrigger"),
        BounceTrigger { target },
        Hitbox::from_size(size),
        Transform::from_translation(at.extend(0.0)),
        DespawnOnExit(GameState::InGame),
    )
}

pub(crate) fn spawn_moving_platforms(mut commands: Commands, level: Res<Level>, tunables: Res<Tunables>) {
    for rect in &level.moving_tiles {
        let size = rect.size();
        commands.spawn((
            (
                Name::new("MovingPlatform"),
                MovingPlatform,
                Patrol::new(tunables.platform_speed, BounceTarget::Platform),
                Pairing(PairRule::PlayerPlatform),
                Hitbox::from_size(size),
            ),
            (
                RigidBody::Kinematic,
                Collider::rectangle(size.x, size.y),
                CollisionLayers::new(Layer::World, [Layer::Player, Layer::Enemy, Layer::PlayerBullet]),
                LinearVelocity::ZERO,
            ),
            Sprite {
                color: Color::srgb(0.5, 0.5, 0.6),
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(rect.center().extend(1.0)),
            DespawnOnExit(GameState::InGame),
        ));
    }

    for rect in &level.tile_bouncers {
        commands.spawn(bounce_trigger(BounceTarget::Platform, rect.center(), rect.size()));
    }
}

pub(crate) fn apply_patrol_velocity(mut q: Query<(&Patrol, &mut LinearVelocity)>) {
    for (patrol, mut vel) in &mut q {
        vel.x = patrol.velocity_x();
    }
}

pub(crate) fn reverse_on_bounce_triggers(
    mut interactions: MessageReader<Interaction>,
    q_triggers: Query<&Transform, (With<BounceTrigger>, Without<Patrol>)>,
    mut q_patrols: Query<(&Transform, &mut Patrol, &mut LinearVelocity, Option<&mut Facing>)>,
) {
    for hit in interactions.read().filter(|i| i.rule == PairRule::PatrolBouncer) {
        let Ok(tf_trigger) = q_triggers.get(hit.b) else {
            continue;
        };
        let Ok((tf, mut patrol, mut vel, facing)) = q_patrols.get_mut(hit.a) else {
            continue;
        };
        if !heading_toward(tf.translation.x, patrol.direction, tf_trigger.translation.x) {
            continue;
        }

        patrol.direction = -patrol.direction;
        vel.x = patrol.velocity_x();
        if let Some(mut facing) = facing {
            facing.set_if_neq(Facing::from_sign(patrol.direction));
        }
    }
}

pub(crate) fn carry_riders(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut interactions: MessageReader<Interaction>,
    q_platforms: Query<(&Transform, &Hitbox, &LinearVelocity), (With<MovingPlatform>, Without<Player>)>,
    mut q_player: Query<(&mut Transform, &Hitbox, &LinearVelocity, Option<&mut Position>), With<Player>>,
) {
    let dt = time.delta_secs();
    for hit in interactions.read().filter(|i| i.rule == PairRule::PlayerPlatform) {
        let Ok((tf_platform, hitbox_platform, vel_platform)) = q_platforms.get(hit.b) else {
            continue;
        };
        let Ok((mut tf, hitbox, vel, position)) = q_player.get_mut(hit.a) else {
            continue;
        };

        let riding = is_riding(
            &hitbox.aabb_at(&tf),
            vel.y,
            &hitbox_platform.aabb_at(tf_platform),
            tunables.platform_carry_tolerance,
        );
        if !riding {
            continue;
        }

        let dx = vel_platform.x * dt;
        tf.translation.x += dx;
        if let Some(mut position) = position {
            position.0.x += dx;
        }
    }
}
