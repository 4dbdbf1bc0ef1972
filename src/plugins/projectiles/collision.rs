use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use super::components::{BulletState, PooledBullet};
use crate::common::layers::Layer;
use crate::plugins::enemies::{Boss, Enemy};
use crate::plugins::feedback::{ParticleBurst, SoundCue};

pub const BOSS_HIT_BURST: u32 = 5;

#[derive(Clone, Copy, Debug)]
struct CollisionTarget {
    collider: Entity,
    body: Option<Entity>,
}

impl CollisionTarget {
    #[inline]
    fn gameplay_owner(self) -> Entity {
        self.body.unwrap_or(self.collider)
    }
}

#[inline]
fn targets(ev: &CollisionStart) -> (CollisionTarget, CollisionTarget) {
    (
        CollisionTarget {
            collider: ev.collider1,
            body: ev.body1,
        },
        CollisionTarget {
            collider: ev.collider2,
            body: ev.body2,
        },
    )
}

#[inline]
fn is_in_layer(layers: &CollisionLayers, layer: Layer) -> bool {
    layers.memberships.has_all(layer)
}

/// Resolve bullet hits against level geometry, enemies and bosses.
///
/// Each bullet resolves at most one hit per tick, and a hostile killed this tick
/// is not killed (or scored) again by a second bullet.
pub fn process_player_bullet_collisions(
    mut commands: Commands,
    mut started: MessageReader<CollisionStart>,
    mut q_bullets: Query<&mut BulletState, With<PooledBullet>>,
    q_layers: Query<&CollisionLayers>,
    q_enemies: Query<(), With<Enemy>>,
    mut q_bosses: Query<(&mut Boss, &Transform)>,
    mut bursts: MessageWriter<ParticleBurst>,
    mut sounds: MessageWriter<SoundCue>,
    mut seen: Local<HashSet<Entity>>,
    mut killed: Local<HashSet<Entity>>,
) {
    seen.clear();
    killed.clear();

    for ev in started.read() {
        let (t1, t2) = targets(ev);

        let b1 = q_bullets.contains(t1.collider);
        let b2 = q_bullets.contains(t2.collider);
        if !(b1 ^ b2) {
            continue;
        }
        let (bullet_side, other_side) = if b1 { (t1, t2) } else { (t2, t1) };

        let Ok(mut state) = q_bullets.get_mut(bullet_side.collider) else {
            continue;
        };
        if *state != BulletState::Active || seen.contains(&bullet_side.collider) {
            continue;
        }

        let target = other_side.gameplay_owner();
        if killed.contains(&target) {
            continue;
        }

        if let Ok((mut boss, tf)) = q_bosses.get_mut(target) {
            seen.insert(bullet_side.collider);
            *state = BulletState::PendingReturn;
            bursts.write(ParticleBurst {
                position: tf.translation.truncate(),
                count: BOSS_HIT_BURST,
            });
            if boss.take_hit() {
                info!("boss defeated");
                killed.insert(target);
                commands.entity(target).despawn();
                sounds.write(SoundCue::EnemyDeath);
            } else {
                sounds.write(SoundCue::BossHit);
            }
            continue;
        }

        if q_enemies.contains(target) {
            seen.insert(bullet_side.collider);
            *state = BulletState::PendingReturn;
            killed.insert(target);
            commands.entity(target).despawn();
            sounds.write(SoundCue::EnemyDeath);
            continue;
        }

        let Ok(other_layers) = q_layers.get(other_side.collider) else {
            continue;
        };
        if is_in_layer(other_layers, Layer::World) {
            seen.insert(bullet_side.collider);
            *state = BulletState::PendingReturn;
        }
    }
}
