//! Spawn consumer: debit the ledger and activate bullets from the pool.
//!
//! The free list only ever holds pooled bullet entities, so a lookup miss is a
//! bug and fails loudly. An empty pool is a capacity decision: the round is
//! refunded and the request dropped.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::components::{BulletEntity, BulletState, PooledBullet};
use super::messages::SpawnBulletRequest;
use super::pool::{BulletPool, active_bullet_layers};
use crate::plugins::feedback::SoundCue;
use crate::plugins::hud::AmmoLedger;

pub fn allocate_bullets_from_pool(
    mut pool: ResMut<BulletPool>,
    mut ledger: ResMut<AmmoLedger>,
    mut reader: MessageReader<SpawnBulletRequest>,
    mut sounds: MessageWriter<SoundCue>,
    mut q: Query<
        (
            &mut BulletState,
            &mut Transform,
            Option<&mut Position>,
            &mut LinearVelocity,
            &mut Visibility,
            &mut CollisionLayers,
        ),
        With<PooledBullet>,
    >,
) {
    for req in reader.read() {
        if !ledger.try_consume() {
            continue;
        }
        let Some(BulletEntity(e)) = pool.pop_free() else {
            ledger.refund();
            debug!("bullet pool exhausted, shot dropped");
            continue;
        };

        let (mut state, mut tf, position, mut vel, mut vis, mut layers) = q
            .get_mut(e)
            .expect("BulletPool contained an entity missing pooled bullet components");

        *state = BulletState::Active;
        tf.translation.x = req.pos.x;
        tf.translation.y = req.pos.y;
        if let Some(mut position) = position {
            position.0 = req.pos;
        }
        vel.0 = req.vel;
        *vis = Visibility::Visible;
        *layers = active_bullet_layers();

        sounds.write(SoundCue::Shot);
    }
}
