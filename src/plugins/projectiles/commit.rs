//! Return commit: recycle bullets back into the pool.
//!
//! This system owns the *Inactive invariants*: hidden, zero velocity, empty
//! collision filters. Everything else only marks bullets `PendingReturn`.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::components::{BulletEntity, BulletState, PooledBullet};
use super::pool::{BulletPool, inactive_bullet_layers};
use crate::plugins::level::Level;

pub fn return_to_pool_commit(
    mut pool: ResMut<BulletPool>,
    mut q: Query<
        (
            Entity,
            &mut BulletState,
            &mut Visibility,
            &mut LinearVelocity,
            &mut CollisionLayers,
        ),
        With<PooledBullet>,
    >,
) {
    for (e, mut state, mut vis, mut vel, mut layers) in &mut q {
        if *state != BulletState::PendingReturn {
            continue;
        }

        *state = BulletState::Inactive;
        *vis = Visibility::Hidden;
        vel.0 = Vec2::ZERO;
        *layers = inactive_bullet_layers();

        pool.push_free(BulletEntity(e));
    }
}

/// Bullets that leave the level go back to the pool.
pub fn return_out_of_bounds(
    level: Res<Level>,
    mut q: Query<(&Transform, &mut BulletState), With<PooledBullet>>,
) {
    let bounds = level.bounds();
    for (tf, mut state) in &mut q {
        if *state == BulletState::Active && !bounds.contains(tf.translation.truncate()) {
            *state = BulletState::PendingReturn;
        }
    }
}

/// Respawn: every live bullet heads back to the pool.
pub fn recall_live_bullets(mut q: Query<&mut BulletState, With<PooledBullet>>) {
    for mut state in &mut q {
        if *state == BulletState::Active {
            *state = BulletState::PendingReturn;
        }
    }
}
