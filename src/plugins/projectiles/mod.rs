//! Projectiles plugin: the ammo-gated shot, pooled bullets and their hits.
//!
//! ```text
//! FixedUpdate (Fire, while alive)
//!   request_player_bullets      PlayerInput.fire_pressed + ammo > 0 -> SpawnBulletRequest
//!   allocate_bullets_from_pool  debit ammo, pop pool (refund if empty), activate, Shot cue
//!
//! FixedPostUpdate
//!   (Avian emits CollisionStart)
//!   Resolve: process_player_bullet_collisions  world / enemy / boss -> PendingReturn
//!            return_out_of_bounds              left the level     -> PendingReturn
//!   Commit:  return_to_pool_commit             PendingReturn -> Inactive, back on the free list
//! ```
//!
//! Producers never touch `BulletPool`; the allocator pops and the commit pushes.
//! Bullets are never despawned during play: inactive ones keep every component
//! and are disabled through empty collision filters, so the pool causes no
//! archetype moves.

pub mod allocator;
pub mod collision;
pub mod commit;
pub mod components;
pub mod messages;
pub mod pool;
pub mod request;

use bevy::prelude::*;

use crate::common::{schedule::GameplaySystems, state::GameState, tunables::Tunables};
use crate::plugins::lifecycle::is_alive;

pub use commit::recall_live_bullets;

pub fn plugin(app: &mut App) {
    let capacity = app.world().resource::<Tunables>().bullet_pool_capacity;

    app.insert_resource(pool::BulletPool::new(capacity))
        .add_message::<messages::SpawnBulletRequest>()
        .add_systems(OnEnter(GameState::InGame), pool::init_bullet_pool)
        .add_systems(
            FixedUpdate,
            (
                request::request_player_bullets,
                allocator::allocate_bullets_from_pool,
            )
                .chain()
                .in_set(GameplaySystems::Fire)
                .run_if(is_alive),
        )
        .add_systems(
            FixedPostUpdate,
            (
                collision::process_player_bullet_collisions,
                commit::return_out_of_bounds,
            )
                .chain()
                .in_set(GameplaySystems::Resolve),
        )
        .add_systems(
            FixedPostUpdate,
            commit::return_to_pool_commit.in_set(GameplaySystems::Commit),
        );
}

#[cfg(test)]
mod tests;
