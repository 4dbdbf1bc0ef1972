//! Fire intent.
//!
//! The producer only decides *that* a shot should happen; the allocator is the
//! single writer of the pool and the ammo debit.

use bevy::prelude::*;

#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct SpawnBulletRequest {
    pub pos: Vec2,
    pub vel: Vec2,
}
