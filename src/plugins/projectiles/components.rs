use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy)]
pub struct PooledBullet;

/// Typed handle for entities that live in the bullet pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulletEntity(pub Entity);

#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BulletState {
    #[default]
    Inactive,
    Active,
    /// Hit something or left the level; the commit system recycles it this tick.
    PendingReturn,
}

impl BulletState {
    #[inline]
    pub fn is_live(self) -> bool {
        !matches!(self, BulletState::Inactive)
    }
}
