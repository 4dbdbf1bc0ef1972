use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use super::components::{BulletEntity, BulletState, PooledBullet};
use crate::common::{layers::Layer, state::GameState};

pub const BULLET_RADIUS: f32 = 4.0;

#[derive(Resource, Debug)]
pub struct BulletPool {
    free: Vec<BulletEntity>,
    capacity: usize,
}

impl BulletPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn pop_free(&mut self) -> Option<BulletEntity> {
        self.free.pop()
    }

    #[inline]
    pub fn push_free(&mut self, bullet: BulletEntity) {
        debug_assert!(self.free.len() < self.capacity, "bullet returned to a full pool");
        self.free.push(bullet);
    }
}

#[inline]
pub fn active_bullet_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::PlayerBullet, [Layer::World, Layer::Enemy])
}

/// Disabled without structural changes: empty filters collide with nothing.
#[inline]
pub fn inactive_bullet_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::PlayerBullet, [] as [Layer; 0])
}

/// Pre-spawn the whole pool, inactive.
pub fn init_bullet_pool(mut commands: Commands, mut pool: ResMut<BulletPool>) {
    pool.free.clear();

    for _ in 0..pool.capacity {
        let e = commands
            .spawn((
                Name::new("Bullet(Pooled)"),
                PooledBullet,
                BulletState::Inactive,
                Sprite {
                    color: Color::srgb(1.0, 0.85, 0.3),
                    custom_size: Some(Vec2::splat(BULLET_RADIUS * 2.0)),
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, 4.0),
                Visibility::Hidden,
                RigidBody::Dynamic,
                Collider::circle(BULLET_RADIUS),
                Sensor,
                inactive_bullet_layers(),
                LinearVelocity::ZERO,
                CollisionEventsEnabled,
                DespawnOnExit(GameState::InGame),
            ))
            .id();

        pool.free.push(BulletEntity(e));
    }
}
