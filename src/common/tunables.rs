//! Tunable gameplay constants.

use bevy::prelude::*;

use super::movement::{ModePhysics, MovementMode};

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    pub ground: ModePhysics,
    pub water: ModePhysics,
    pub climb: ModePhysics,
    /// Downward speed imparted once when the player enters water.
    pub splash_velocity: f32,
    /// Upward speed imparted when leaving water or a ladder with jump held.
    pub exit_boost_velocity: f32,
    pub enemy_speed: f32,
    pub platform_speed: f32,
    pub bullet_speed: f32,
    pub bullet_pool_capacity: usize,
    pub boss_health: u32,
    pub death_delay_secs: f32,
    pub mode_poll_secs: f32,
    /// How far the player's feet may sink below a platform top and still ride it.
    pub platform_carry_tolerance: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            ground: ModePhysics {
                acceleration: 1000.0,
                drag: 1200.0,
                jump_velocity: 850.0,
                max_velocity: Vec2::new(400.0, 1000.0),
                gravity: 2000.0,
            },
            water: ModePhysics {
                acceleration: 150.0,
                drag: 800.0,
                jump_velocity: 100.0,
                max_velocity: Vec2::new(200.0, 500.0),
                gravity: 250.0,
            },
            climb: ModePhysics {
                acceleration: 60.0,
                drag: 800.0,
                jump_velocity: 300.0,
                max_velocity: Vec2::new(200.0, 500.0),
                gravity: 250.0,
            },
            splash_velocity: 60.0,
            exit_boost_velocity: 600.0,
            enemy_speed: 100.0,
            platform_speed: 80.0,
            bullet_speed: 500.0,
            bullet_pool_capacity: 16,
            boss_health: 10,
            death_delay_secs: 1.0,
            mode_poll_secs: 0.05,
            platform_carry_tolerance: 5.0,
        }
    }
}

impl Tunables {
    #[inline]
    pub fn physics(&self, mode: MovementMode) -> &ModePhysics {
        match mode {
            MovementMode::Ground => &self.ground,
            MovementMode::Water => &self.water,
            MovementMode::Climbing => &self.climb,
        }
    }
}
