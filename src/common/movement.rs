//! Movement regimes shared by the player, the environment tracker and the life cycle.

use bevy::prelude::*;

use super::tunables::Tunables;

/// The player's current movement regime. Exactly one is active at a time.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MovementMode {
    #[default]
    Ground,
    Water,
    Climbing,
}

/// Physics constant set selected by a [`MovementMode`].
///
/// All values are magnitudes; direction is applied by the systems using them
/// (world y points up, gravity pulls toward -y).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModePhysics {
    pub acceleration: f32,
    pub drag: f32,
    pub jump_velocity: f32,
    pub max_velocity: Vec2,
    pub gravity: f32,
}

impl ModePhysics {
    /// Pure mapping from mode to its constant set.
    #[inline]
    pub fn for_mode(mode: MovementMode, tunables: &Tunables) -> Self {
        *tunables.physics(mode)
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Left,
    Right,
}

impl Facing {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    #[inline]
    pub fn from_sign(sign: f32) -> Self {
        if sign < 0.0 { Facing::Left } else { Facing::Right }
    }
}
