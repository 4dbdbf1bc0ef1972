//! Collision layers.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    /// Solid level geometry: ground runs, item boxes, moving platforms.
    World,
    Player,
    /// Enemies and the boss.
    Enemy,
    PlayerBullet,
}
