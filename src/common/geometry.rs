//! Overlap geometry for sensor-style pairings.
//!
//! Physical separation is Avian's job. Everything that is only "are these two
//! touching?" goes through axis-aligned boxes built from `Transform` + `Hitbox`.

use bevy::math::bounding::{Aabb2d, IntersectsVolume};
use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub half_size: Vec2,
}

impl Hitbox {
    pub fn from_size(size: Vec2) -> Self {
        Self { half_size: size * 0.5 }
    }

    #[inline]
    pub fn aabb(&self, center: Vec2) -> Aabb2d {
        Aabb2d::new(center, self.half_size)
    }

    #[inline]
    pub fn aabb_at(&self, tf: &Transform) -> Aabb2d {
        self.aabb(tf.translation.truncate())
    }
}

/// Inclusive overlap: boxes sharing an edge count as touching.
#[inline]
pub fn overlaps(a: &Aabb2d, b: &Aabb2d) -> bool {
    a.intersects(b)
}

/// Overlap after growing `a` by `skin` on every side.
///
/// Resting contacts resolved by the physics step leave bodies a hair apart;
/// the skin turns those into touches.
#[inline]
pub fn touching(a: &Aabb2d, b: &Aabb2d, skin: f32) -> bool {
    let grown = Aabb2d {
        min: a.min - Vec2::splat(skin),
        max: a.max + Vec2::splat(skin),
    };
    grown.intersects(b)
}

#[inline]
pub fn aabb_from_rect(rect: Rect) -> Aabb2d {
    Aabb2d {
        min: rect.min,
        max: rect.max,
    }
}
