//! Coins and item boxes: the two ways to earn ammo.

use std::time::Duration;

use avian2d::prelude::*;
use bevy::math::bounding::{Aabb2d, BoundingVolume};
use bevy::math::curve::{Curve, EaseFunction};
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use super::{BOX_CONTACT_SKIN, Interaction, PairRule, Pairing};
use crate::common::{geometry::Hitbox, layers::Layer, state::GameState};
use crate::plugins::feedback::{ParticleBurst, SoundCue};
use crate::plugins::hud::AmmoLedger;
use crate::plugins::level::Level;
use crate::plugins::player::Player;

pub const COIN_SIZE: f32 = 20.0;
pub const COIN_BURST: u32 = 10;
pub const BOX_BURST: u32 = 3;

/// Upward speed at or below which the player's rise counts as stopped by a box.
/// The physics step can leave a small residual either way; falling away is fine.
pub const REST_EPSILON: f32 = 0.5;
pub const BOUNCE_HEIGHT: f32 = 20.0;
/// Duration of each half of the bounce (up, then back down).
pub const BOUNCE_HALF: Duration = Duration::from_millis(150);

const BOX_CLOSED: Color = Color::srgb(0.85, 0.55, 0.15);
const BOX_OPEN: Color = Color::srgb(0.45, 0.3, 0.15);

#[derive(Component, Debug, Clone, Copy)]
pub struct Coin;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ItemBox {
    pub activated: bool,
    pub original_y: f32,
}

/// `Some(elapsed)` while the open animation plays.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct BoxBounce(pub Option<Duration>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxContact {
    /// Bumped from below while at rest: open it.
    Activate,
    /// Standing on top: ordinary solid ground.
    Land,
    Ignore,
}

pub fn item_box_layers_solid() -> CollisionLayers {
    CollisionLayers::new(Layer::World, [Layer::Player, Layer::Enemy, Layer::PlayerBullet])
}

/// The player passes through a box while it bounces.
pub fn item_box_layers_pass_through() -> CollisionLayers {
    CollisionLayers::new(Layer::World, [Layer::Enemy, Layer::PlayerBullet])
}

pub fn classify_box_contact(player: &Aabb2d, vertical_velocity: f32, item_box: &Aabb2d, activated: bool) -> BoxContact {
    let skin = BOX_CONTACT_SKIN;
    let beneath = player.max.x > item_box.min.x + skin && player.min.x < item_box.max.x - skin;
    let head = player.max.y;
    let head_in_box = head >= item_box.min.y - skin && head <= item_box.max.y;

    if beneath && head_in_box && player.center().y < item_box.center().y {
        if !activated && vertical_velocity <= REST_EPSILON {
            BoxContact::Activate
        } else {
            BoxContact::Ignore
        }
    } else if player.min.y >= item_box.max.y - skin {
        BoxContact::Land
    } else {
        BoxContact::Ignore
    }
}

/// Height above rest after `elapsed`: up over one half, back over the other.
pub fn bounce_offset(elapsed: Duration) -> f32 {
    let half = BOUNCE_HALF.as_secs_f32();
    let t = elapsed.as_secs_f32() / half;
    let ease = |x: f32| EaseFunction::SineInOut.sample_clamped(x);
    if t <= 1.0 {
        BOUNCE_HEIGHT * ease(t)
    } else if t <= 2.0 {
        BOUNCE_HEIGHT * (1.0 - ease(t - 1.0))
    } else {
        0.0
    }
}

pub fn spawn_coins(commands: &mut Commands, level: &Level) {
    for &at in &level.coins {
        commands.spawn((
            Name::new("Coin"),
            Coin,
            Pairing(PairRule::PlayerCoin),
            Hitbox::from_size(Vec2::splat(COIN_SIZE)),
            Sprite {
                color: Color::srgb(1.0, 0.85, 0.1),
                custom_size: Some(Vec2::splat(COIN_SIZE)),
                ..default()
            },
            Transform::from_translation(at.extend(2.0)),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

pub(crate) fn spawn_scene_coins(mut commands: Commands, level: Res<Level>) {
    spawn_coins(&mut commands, &level);
}

pub(crate) fn spawn_item_boxes(mut commands: Commands, level: Res<Level>) {
    let size = Vec2::splat(level.tile_size);
    for &at in &level.item_boxes {
        commands.spawn((
            Name::new("ItemBox"),
            ItemBox { activated: false, original_y: at.y },
            BoxBounce::default(),
            Pairing(PairRule::PlayerItemBox),
            Hitbox::from_size(size),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            item_box_layers_solid(),
            Sprite {
                color: BOX_CLOSED,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(at.extend(1.0)),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

pub(crate) fn collect_coins(
    mut commands: Commands,
    mut interactions: MessageReader<Interaction>,
    mut ledger: ResMut<AmmoLedger>,
    q_coins: Query<&Transform, With<Coin>>,
    mut bursts: MessageWriter<ParticleBurst>,
    mut sounds: MessageWriter<SoundCue>,
) {
    for hit in interactions.read().filter(|i| i.rule == PairRule::PlayerCoin) {
        let Ok(tf) = q_coins.get(hit.b) else {
            continue;
        };
        commands.entity(hit.b).despawn();
        bursts.write(ParticleBurst { position: tf.translation.truncate(), count: COIN_BURST });
        sounds.write(SoundCue::CoinCollect);
        ledger.add_one();
    }
}

pub(crate) fn hit_item_boxes(
    mut interactions: MessageReader<Interaction>,
    mut ledger: ResMut<AmmoLedger>,
    q_player: Query<(&Transform, &Hitbox, &LinearVelocity), With<Player>>,
    mut q_boxes: Query<
        (&Transform, &Hitbox, &mut ItemBox, &mut BoxBounce, &mut CollisionLayers, Option<&mut Sprite>),
        Without<Player>,
    >,
    mut bursts: MessageWriter<ParticleBurst>,
    mut sounds: MessageWriter<SoundCue>,
) {
    for hit in interactions.read().filter(|i| i.rule == PairRule::PlayerItemBox) {
        let Ok((tf_player, hitbox_player, vel)) = q_player.get(hit.a) else {
            continue;
        };
        let Ok((tf, hitbox, mut item_box, mut bounce, mut layers, sprite)) = q_boxes.get_mut(hit.b) else {
            continue;
        };

        let contact = classify_box_contact(
            &hitbox_player.aabb_at(tf_player),
            vel.y,
            &hitbox.aabb_at(tf),
            item_box.activated,
        );
        if contact != BoxContact::Activate {
            continue;
        }

        item_box.activated = true;
        bounce.0 = Some(Duration::ZERO);
        *layers = item_box_layers_pass_through();
        if let Some(mut sprite) = sprite {
            sprite.color = BOX_OPEN;
        }

        bursts.write(ParticleBurst { position: tf.translation.truncate(), count: BOX_BURST });
        sounds.write(SoundCue::CoinCollect);
        ledger.add_one();
        debug!("item box opened");
    }
}

pub(crate) fn animate_item_box_bounce(
    time: Res<Time>,
    mut q_boxes: Query<(&ItemBox, &mut BoxBounce, &mut Transform, &mut CollisionLayers, Option<&mut Position>)>,
) {
    for (item_box, mut bounce, mut tf, mut layers, position) in &mut q_boxes {
        let Some(elapsed) = bounce.0 else {
            continue;
        };
        let elapsed = elapsed + time.delta();

        let y = if elapsed >= BOUNCE_HALF * 2 {
            bounce.0 = None;
            *layers = item_box_layers_solid();
            item_box.original_y
        } else {
            bounce.0 = Some(elapsed);
            item_box.original_y + bounce_offset(elapsed)
        };

        tf.translation.y = y;
        if let Some(mut position) = position {
            position.0.y = y;
        }
    }
}

/// Close every box and put it back where it started.
pub fn reset_item_boxes(
    mut q_boxes: Query<(
        &mut ItemBox,
        &mut BoxBounce,
        &mut Transform,
        &mut CollisionLayers,
        Option<&mut Position>,
        Option<&mut Sprite>,
    )>,
) {
    for (mut item_box, mut bounce, mut tf, mut layers, position, sprite) in &mut q_boxes {
        item_box.activated = false;
        bounce.0 = None;
        *layers = item_box_layers_solid();
        tf.translation.y = item_box.original_y;
        if let Some(mut position) = position {
            position.0.y = item_box.original_y;
        }
        if let Some(mut sprite) = sprite {
            sprite.color = BOX_CLOSED;
        }
    }
}
