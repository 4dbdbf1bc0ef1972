//! Interaction handlers: declarative pairing rules and their resolvers.
//!
//! Each fixed tick, after the physics step, `detect_interactions` tests the
//! player against every entity carrying a [`Pairing`] and every patrolling entity
//! against the bounce triggers it responds to. Every hit becomes one
//! [`Interaction`] message; the handlers in `pickups` and `patrol` (and the enemy
//! contact handler) each consume the rule they own.
//!
//! ```text
//! Rules:   detect_interactions -> Interaction { rule, a, b }
//! Resolve: collect_coins, hit_item_boxes, carry_riders, reverse_on_bounce_triggers
//! Commit:  animate_item_box_bounce
//! ```

pub mod patrol;
pub mod pickups;

use bevy::prelude::*;

use crate::common::{
    geometry::{Hitbox, touching},
    schedule::GameplaySystems,
    state::GameState,
    tunables::Tunables,
};
use crate::plugins::lifecycle::LifeCycle;
use crate::plugins::physics::integrate_arcade_bodies;
use crate::plugins::player::Player;

pub use patrol::{BounceTarget, BounceTrigger, MovingPlatform, Patrol};
pub use pickups::{BoxBounce, Coin, ItemBox, reset_item_boxes, spawn_coins};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairRule {
    PlayerCoin,
    PlayerItemBox,
    PlayerEnemy,
    PlayerBoss,
    PlayerPlatform,
    PatrolBouncer,
}

/// Solid bodies are held a hair apart by the physics step.
pub const BOX_CONTACT_SKIN: f32 = 2.0;

impl PairRule {
    /// How far apart two boxes may be and still count as a contact.
    pub fn contact_skin(self, tunables: &Tunables) -> f32 {
        match self {
            PairRule::PlayerItemBox => BOX_CONTACT_SKIN,
            PairRule::PlayerPlatform => tunables.platform_carry_tolerance,
            _ => 0.0,
        }
    }
}

/// The rule an entity takes part in, opposite the player.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing(pub PairRule);

/// `a` is the player (or the patrolling entity for `PatrolBouncer`), `b` the other side.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interaction {
    pub rule: PairRule,
    pub a: Entity,
    pub b: Entity,
}

pub fn plugin(app: &mut App) {
    app.add_message::<Interaction>()
        .add_systems(
            OnEnter(GameState::InGame),
            (
                pickups::spawn_scene_coins,
                pickups::spawn_item_boxes,
                patrol::spawn_moving_platforms,
            ),
        )
        .add_systems(
            FixedUpdate,
            patrol::apply_patrol_velocity
                .before(integrate_arcade_bodies)
                .in_set(GameplaySystems::Motion),
        )
        .add_systems(FixedPostUpdate, detect_interactions.in_set(GameplaySystems::Rules))
        .add_systems(
            FixedPostUpdate,
            (
                pickups::collect_coins,
                pickups::hit_item_boxes,
                patrol::carry_riders,
                patrol::reverse_on_bounce_triggers,
            )
                .chain()
                .in_set(GameplaySystems::Resolve),
        )
        .add_systems(
            FixedPostUpdate,
            pickups::animate_item_box_bounce.in_set(GameplaySystems::Commit),
        );
}

pub(crate) fn detect_interactions(
    tunables: Res<Tunables>,
    life: Res<LifeCycle>,
    q_player: Query<(Entity, &Transform, &Hitbox), With<Player>>,
    q_targets: Query<(Entity, &Transform, &Hitbox, &Pairing)>,
    q_patrols: Query<(Entity, &Transform, &Hitbox, &Patrol)>,
    q_triggers: Query<(Entity, &Transform, &Hitbox, &BounceTrigger)>,
    mut out: MessageWriter<Interaction>,
) {
    if life.is_alive() {
        if let Ok((player, tf, hitbox)) = q_player.single() {
            let bounds = hitbox.aabb_at(tf);
            for (e, tf_other, hitbox_other, pairing) in &q_targets {
                let skin = pairing.0.contact_skin(&tunables);
                if touching(&bounds, &hitbox_other.aabb_at(tf_other), skin) {
                    out.write(Interaction { rule: pairing.0, a: player, b: e });
                }
            }
        }
    }

    for (e, tf, hitbox, patrol) in &q_patrols {
        let bounds = hitbox.aabb_at(tf);
        for (trigger_e, tf_trigger, hitbox_trigger, trigger) in &q_triggers {
            if trigger.target != patrol.responds_to {
                continue;
            }
            if touching(&bounds, &hitbox_trigger.aabb_at(tf_trigger), 0.0) {
                out.write(Interaction { rule: PairRule::PatrolBouncer, a: e, b: trigger_e });
            }
        }
    }
}
