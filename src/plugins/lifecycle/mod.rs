//! Life cycle: death, the respawn deadline, checkpoint and victory markers.
//!
//! ```text
//! Alive --first DeathTrigger--> Dying { respawn_at } --fixed time >= respawn_at--> Respawning
//! Respawning --respawn chain (player, transients, boxes, bullets, ledger)--> Alive
//! ```
//!
//! The deadline is measured in fixed time, so it advances with the simulation
//! and not with the wall clock. Only the first trigger while `Alive` counts.

use std::time::Duration;

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::{
    geometry::Hitbox,
    movement::{Facing, ModePhysics, MovementMode},
    schedule::GameplaySystems,
    state::GameState,
    tunables::Tunables,
};
use crate::plugins::enemies::{Boss, Enemy, spawn_hostiles};
use crate::plugins::feedback::{MusicCue, SoundCue};
use crate::plugins::hud::AmmoLedger;
use crate::plugins::interactions::{BounceTarget, BounceTrigger, Coin, reset_item_boxes, spawn_coins};
use crate::plugins::level::Level;
use crate::plugins::physics::{ArcadeBody, Grounded, WorldGravity};
use crate::plugins::player::{Player, PlayerAnimation, PlayerInput};
use crate::plugins::projectiles::recall_live_bullets;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Fell,
    Spikes,
    Enemy,
    Boss,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathTrigger {
    pub cause: DeathCause,
}

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LifeCycle {
    #[default]
    Alive,
    Dying {
        respawn_at: Duration,
        cause: DeathCause,
    },
    Respawning,
}

impl LifeCycle {
    #[inline]
    pub fn is_alive(&self) -> bool {
        matches!(self, LifeCycle::Alive)
    }

    /// Start dying. Returns `false` if the player was not alive (trigger ignored).
    pub fn begin_dying(&mut self, now: Duration, delay: Duration, cause: DeathCause) -> bool {
        if !self.is_alive() {
            return false;
        }
        *self = LifeCycle::Dying { respawn_at: now + delay, cause };
        true
    }

    /// Advance a pending death. Returns `true` on the tick the deadline passes.
    pub fn poll(&mut self, now: Duration) -> bool {
        match *self {
            LifeCycle::Dying { respawn_at, .. } if now >= respawn_at => {
                *self = LifeCycle::Respawning;
                true
            }
            _ => false,
        }
    }

    pub fn finish(&mut self) {
        if matches!(self, LifeCycle::Respawning) {
            *self = LifeCycle::Alive;
        }
    }
}

pub fn is_alive(life: Res<LifeCycle>) -> bool {
    life.is_alive()
}

pub fn is_respawning(life: Res<LifeCycle>) -> bool {
    matches!(*life, LifeCycle::Respawning)
}

/// One-way respawn point, set the first time the checkpoint marker is passed.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct Checkpoint(pub Option<Vec2>);

impl Checkpoint {
    /// Record `position` unless a checkpoint is already set.
    pub fn try_latch(&mut self, position: Vec2) -> bool {
        if self.0.is_some() {
            return false;
        }
        self.0 = Some(position);
        true
    }
}

#[inline]
pub fn respawn_point(checkpoint: &Checkpoint, level: &Level) -> Vec2 {
    checkpoint.0.unwrap_or(level.spawn)
}

pub fn plugin(app: &mut App) {
    app.add_message::<DeathTrigger>()
        .init_resource::<LifeCycle>()
        .init_resource::<Checkpoint>()
        .add_systems(OnEnter(GameState::InGame), begin_session)
        .add_systems(
            FixedUpdate,
            (
                poll_death_timer,
                (
                    respawn_player,
                    rebuild_transients,
                    reset_item_boxes,
                    recall_live_bullets,
                    finish_respawn,
                )
                    .chain()
                    .run_if(is_respawning),
            )
                .chain()
                .in_set(GameplaySystems::LifeCycle),
        )
        .add_systems(
            FixedPostUpdate,
            (
                check_hazards.run_if(is_alive),
                begin_dying,
                check_progress_markers.run_if(is_alive),
            )
                .chain()
                .in_set(GameplaySystems::Outcome),
        );
}

pub(crate) fn begin_session(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut music: MessageWriter<MusicCue>,
) {
    commands.insert_resource(LifeCycle::Alive);
    commands.insert_resource(Checkpoint::default());
    commands.insert_resource(AmmoLedger::default());
    commands.insert_resource(WorldGravity(tunables.ground.gravity));
    commands.insert_resource(PlayerInput::default());
    music.write(MusicCue::Play);
}

/// Falling out of the level and spike contact. Enemy contact is reported by its handler.
pub(crate) fn check_hazards(
    level: Res<Level>,
    q_player: Query<(&Transform, &Hitbox), With<Player>>,
    mut deaths: MessageWriter<DeathTrigger>,
) {
    let Ok((tf, hitbox)) = q_player.single() else {
        return;
    };

    if tf.translation.y < level.bounds().min.y {
        deaths.write(DeathTrigger { cause: DeathCause::Fell });
    } else if level.sensors.on_spikes(&hitbox.aabb_at(tf)) {
        deaths.write(DeathTrigger { cause: DeathCause::Spikes });
    }
}

pub(crate) fn begin_dying(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut life: ResMut<LifeCycle>,
    mut gravity: ResMut<WorldGravity>,
    mut deaths: MessageReader<DeathTrigger>,
    mut sounds: MessageWriter<SoundCue>,
    mut music: MessageWriter<MusicCue>,
    mut q_player: Query<(&mut Visibility, &mut LinearVelocity, &mut ArcadeBody), With<Player>>,
) {
    for trigger in deaths.read() {
        let delay = Duration::from_secs_f32(tunables.death_delay_secs);
        if !life.begin_dying(time.elapsed(), delay, trigger.cause) {
            continue;
        }

        info!("player died: {:?}", trigger.cause);
        sounds.write(SoundCue::PlayerDeath);
        music.write(MusicCue::Stop);
        gravity.0 = 0.0;

        if let Ok((mut vis, mut vel, mut body)) = q_player.single_mut() {
            *vis = Visibility::Hidden;
            vel.0 = Vec2::ZERO;
            body.acceleration = 0.0;
        }
    }
}

pub(crate) fn check_progress_markers(
    level: Res<Level>,
    mut checkpoint: ResMut<Checkpoint>,
    mut next_state: ResMut<NextState<GameState>>,
    q_player: Query<&Transform, With<Player>>,
    mut sounds: MessageWriter<SoundCue>,
) {
    let Ok(tf) = q_player.single() else {
        return;
    };
    let x = tf.translation.x;

    if x > level.checkpoint.x && checkpoint.try_latch(level.checkpoint) {
        info!("checkpoint reached at {}", level.checkpoint);
        sounds.write(SoundCue::Checkpoint);
    }

    let already_leaving = !matches!(*next_state, NextState::Unchanged);
    if x > level.victory.x && !already_leaving {
        info!("victory");
        sounds.write(SoundCue::Checkpoint);
        next_state.set(GameState::Victory);
    }
}

pub(crate) fn poll_death_timer(time: Res<Time>, mut life: ResMut<LifeCycle>) {
    if life.poll(time.elapsed()) {
        debug!("respawn deadline reached");
    }
}

pub(crate) fn respawn_player(
    tunables: Res<Tunables>,
    level: Res<Level>,
    checkpoint: Res<Checkpoint>,
    mut q_player: Query<
        (
            &mut Transform,
            Option<&mut Position>,
            &mut LinearVelocity,
            &mut ArcadeBody,
            &mut MovementMode,
            &mut Grounded,
            &mut PlayerAnimation,
            &mut Facing,
            &mut Visibility,
        ),
        With<Player>,
    >,
) {
    let Ok((mut tf, position, mut vel, mut body, mut mode, mut grounded, mut anim, mut facing, mut vis)) =
        q_player.single_mut()
    else {
        return;
    };

    let at = respawn_point(&checkpoint, &level);
    let ground = ModePhysics::for_mode(MovementMode::Ground, &tunables);

    tf.translation.x = at.x;
    tf.translation.y = at.y;
    if let Some(mut position) = position {
        position.0 = at;
    }
    vel.0 = Vec2::ZERO;
    *body = ArcadeBody {
        acceleration: 0.0,
        drag: ground.drag,
        max_velocity: ground.max_velocity,
    };
    *mode = MovementMode::Ground;
    *grounded = Grounded(false);
    *anim = PlayerAnimation::Idle;
    *facing = Facing::Left;
    *vis = Visibility::Visible;

    info!("respawning at {at}");
}

/// Despawn and rebuild every coin, enemy, boss and enemy bouncer from level data.
pub(crate) fn rebuild_transients(
    mut commands: Commands,
    level: Res<Level>,
    tunables: Res<Tunables>,
    q_transients: Query<Entity, Or<(With<Coin>, With<Enemy>, With<Boss>)>>,
    q_triggers: Query<(Entity, &BounceTrigger)>,
) {
    for e in &q_transients {
        commands.entity(e).despawn();
    }
    for (e, trigger) in &q_triggers {
        if trigger.target == BounceTarget::Enemy {
            commands.entity(e).despawn();
        }
    }

    spawn_coins(&mut commands, &level);
    spawn_hostiles(&mut commands, &level, &tunables);
}

pub(crate) fn finish_respawn(
    tunables: Res<Tunables>,
    mut life: ResMut<LifeCycle>,
    mut gravity: ResMut<WorldGravity>,
    mut ledger: ResMut<AmmoLedger>,
    mut music: MessageWriter<MusicCue>,
) {
    gravity.0 = tunables.ground.gravity;
    ledger.reset();
    music.write(MusicCue::Play);
    life.finish();
}
