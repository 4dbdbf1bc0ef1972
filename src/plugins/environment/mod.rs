//! Environment mode tracker: water and ladders.
//!
//! Every 50 ms of fixed time the player's box is tested against the level's water
//! and climb volumes. Water wins when both overlap, so exactly one mode (and one
//! gravity value) is authoritative per poll.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::{
    geometry::Hitbox,
    movement::{ModePhysics, MovementMode},
    schedule::GameplaySystems,
    state::GameState,
    tunables::Tunables,
};
use crate::plugins::feedback::SoundCue;
use crate::plugins::level::Level;
use crate::plugins::lifecycle::is_alive;
use crate::plugins::physics::WorldGravity;
use crate::plugins::player::{Player, PlayerInput};

#[derive(Resource, Debug, Clone)]
pub struct ModePoll(pub Timer);

impl ModePoll {
    pub fn new(period_secs: f32) -> Self {
        Self(Timer::from_seconds(period_secs, TimerMode::Repeating))
    }
}

/// What a mode change does to the world, computed without touching it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeTransition {
    pub gravity: f32,
    /// Vertical velocity to impose, if any.
    pub set_vertical_velocity: Option<f32>,
    pub splash: bool,
}

#[inline]
pub fn resolve_mode(in_water: bool, in_climb: bool) -> MovementMode {
    if in_water {
        MovementMode::Water
    } else if in_climb {
        MovementMode::Climbing
    } else {
        MovementMode::Ground
    }
}

/// `None` when the mode did not change.
pub fn transition(
    from: MovementMode,
    to: MovementMode,
    jump_held: bool,
    tunables: &Tunables,
) -> Option<ModeTransition> {
    if from == to {
        return None;
    }
    let gravity = ModePhysics::for_mode(to, tunables).gravity;

    let t = match to {
        MovementMode::Water => ModeTransition {
            gravity,
            set_vertical_velocity: Some(-tunables.splash_velocity),
            splash: true,
        },
        MovementMode::Climbing => ModeTransition {
            gravity,
            set_vertical_velocity: None,
            splash: false,
        },
        MovementMode::Ground => ModeTransition {
            gravity,
            set_vertical_velocity: jump_held.then_some(tunables.exit_boost_velocity),
            splash: false,
        },
    };
    Some(t)
}

pub fn plugin(app: &mut App) {
    let period = app.world().resource::<Tunables>().mode_poll_secs;
    app.insert_resource(ModePoll::new(period))
        .add_systems(OnEnter(GameState::InGame), reset_poll)
        .add_systems(
            FixedUpdate,
            poll_environment
                .in_set(GameplaySystems::Environment)
                .run_if(is_alive),
        );
}

fn reset_poll(mut poll: ResMut<ModePoll>) {
    poll.0.reset();
}

pub(crate) fn poll_environment(
    time: Res<Time>,
    tunables: Res<Tunables>,
    level: Res<Level>,
    input: Res<PlayerInput>,
    mut poll: ResMut<ModePoll>,
    mut gravity: ResMut<WorldGravity>,
    mut sounds: MessageWriter<SoundCue>,
    mut q_player: Query<(&Transform, &Hitbox, &mut MovementMode, &mut LinearVelocity), With<Player>>,
) {
    if !poll.0.tick(time.delta()).just_finished() {
        return;
    }
    let Ok((tf, hitbox, mut mode, mut vel)) = q_player.single_mut() else {
        return;
    };

    let bounds = hitbox.aabb_at(tf);
    let next = resolve_mode(level.sensors.in_water(&bounds), level.sensors.in_climb(&bounds));
    let Some(t) = transition(*mode, next, input.jump_held, &tunables) else {
        return;
    };

    debug!("mode {:?} -> {:?}", *mode, next);
    *mode = next;
    gravity.0 = t.gravity;
    if let Some(vy) = t.set_vertical_velocity {
        vel.y = vy;
    }
    if t.splash {
        sounds.write(SoundCue::Splash);
    }
}
