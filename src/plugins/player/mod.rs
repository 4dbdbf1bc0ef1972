//! Player plugin: the movement controller.
//!
//! Pipeline:
//! - Update: sample the keyboard, write held axes and *edge latches* into `PlayerInput`
//! - FixedUpdate (Controls): mode constants -> acceleration / drag / caps / facing,
//!   edge-triggered jump, animation selection
//! - FixedUpdate (Latches): clear the edge latches once a fixed tick has seen them
//!
//! Latching matters because the fixed step and the frame rate are decoupled: a
//! key pressed in a frame with no fixed tick must still jump on the next tick,
//! and a frame with two fixed ticks must not jump twice.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{
    geometry::Hitbox,
    layers::Layer,
    movement::{Facing, ModePhysics, MovementMode},
    schedule::GameplaySystems,
    state::GameState,
    tunables::Tunables,
};
use crate::plugins::feedback::{SoundCue, SoundRng};
use crate::plugins::level::Level;
use crate::plugins::lifecycle::is_alive;
use crate::plugins::physics::{ArcadeBody, Grounded};

pub const PLAYER_SIZE: Vec2 = Vec2::new(28.0, 34.0);

#[derive(Component)]
pub struct Player;

#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAnimation {
    #[default]
    Idle,
    Walk,
    Jump,
}

#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct PlayerInput {
    /// -1 left, +1 right, 0 none. Left wins when both are held.
    pub axis_x: f32,
    pub jump_held: bool,
    /// Set on the frame jump goes down; cleared after a fixed tick.
    pub jump_pressed: bool,
    /// Set on the frame fire goes down; cleared after a fixed tick.
    pub fire_pressed: bool,
}

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default())
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(Update, gather_input.run_if(in_state(GameState::InGame)))
        .add_systems(
            FixedUpdate,
            (apply_controls, update_animation)
                .chain()
                .in_set(GameplaySystems::Controls)
                .run_if(is_alive),
        )
        .add_systems(FixedUpdate, clear_input_latches.in_set(GameplaySystems::Latches))
        .add_systems(PostUpdate, sync_sprite_facing.run_if(in_state(GameState::InGame)));
}

/// Bundle of everything the player needs, placed at `position`.
pub fn player_bundle(position: Vec2, tunables: &Tunables) -> impl Bundle {
    let ground = ModePhysics::for_mode(MovementMode::Ground, tunables);
    (
        (
            Name::new("Player"),
            Player,
            Sprite {
                color: Color::srgb(0.2, 0.75, 0.9),
                custom_size: Some(PLAYER_SIZE),
                ..default()
            },
            Transform::from_translation(position.extend(5.0)),
            Visibility::Visible,
        ),
        (
            RigidBody::Dynamic,
            Collider::rectangle(PLAYER_SIZE.x, PLAYER_SIZE.y),
            CollisionLayers::new(Layer::Player, [Layer::World]),
            LockedAxes::ROTATION_LOCKED,
            Friction::ZERO.with_combine_rule(CoefficientCombine::Min),
            LinearVelocity::ZERO,
        ),
        (
            ArcadeBody {
                acceleration: 0.0,
                drag: ground.drag,
                max_velocity: ground.max_velocity,
            },
            Hitbox::from_size(PLAYER_SIZE),
            Grounded::default(),
            MovementMode::Ground,
            Facing::Left,
            PlayerAnimation::Idle,
        ),
        DespawnOnExit(GameState::InGame),
    )
}

fn spawn(mut commands: Commands, level: Res<Level>, tunables: Res<Tunables>) {
    commands.spawn(player_bundle(level.spawn, &tunables));
}

fn gather_input(keys: Option<Res<ButtonInput<KeyCode>>>, mut input: ResMut<PlayerInput>) {
    let Some(keys) = keys else {
        return;
    };

    let left = keys.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]);
    let right = keys.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]);
    input.axis_x = if left {
        -1.0
    } else if right {
        1.0
    } else {
        0.0
    };

    input.jump_held = keys.any_pressed([KeyCode::ArrowUp, KeyCode::KeyW]);
    input.jump_pressed |= keys.any_just_pressed([KeyCode::ArrowUp, KeyCode::KeyW]);
    input.fire_pressed |= keys.just_pressed(KeyCode::Space);
}

pub(crate) fn apply_controls(
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    mut rng: ResMut<SoundRng>,
    mut sounds: MessageWriter<SoundCue>,
    mut q_player: Query<
        (&MovementMode, &Grounded, &mut ArcadeBody, &mut LinearVelocity, &mut Facing),
        With<Player>,
    >,
) {
    let Ok((mode, grounded, mut body, mut vel, mut facing)) = q_player.single_mut() else {
        return;
    };
    let physics = ModePhysics::for_mode(*mode, &tunables);

    body.max_velocity = physics.max_velocity;
    body.drag = physics.drag;

    if input.axis_x < 0.0 {
        body.acceleration = -physics.acceleration;
        facing.set_if_neq(Facing::Left);
    } else if input.axis_x > 0.0 {
        body.acceleration = physics.acceleration;
        facing.set_if_neq(Facing::Right);
    } else {
        body.acceleration = 0.0;
    }

    let can_jump = grounded.0 || *mode != MovementMode::Ground;
    if can_jump && input.jump_pressed {
        vel.y = physics.jump_velocity;
        sounds.write(SoundCue::Jump(rng.jump_variant()));
    }
}

/// Animation priority: airborne (or rising through water) beats idle beats walk.
///
/// Submerged horizontal movement has no walk cycle: the current clip is kept.
pub fn select_animation(
    current: PlayerAnimation,
    mode: MovementMode,
    grounded: bool,
    vertical_velocity: f32,
    axis_x: f32,
) -> PlayerAnimation {
    let submerged = mode == MovementMode::Water;
    if (!grounded && !submerged) || (submerged && vertical_velocity > 0.0) {
        PlayerAnimation::Jump
    } else if axis_x == 0.0 {
        PlayerAnimation::Idle
    } else if submerged {
        current
    } else {
        PlayerAnimation::Walk
    }
}

pub(crate) fn update_animation(
    input: Res<PlayerInput>,
    mut q_player: Query<
        (&MovementMode, &Grounded, &LinearVelocity, &mut PlayerAnimation),
        With<Player>,
    >,
) {
    let Ok((mode, grounded, vel, mut anim)) = q_player.single_mut() else {
        return;
    };
    let next = select_animation(*anim, *mode, grounded.0, vel.y, input.axis_x);
    anim.set_if_neq(next);
}

pub(crate) fn clear_input_latches(mut input: ResMut<PlayerInput>) {
    input.jump_pressed = false;
    input.fire_pressed = false;
}

/// Sprites are drawn facing left.
fn sync_sprite_facing(mut q: Query<(&Facing, &mut Sprite), Changed<Facing>>) {
    for (facing, mut sprite) in &mut q {
        sprite.flip_x = *facing == Facing::Right;
    }
}
