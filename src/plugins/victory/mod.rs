//! Victory screen: shown after the flag, any key or click starts a fresh level.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::plugins::feedback::MusicCue;

#[derive(Component)]
pub struct VictoryBanner;

/// The restart hint; it pulses while the screen is up.
#[derive(Component)]
pub struct RestartPrompt;

pub const TITLE: &str = "Victory!";
pub const PROMPT: &str = "Press Space Key to start";

/// Seconds per prompt fade in and out.
const PULSE_SECS: f32 = 1.0;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::Victory), enter_victory).add_systems(
        Update,
        (restart_on_any_key, pulse_prompt).run_if(in_state(GameState::Victory)),
    );
}

/// Render-only: a camera for the victory screen.
pub fn render_plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::Victory), |mut commands: Commands| {
        commands.spawn((Name::new("VictoryCamera"), Camera2d, DespawnOnExit(GameState::Victory)));
    });
}

fn enter_victory(mut commands: Commands, mut music: MessageWriter<MusicCue>) {
    info!("level complete");
    music.write(MusicCue::Stop);

    commands.spawn((
        Name::new("VictoryBanner"),
        VictoryBanner,
        Sprite::from_color(Color::srgba(0.0, 0.0, 0.0, 0.5), Vec2::new(800.0, 600.0)),
        Transform::default(),
        DespawnOnExit(GameState::Victory),
    ));
    commands.spawn((
        Name::new("VictoryTitle"),
        Text2d::new(TITLE),
        TextFont {
            font_size: 64.0,
            ..default()
        },
        TextColor(Color::srgb(1.0, 1.0, 0.0)),
        Transform::from_xyz(0.0, 120.0, 1.0),
        DespawnOnExit(GameState::Victory),
    ));
    commands.spawn((
        Name::new("RestartPrompt"),
        RestartPrompt,
        Text2d::new(PROMPT),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Transform::from_xyz(0.0, -180.0, 1.0),
        DespawnOnExit(GameState::Victory),
    ));
}

fn pulse_prompt(time: Res<Time>, mut q: Query<&mut TextColor, With<RestartPrompt>>) {
    let phase = (time.elapsed_secs() / PULSE_SECS * std::f32::consts::PI).sin().abs();
    for mut color in &mut q {
        color.0 = color.0.with_alpha(0.5 + 0.5 * phase);
    }
}

/// Any key or mouse button starts a fresh level.
pub(crate) fn restart_on_any_key(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mouse: Option<Res<ButtonInput<MouseButton>>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let key = keys.is_some_and(|k| k.get_just_pressed().next().is_some());
    let click = mouse.is_some_and(|m| m.get_just_pressed().next().is_some());
    if key || click {
        next_state.set(GameState::InGame);
    }
}

#[cfg(test)]
mod tests;
