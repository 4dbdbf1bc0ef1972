//! Sound, music and particle cues.
//!
//! Gameplay systems never talk to an audio device or a particle renderer. They
//! write cue messages, and the consumers here log them, track whether music is
//! playing and spawn short-lived sparkle sprites for bursts. Windowed builds add
//! [`audio_plugin`], which turns the same cues into audio players.

pub mod audio;

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::common::state::GameState;

pub use audio::{MusicTrack, SoundLibrary, audio_plugin};

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// One of three jump variants, 1..=3.
    Jump(u8),
    Splash,
    CoinCollect,
    Checkpoint,
    EnemyDeath,
    PlayerDeath,
    Shot,
    BossHit,
}

impl SoundCue {
    pub fn asset_key(self) -> &'static str {
        match self {
            SoundCue::Jump(1) => "jump1",
            SoundCue::Jump(2) => "jump2",
            SoundCue::Jump(_) => "jump3",
            SoundCue::Splash => "splash",
            SoundCue::CoinCollect => "coin_collect",
            SoundCue::Checkpoint => "checkpoint",
            SoundCue::EnemyDeath => "enemy_death",
            SoundCue::PlayerDeath => "player_death",
            SoundCue::Shot => "shot1",
            SoundCue::BossHit => "gethit1",
        }
    }

    pub const ALL_KEYS: [&'static str; 10] = [
        "jump1",
        "jump2",
        "jump3",
        "splash",
        "coin_collect",
        "checkpoint",
        "enemy_death",
        "player_death",
        "shot1",
        "gethit1",
    ];

    /// Linear playback volume.
    pub fn volume(self) -> f32 {
        match self {
            SoundCue::Jump(_) => 0.25,
            SoundCue::PlayerDeath => 0.35,
            _ => 1.0,
        }
    }
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicCue {
    Play,
    Stop,
}

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct ParticleBurst {
    pub position: Vec2,
    pub count: u32,
}

/// Randomness for cosmetic variation (jump sound variant, sparkle spread).
#[derive(Resource)]
pub struct SoundRng(pub StdRng);

impl Default for SoundRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl SoundRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn jump_variant(&mut self) -> u8 {
        self.0.gen_range(1..=3)
    }
}

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MusicState {
    pub playing: bool,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Sparkle {
    pub velocity: Vec2,
}

#[derive(Component, Debug, Clone)]
pub struct Lifetime(pub Timer);

const SPARKLE_LIFETIME_SECS: f32 = 0.5;
const SPARKLE_SPEED: f32 = 100.0;
const SPARKLE_SIZE: f32 = 4.0;

pub fn plugin(app: &mut App) {
    app.add_message::<SoundCue>()
        .add_message::<MusicCue>()
        .add_message::<ParticleBurst>()
        .init_resource::<SoundRng>()
        .init_resource::<MusicState>()
        .add_systems(Update, age_sparkles)
        .add_systems(
            PostUpdate,
            (log_sound_cues, apply_music_cues, spawn_sparkles),
        );
}

pub(crate) fn log_sound_cues(mut cues: MessageReader<SoundCue>) {
    for cue in cues.read() {
        debug!("sound: {}", cue.asset_key());
    }
}

pub(crate) fn apply_music_cues(mut cues: MessageReader<MusicCue>, mut music: ResMut<MusicState>) {
    for cue in cues.read() {
        let playing = matches!(cue, MusicCue::Play);
        if music.playing != playing {
            debug!("music: {cue:?}");
            music.playing = playing;
        }
    }
}

pub(crate) fn spawn_sparkles(
    mut commands: Commands,
    mut bursts: MessageReader<ParticleBurst>,
    mut rng: ResMut<SoundRng>,
) {
    for burst in bursts.read() {
        for _ in 0..burst.count {
            let velocity = Vec2::new(
                rng.0.gen_range(-SPARKLE_SPEED..=SPARKLE_SPEED),
                rng.0.gen_range(-SPARKLE_SPEED..=SPARKLE_SPEED),
            );
            commands.spawn((
                Name::new("Sparkle"),
                Sparkle { velocity },
                Lifetime(Timer::from_seconds(SPARKLE_LIFETIME_SECS, TimerMode::Once)),
                Sprite {
                    color: Color::srgb(1.0, 0.95, 0.6),
                    custom_size: Some(Vec2::splat(SPARKLE_SIZE)),
                    ..default()
                },
                Transform::from_translation(burst.position.extend(8.0)),
                DespawnOnExit(GameState::InGame),
            ));
        }
    }
}

pub(crate) fn age_sparkles(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &Sparkle, &mut Lifetime, &mut Transform)>,
) {
    let dt = time.delta();
    for (e, sparkle, mut life, mut tf) in &mut q {
        tf.translation += (sparkle.velocity * dt.as_secs_f32()).extend(0.0);
        if life.0.tick(dt).is_finished() {
            commands.entity(e).despawn();
        }
    }
}
