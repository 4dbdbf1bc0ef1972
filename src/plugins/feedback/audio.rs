//! Audio playback (render-only): cues become one-shot players, music one looping player.
//!
//! Clips load once at startup from `assets/audio/<key>.ogg`. A cue whose clip is
//! missing from the library is skipped.

use bevy::audio::{AudioPlayer, PlaybackSettings, Volume};
use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use super::{MusicState, SoundCue, apply_music_cues};

pub const MUSIC_KEY: &str = "music";
pub const MUSIC_VOLUME: f32 = 0.2;

#[derive(Resource, Default)]
pub struct SoundLibrary {
    pub clips: HashMap<&'static str, Handle<AudioSource>>,
    pub music: Handle<AudioSource>,
}

/// The single looping background track.
#[derive(Component, Debug, Clone, Copy)]
pub struct MusicTrack;

pub fn audio_plugin(app: &mut App) {
    app.init_resource::<SoundLibrary>()
        .add_systems(Startup, load_sound_library)
        .add_systems(
            PostUpdate,
            (play_sound_cues, sync_music.after(apply_music_cues)),
        );
}

#[inline]
pub fn asset_path(key: &str) -> String {
    format!("audio/{key}.ogg")
}

fn load_sound_library(asset_server: Res<AssetServer>, mut library: ResMut<SoundLibrary>) {
    for key in SoundCue::ALL_KEYS {
        library.clips.insert(key, asset_server.load(asset_path(key)));
    }
    library.music = asset_server.load(asset_path(MUSIC_KEY));
}

pub(crate) fn play_sound_cues(
    mut commands: Commands,
    library: Res<SoundLibrary>,
    mut cues: MessageReader<SoundCue>,
) {
    for cue in cues.read() {
        let Some(clip) = library.clips.get(cue.asset_key()) else {
            continue;
        };
        commands.spawn((
            AudioPlayer::new(clip.clone()),
            PlaybackSettings {
                volume: Volume::Linear(cue.volume()),
                ..PlaybackSettings::DESPAWN
            },
        ));
    }
}

pub(crate) fn sync_music(
    mut commands: Commands,
    music: Res<MusicState>,
    library: Res<SoundLibrary>,
    q_tracks: Query<Entity, With<MusicTrack>>,
) {
    if !music.is_changed() {
        return;
    }

    if !music.playing {
        for e in &q_tracks {
            commands.entity(e).despawn();
        }
    } else if q_tracks.is_empty() {
        commands.spawn((
            Name::new("Music"),
            MusicTrack,
            AudioPlayer::new(library.music.clone()),
            PlaybackSettings {
                volume: Volume::Linear(MUSIC_VOLUME),
                ..PlaybackSettings::LOOP
            },
        ));
    }
}
