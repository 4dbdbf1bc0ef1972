//! Ammo ledger and the ammo icon row.
//!
//! The ledger is the single source of truth. Icons are rebuilt from scratch
//! whenever it changes, so the row can never drift from the count.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy::transform::TransformSystems;
use bevy::window::PrimaryWindow;

use crate::common::state::GameState;
use crate::plugins::camera::MainCamera;

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AmmoLedger {
    count: u32,
}

impl AmmoLedger {
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn add_one(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    /// Spend one round. Returns `false` (and changes nothing) when empty.
    pub fn try_consume(&mut self) -> bool {
        match self.count.checked_sub(1) {
            Some(rest) => {
                self.count = rest;
                true
            }
            None => false,
        }
    }

    pub fn refund(&mut self) {
        self.add_one();
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmmoIcon {
    pub slot: u32,
}

pub const ICON_SIZE: f32 = 24.0;
const ICON_MARGIN: f32 = 16.0;
const ICON_STRIDE: f32 = 32.0;

/// Offset of an icon from the top-left corner of the view, y pointing down.
#[inline]
pub fn icon_offset(slot: u32) -> Vec2 {
    Vec2::new(ICON_MARGIN + ICON_STRIDE * slot as f32, ICON_MARGIN)
}

pub fn plugin(app: &mut App) {
    app.init_resource::<AmmoLedger>().add_systems(
        PostUpdate,
        rebuild_ammo_icons.run_if(in_state(GameState::InGame)),
    );
}

/// Render-only: keep the icon row glued to the top-left of the camera view.
pub fn render_plugin(app: &mut App) {
    app.add_systems(
        PostUpdate,
        pin_icons_to_camera
            .after(rebuild_ammo_icons)
            .before(TransformSystems::Propagate)
            .run_if(in_state(GameState::InGame)),
    );
}

pub(crate) fn rebuild_ammo_icons(
    mut commands: Commands,
    ledger: Res<AmmoLedger>,
    q_icons: Query<Entity, With<AmmoIcon>>,
) {
    if !ledger.is_changed() {
        return;
    }

    for e in &q_icons {
        commands.entity(e).despawn();
    }

    for slot in 0..ledger.count() {
        commands.spawn((
            Name::new("AmmoIcon"),
            AmmoIcon { slot },
            Sprite {
                color: Color::srgb(0.95, 0.8, 0.2),
                custom_size: Some(Vec2::splat(ICON_SIZE)),
                ..default()
            },
            Transform::from_xyz(0.0, 0.0, 50.0),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

fn pin_icons_to_camera(
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_camera: Query<&Transform, (With<MainCamera>, Without<AmmoIcon>)>,
    mut q_icons: Query<(&AmmoIcon, &mut Transform)>,
) {
    let (Ok(window), Ok(camera)) = (q_window.single(), q_camera.single()) else {
        return;
    };
    let half = Vec2::new(window.width(), window.height()) * 0.5;
    let top_left = camera.translation.truncate() + Vec2::new(-half.x, half.y);
    let center = Vec2::new(ICON_SIZE * 0.5, -ICON_SIZE * 0.5);

    for (icon, mut tf) in &mut q_icons {
        let offset = icon_offset(icon.slot);
        let p = top_left + Vec2::new(offset.x, -offset.y) + center;
        tf.translation.x = p.x;
        tf.translation.y = p.y;
    }
}
