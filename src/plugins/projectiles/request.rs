use bevy::prelude::*;

use super::messages::SpawnBulletRequest;
use crate::common::{movement::Facing, tunables::Tunables};
use crate::plugins::hud::AmmoLedger;
use crate::plugins::player::{Player, PlayerInput};

/// Producer: a fire edge with ammo in the ledger becomes one request.
///
/// Bullets leave from the player's centre and travel the way the player faces.
pub fn request_player_bullets(
    input: Res<PlayerInput>,
    ledger: Res<AmmoLedger>,
    tunables: Res<Tunables>,
    q_player: Query<(&Transform, &Facing), With<Player>>,
    mut writer: MessageWriter<SpawnBulletRequest>,
) {
    if !input.fire_pressed || ledger.count() == 0 {
        return;
    }
    let Ok((tf, facing)) = q_player.single() else {
        return;
    };

    writer.write(SpawnBulletRequest {
        pos: tf.translation.truncate(),
        vel: Vec2::X * facing.sign() * tunables.bullet_speed,
    });
}
