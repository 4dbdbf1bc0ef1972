//! Core plugin: shared resources and the fixed-tick system order.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::prelude::*;

use crate::common::{schedule::GameplaySystems, state::GameState, tunables::Tunables};

pub fn plugin(app: &mut App) {
    // Tests may preinstall tuned values.
    if !app.world().contains_resource::<Tunables>() {
        app.insert_resource(Tunables::default());
    }
    app.insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.07)));

    app.configure_sets(
        FixedUpdate,
        (
            GameplaySystems::LifeCycle,
            GameplaySystems::Environment,
            GameplaySystems::Controls,
            GameplaySystems::Motion,
            GameplaySystems::Fire,
            GameplaySystems::Latches,
        )
            .chain()
            .run_if(in_state(GameState::InGame)),
    )
    .configure_sets(
        FixedPostUpdate,
        (
            GameplaySystems::Sense,
            GameplaySystems::Rules,
            GameplaySystems::Resolve,
            GameplaySystems::Outcome,
            GameplaySystems::Commit,
        )
            .chain()
            .after(CollisionEventSystems)
            .run_if(in_state(GameState::InGame)),
    );
}
