//! Physics plugin: Avian for collision resolution, arcade-style motion on top.
//!
//! Avian's own gravity is switched off. The level runs on a single global
//! `WorldGravity` that the environment tracker and the life cycle rewrite, and
//! `integrate_arcade_bodies` applies it together with acceleration, linear drag
//! and per-body speed caps before the physics step. Caps are enforced after
//! every integration, so a body never leaves a tick faster than its mode allows.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::{
    geometry::Hitbox, layers::Layer, schedule::GameplaySystems, tunables::Tunables,
};

/// Global downward acceleration (magnitude) shared by every arcade body.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct WorldGravity(pub f32);

/// Motion parameters integrated by this plugin instead of by Avian.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ArcadeBody {
    /// Signed horizontal acceleration.
    pub acceleration: f32,
    /// Linear horizontal decay applied while not accelerating.
    pub drag: f32,
    pub max_velocity: Vec2,
}

/// Whether the body is standing on solid level geometry.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Grounded(pub bool);

/// Ray length below the feet.
const GROUND_RAY: f32 = 3.0;

pub fn plugin(app: &mut App) {
    let tunables = app.world().resource::<Tunables>().clone();
    app.add_plugins(PhysicsPlugins::default().with_length_unit(tunables.pixels_per_meter));
    app.insert_resource(Gravity(Vec2::ZERO));
    app.insert_resource(WorldGravity(tunables.ground.gravity));

    app.add_systems(
        FixedUpdate,
        integrate_arcade_bodies.in_set(GameplaySystems::Motion),
    )
    .add_systems(FixedPostUpdate, detect_ground.in_set(GameplaySystems::Sense));
}

/// Render-only: physics debug drawing, toggled with F1.
pub fn debug_plugin(app: &mut App) {
    app.add_plugins(PhysicsDebugPlugin::default())
        .add_systems(Startup, |mut store: ResMut<GizmoConfigStore>| {
            store.config_mut::<PhysicsGizmos>().0.enabled = false;
        })
        .add_systems(Update, toggle_physics_debug);
}

fn toggle_physics_debug(keys: Res<ButtonInput<KeyCode>>, mut store: ResMut<GizmoConfigStore>) {
    if keys.just_pressed(KeyCode::F1) {
        let (config, _) = store.config_mut::<PhysicsGizmos>();
        config.enabled = !config.enabled;
    }
}

/// One arcade integration step. Pure so the caps can be checked in isolation.
pub fn step_velocity(velocity: Vec2, body: &ArcadeBody, gravity: f32, dt: f32) -> Vec2 {
    let mut v = velocity;

    if body.acceleration != 0.0 {
        v.x += body.acceleration * dt;
    } else if body.drag > 0.0 {
        let decay = body.drag * dt;
        v.x = if v.x > 0.0 {
            (v.x - decay).max(0.0)
        } else {
            (v.x + decay).min(0.0)
        };
    }

    v.y -= gravity * dt;

    v.clamp(-body.max_velocity, body.max_velocity)
}

pub(crate) fn integrate_arcade_bodies(
    time: Res<Time>,
    gravity: Res<WorldGravity>,
    mut q: Query<(&ArcadeBody, &mut LinearVelocity)>,
) {
    let dt = time.delta_secs();
    for (body, mut vel) in &mut q {
        vel.0 = step_velocity(vel.0, body, gravity.0, dt);
    }
}

/// Cast three short rays down from the feet (both edges and the middle).
pub(crate) fn detect_ground(
    spatial: SpatialQuery,
    mut q: Query<(Entity, &Transform, &Hitbox, &mut Grounded)>,
) {
    for (e, tf, hitbox, mut grounded) in &mut q {
        let filter = SpatialQueryFilter::from_mask(Layer::World).with_excluded_entities([e]);
        let center = tf.translation.truncate();
        let feet_y = center.y - hitbox.half_size.y + 1.0;
        let inset = hitbox.half_size.x - 1.0;

        let on_ground = [-inset, 0.0, inset].into_iter().any(|dx| {
            spatial
                .cast_ray(Vec2::new(center.x + dx, feet_y), Dir2::NEG_Y, GROUND_RAY, true, &filter)
                .is_some()
        });

        grounded.set_if_neq(Grounded(on_ground));
    }
}
