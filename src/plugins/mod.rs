//! Feature plugins.

use bevy::prelude::*;

pub mod core;
pub mod enemies;
pub mod environment;
pub mod feedback;
pub mod hud;
pub mod interactions;
pub mod level;
pub mod lifecycle;
pub mod physics;
pub mod player;
pub mod projectiles;
pub mod victory;
pub mod world;

// Render-only
pub mod camera;
pub mod lighting;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    level::plugin(app);
    feedback::plugin(app);
    hud::plugin(app);
    physics::plugin(app);
    world::plugin(app);
    player::plugin(app);
    environment::plugin(app);
    lifecycle::plugin(app);
    interactions::plugin(app);
    enemies::plugin(app);
    projectiles::plugin(app);
    victory::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    physics::debug_plugin(app);
    lighting::plugin(app);
    camera::plugin(app);
    hud::render_plugin(app);
    feedback::audio_plugin(app);
    victory::render_plugin(app);
}
