//! Feature plugins.

use bevy::prelude::*;

pub mod animation;
pub mod combat;
pub mod core;
pub mod enemies;
pub mod physics;
pub mod player;
pub mod session;
pub mod world;

// Render-only
pub mod camera;
pub mod lighting;
pub mod scenery;
pub mod ui;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    world::plugin(app);
    session::plugin(app);
    combat::plugin(app);
    animation::plugin(app);
    player::plugin(app);
    enemies::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    ui::plugin(app);
    camera::plugin(app);
    lighting::plugin(app);
    scenery::plugin(app);
}
