//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `ember_run::game::configure_headless` to install gameplay plugins.

#![allow(dead_code)]

use bevy::asset::AssetPlugin;
use bevy::input::InputPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;

use ember_run::common::state::GameState;

pub fn app_headless() -> App {
    let mut app = App::new();

    // AssetPlugin + ScenePlugin so SceneSpawner exists for Avian.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
        TransformPlugin,
        InputPlugin,
    ));

    ember_run::game::configure_headless(&mut app);
    // Run plugin `finish`/`cleanup` as `App::run` would (Avian registers
    // its collision diagnostics resources in `finish`).
    app.finish();
    app.cleanup();
    app
}

/// Boot a headless app straight into `InGame` with a live session.
pub fn app_in_game() -> App {
    let mut app = app_headless();
    app.update();
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::InGame);
    app.update();
    app
}

pub fn state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

pub fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<Entity, F>()
        .iter(app.world())
        .count()
}
