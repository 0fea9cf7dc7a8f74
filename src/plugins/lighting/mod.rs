//! Lighting plugin (Firefly) (render-only).
//!
//! An ember light rides with the player and flickers on the virtual clock, so it holds still
//! while the session is paused. Enemies carry `Occluder2d`s and cast shadows in it.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::combat::attack::Lifecycle;
use crate::plugins::player::Player;

#[derive(Component, Debug, Clone, Copy)]
pub struct EmberLight {
    pub base_range: f32,
    /// Fraction of `base_range` the flicker swings by.
    pub flicker: f32,
}

const LIT: Color = Color::srgb(1.0, 0.78, 0.5);
const DOWNED: Color = Color::srgb(0.55, 0.35, 0.3);
/// Light shrinks to this fraction of its range once the player is down.
const DOWNED_RANGE: f32 = 0.4;

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<FireflyPlugin>() {
        app.add_plugins(FireflyPlugin);
    }

    app.add_systems(OnEnter(GameState::InGame), spawn_ember_light)
        .add_systems(
            Update,
            (track_player, flicker).chain().run_if(in_state(GameState::InGame)),
        );
}

/// Range of a flickering light at time `t` (two detuned sines).
pub fn flicker_range(base: f32, amount: f32, t: f32) -> f32 {
    let wobble = 0.6 * (t * 7.3).sin() + 0.4 * (t * 13.1 + 1.7).sin();
    base * (1.0 + amount * wobble)
}

fn spawn_ember_light(mut commands: Commands) {
    let ember = EmberLight {
        base_range: 450.0,
        flicker: 0.05,
    };
    commands.spawn((
        Name::new("EmberLight"),
        ember,
        PointLight2d {
            color: LIT,
            range: ember.base_range,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn track_player(
    q_player: Query<(&Transform, &Lifecycle), (With<Player>, Without<EmberLight>)>,
    mut q_light: Query<(&mut Transform, &mut EmberLight, &mut PointLight2d), Without<Player>>,
) {
    let Ok((tf_player, life)) = q_player.single() else { return; };
    let Ok((mut tf_light, mut ember, mut light)) = q_light.single_mut() else { return; };

    tf_light.translation.x = tf_player.translation.x;
    tf_light.translation.y = tf_player.translation.y;

    if !life.is_alive() && light.color != DOWNED {
        light.color = DOWNED;
        ember.base_range *= DOWNED_RANGE;
        ember.flicker = 0.0;
    }
}

fn flicker(time: Res<Time<Virtual>>, mut q: Query<(&EmberLight, &mut PointLight2d)>) {
    let t = time.elapsed_secs();
    for (ember, mut light) in &mut q {
        light.range = flicker_range(ember.base_range, ember.flicker, t);
    }
}
