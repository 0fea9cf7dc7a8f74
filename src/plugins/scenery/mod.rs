//! Scenery plugin (render-only): parallax backdrop and the ground leapfrog.
//!
//! Both read the camera after it has followed the player for the frame, and before transforms
//! propagate, so nothing lags a frame behind.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::camera::{CameraSystems, MainCamera};
use crate::plugins::world::GroundTile;

/// A background layer scrolling at `factor` of the camera's horizontal motion.
#[derive(Component, Debug, Clone, Copy)]
pub struct ParallaxLayer {
    pub origin_x: f32,
    pub factor: f32,
}

const LAYER_COLORS: [Color; 3] = [
    Color::srgb(0.20, 0.12, 0.14),
    Color::srgb(0.16, 0.10, 0.13),
    Color::srgb(0.12, 0.08, 0.11),
];

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_backdrop)
        .add_systems(
            PostUpdate,
            (repeat_ground, apply_parallax)
                .after(CameraSystems::Follow)
                .before(TransformSystems::Propagate)
                .run_if(in_state(GameState::InGame)),
        );
}

/// New x for a tile that fell too far behind the camera, or `None` if it stays put.
#[inline]
pub fn leapfrog_x(tile_x: f32, width: f32, camera_x: f32, check_offset: f32) -> Option<f32> {
    (tile_x + width < camera_x - check_offset).then_some(tile_x + 2.0 * width)
}

#[inline]
pub fn parallax_x(origin_x: f32, camera_x: f32, factor: f32) -> f32 {
    origin_x + camera_x * factor
}

fn spawn_backdrop(mut commands: Commands, tunables: Res<Tunables>) {
    let s = &tunables.scenery;

    for (depth, (&factor, color)) in s.parallax_factors.iter().zip(LAYER_COLORS).enumerate() {
        let height = 260.0 + 90.0 * depth as f32;
        let y = s.ground_top + height * 0.5;
        // nearer layers sit in front of farther ones, all behind the ground
        let z = -10.0 + depth as f32 * -1.0;

        commands.spawn((
            Name::new(format!("Backdrop{depth}")),
            ParallaxLayer { origin_x: 0.0, factor },
            Sprite::from_color(color, Vec2::new(s.ground_width * 3.0, height)),
            Transform::from_xyz(0.0, y, z),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

fn repeat_ground(
    tunables: Res<Tunables>,
    q_cam: Query<&Transform, (With<MainCamera>, Without<GroundTile>)>,
    mut q_tiles: Query<(&Name, &GroundTile, &mut Transform), Without<MainCamera>>,
) {
    let Ok(cam) = q_cam.single() else { return; };
    let offset = tunables.scenery.ground_check_offset;

    for (name, tile, mut tf) in &mut q_tiles {
        if let Some(x) = leapfrog_x(tf.translation.x, tile.width, cam.translation.x, offset) {
            tf.translation.x = x;
            debug!("{name} moved ahead to x={x}");
        }
    }
}

fn apply_parallax(
    q_cam: Query<&Transform, (With<MainCamera>, Without<ParallaxLayer>)>,
    mut q_layers: Query<(&ParallaxLayer, &mut Transform), Without<MainCamera>>,
) {
    let Ok(cam) = q_cam.single() else { return; };

    for (layer, mut tf) in &mut q_layers {
        tf.translation.x = parallax_x(layer.origin_x, cam.translation.x, layer.factor);
    }
}
