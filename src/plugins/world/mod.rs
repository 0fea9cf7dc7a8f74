//! World plugin: the ground strip and the left boundary wall.
//!
//! The ground is two tiles laid end to end. The scenery plugin leapfrogs them ahead of the
//! camera, so the level runs on indefinitely to the right.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::world_layers;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;

/// A repeating ground segment of the given width.
#[derive(Component, Debug, Clone, Copy)]
pub struct GroundTile {
    pub width: f32,
}

const WALL_X: f32 = -700.0;
const WALL_SIZE: Vec2 = Vec2::new(40.0, 1200.0);

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), (spawn_ground, spawn_wall));
}

fn spawn_ground(mut commands: Commands, tunables: Res<Tunables>) {
    let s = &tunables.scenery;
    let size = Vec2::new(s.ground_width, s.ground_height);
    let y = s.ground_top - s.ground_height * 0.5;

    for i in 0..2 {
        let x = WALL_X + s.ground_width * (i as f32 + 0.5);
        let color = if i % 2 == 0 {
            Color::srgb(0.22, 0.16, 0.12)
        } else {
            Color::srgb(0.20, 0.15, 0.11)
        };

        commands.spawn((
            Name::new(format!("Ground{i}")),
            GroundTile { width: s.ground_width },
            Sprite::from_color(color, size),
            Transform::from_xyz(x, y, 0.0),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            world_layers(),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

fn spawn_wall(mut commands: Commands, tunables: Res<Tunables>) {
    let y = tunables.scenery.ground_top + WALL_SIZE.y * 0.5;

    commands.spawn((
        Name::new("WallLeft"),
        Sprite::from_color(Color::srgb(0.25, 0.27, 0.33), WALL_SIZE),
        Transform::from_xyz(WALL_X - WALL_SIZE.x * 0.5, y, 0.0),
        RigidBody::Static,
        Collider::rectangle(WALL_SIZE.x, WALL_SIZE.y),
        world_layers(),
        DespawnOnExit(GameState::InGame),
    ));
}
