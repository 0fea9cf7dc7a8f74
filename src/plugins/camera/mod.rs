//! Camera plugin (render-only).
//!
//! A system cannot have `Query<&Transform>` and `Query<&mut Transform>` at the same time
//! unless Bevy can prove those queries are disjoint, so the player and camera queries carry
//! `Without<...>` filters.
//!
//! ```text
//! OnEnter(InGame): spawn MainCamera -> write MainCameraEntity resource
//! PostUpdate:      follow_player (CameraSystems::Follow), then scenery reads the camera
//! ```

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::player::Player;

#[derive(Component)]
pub struct MainCamera {
    pub responsiveness: f32,
    /// World-space offset from the player; keeps more of the level ahead in view.
    pub lead: Vec2,
}

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct MainCameraEntity(pub Option<Entity>);

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraSystems {
    Follow,
}

pub fn plugin(app: &mut App) {
    app.init_resource::<MainCameraEntity>()
        .add_systems(OnEnter(GameState::InGame), spawn_camera)
        .add_systems(
            PostUpdate,
            follow_player
                .in_set(CameraSystems::Follow)
                .before(TransformSystems::Propagate)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn_camera(mut commands: Commands) {
    let e = commands
        .spawn((
            Name::new("MainCamera"),
            Camera2d,
            MainCamera {
                responsiveness: 5.0,
                lead: Vec2::new(120.0, 80.0),
            },
            FireflyConfig::default(),
            Transform::from_xyz(0.0, 0.0, 999.0),
            DespawnOnExit(GameState::InGame),
        ))
        .id();

    commands.insert_resource(MainCameraEntity(Some(e)));
}

/// Exponential smoothing factor for a frame of length `dt`.
#[inline]
pub fn follow_alpha(responsiveness: f32, dt: f32) -> f32 {
    1.0 - (-responsiveness * dt).exp()
}

fn follow_player(
    time: Res<Time>,
    cam_e: Res<MainCameraEntity>,
    q_player: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    mut q_cam: Query<(&mut Transform, &MainCamera), Without<Player>>,
) {
    let Some(cam) = cam_e.0 else { return; };
    let Ok(tf_player) = q_player.single() else { return; };
    let Ok((mut tf_cam, main_cam)) = q_cam.get_mut(cam) else { return; };

    let alpha = follow_alpha(main_cam.responsiveness, time.delta_secs());
    let target = tf_player.translation.truncate() + main_cam.lead;

    tf_cam.translation.x += (target.x - tf_cam.translation.x) * alpha;
    tf_cam.translation.y += (target.y - tf_cam.translation.y) * alpha;
}
