//! Tunable gameplay constants.
//!
//! Distances are world pixels. Authored values were in meters; `pixels_per_meter` is the
//! conversion factor used when deriving the defaults below.

use bevy::prelude::*;

const PPM: f32 = 32.0;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    pub gravity: f32,
    pub player: PlayerTunables,
    pub enemy: EnemyTunables,
    pub session: SessionTunables,
    pub scenery: SceneryTunables,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: PPM,
            gravity: 9.81 * 2.5 * PPM,
            player: PlayerTunables::default(),
            enemy: EnemyTunables::default(),
            session: SessionTunables::default(),
            scenery: SceneryTunables::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlayerTunables {
    pub move_speed: f32,
    pub jump_speed: f32,
    pub max_health: i32,
    pub invincibility_secs: f32,
    pub hurt_flash_secs: f32,
    pub attack_duration: f32,
    pub attack_damage: i32,
    /// Keyframe offsets of the swing clip, seconds from attack start.
    pub hitbox_on_at: f32,
    pub hitbox_off_at: f32,
    pub hitbox_offset: Vec2,
    pub hitbox_size: Vec2,
}

impl Default for PlayerTunables {
    fn default() -> Self {
        Self {
            move_speed: 8.0 * PPM,
            jump_speed: 13.0 * PPM,
            max_health: 5,
            invincibility_secs: 0.5,
            hurt_flash_secs: 0.1,
            attack_duration: 0.5,
            attack_damage: 2,
            hitbox_on_at: 0.1,
            hitbox_off_at: 0.35,
            hitbox_offset: Vec2::new(30.0, 0.0),
            hitbox_size: Vec2::new(36.0, 40.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnemyTunables {
    pub move_speed: f32,
    pub aggro_range: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub attack_damage: i32,
    pub max_health: i32,
    pub invincibility_secs: f32,
    pub death_delay: f32,
    /// Distance at which a patrol point counts as reached.
    pub patrol_reach: f32,
    pub hitbox_on_at: f32,
    pub hitbox_off_at: f32,
    pub attack_clip_len: f32,
    pub hitbox_offset: Vec2,
    pub hitbox_size: Vec2,
}

impl Default for EnemyTunables {
    fn default() -> Self {
        Self {
            move_speed: 2.0 * PPM,
            aggro_range: 5.0 * PPM,
            attack_range: 1.5 * PPM,
            attack_cooldown: 2.0,
            attack_damage: 2,
            max_health: 5,
            invincibility_secs: 0.1,
            death_delay: 2.0,
            patrol_reach: 0.2 * PPM,
            hitbox_on_at: 0.25,
            hitbox_off_at: 0.45,
            attack_clip_len: 0.7,
            hitbox_offset: Vec2::new(28.0, 0.0),
            hitbox_size: Vec2::new(34.0, 36.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionTunables {
    pub max_health: i32,
    pub victory_kills: u32,
}

impl Default for SessionTunables {
    fn default() -> Self {
        Self { max_health: 5, victory_kills: 5 }
    }
}

#[derive(Debug, Clone)]
pub struct SceneryTunables {
    pub ground_width: f32,
    pub ground_height: f32,
    pub ground_top: f32,
    /// How far behind the camera a ground tile may fall before it is moved ahead.
    pub ground_check_offset: f32,
    pub parallax_factors: [f32; 3],
}

impl Default for SceneryTunables {
    fn default() -> Self {
        Self {
            ground_width: 50.0 * PPM,
            ground_height: 64.0,
            ground_top: -200.0,
            ground_check_offset: 20.0 * PPM,
            parallax_factors: [0.8, 0.6, 0.4],
        }
    }
}
