//! Player plugin.
//!
//! Pipeline:
//! - Update: sample input into `PlayerInput`, start/finish swings, react to clip cues
//! - FixedUpdate: read the ground probe, apply horizontal velocity and jumps
//!
//! API note (Bevy >= 0.18):
//! - Prefer `single_mut()` with `let … else` for the one player entity. A missing player
//!   (not spawned yet, or already torn down) is a normal frame, not an error.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::{player_body_layers, Layer};
use crate::common::{state::GameState, tunables::Tunables};
use crate::plugins::animation::{
    AnimationCues, AttackClip, BaseTint, ClipPlayer, Cue, HitboxCue, HurtFlash,
};
use crate::plugins::combat::attack::{AttackState, Facing, HitboxLink, Lifecycle};
use crate::plugins::combat::health::Health;
use crate::plugins::combat::hitbox::{spawn_hitbox, AttackHitbox};
use crate::plugins::combat::{CombatSystems, Faction};
use crate::plugins::session;

#[derive(Component)]
pub struct Player;

/// Whether the ground probe currently touches an upward-facing surface.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Grounded(pub bool);

/// Sampled once per frame. `jump_pressed` is latched until the fixed step consumes it.
#[derive(Resource, Default, Debug)]
pub struct PlayerInput {
    pub move_x: f32,
    pub jump_pressed: bool,
    pub attack_pressed: bool,
}

const BODY_SIZE: Vec2 = Vec2::new(24.0, 40.0);
const PROBE_SIZE: Vec2 = Vec2::new(20.0, 2.0);

pub fn plugin(app: &mut App) {
    app.init_resource::<PlayerInput>()
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(
            Update,
            (
                gather_input
                    .before(CombatSystems::Intent)
                    .run_if(session::is_playing),
                (start_attack, finish_attack)
                    .chain()
                    .in_set(CombatSystems::Intent),
                handle_hitbox_cues.in_set(CombatSystems::React),
            )
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedUpdate,
            (update_grounded, apply_movement)
                .chain()
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn(mut commands: Commands, tunables: Res<Tunables>) {
    let t = &tunables.player;
    let base = Color::srgb(0.2, 0.75, 0.9);

    let probe = ShapeCaster::new(
        Collider::rectangle(PROBE_SIZE.x, PROBE_SIZE.y),
        Vec2::ZERO,
        0.0,
        Dir2::NEG_Y,
    )
    .with_max_distance(BODY_SIZE.y * 0.5 + 1.0)
    .with_query_filter(SpatialQueryFilter::from_mask(Layer::World));

    let player = commands
        .spawn((
            Name::new("Player"),
            Player,
            DespawnOnExit(GameState::InGame),
            (
                Faction::Player,
                Health::new(t.max_health, t.invincibility_secs),
                AttackState::default(),
                Facing::Right,
                Lifecycle::Alive,
                Grounded::default(),
            ),
            (
                AnimationCues::default(),
                ClipPlayer::new(AttackClip {
                    enable_at: t.hitbox_on_at,
                    disable_at: t.hitbox_off_at,
                    end_at: None,
                }),
                BaseTint(base),
                HurtFlash(t.hurt_flash_secs),
                Sprite {
                    color: base,
                    custom_size: Some(BODY_SIZE),
                    ..default()
                },
            ),
            (
                Transform::from_xyz(0.0, 0.0, 2.0),
                RigidBody::Dynamic,
                Collider::rectangle(BODY_SIZE.x, BODY_SIZE.y),
                LockedAxes::ROTATION_LOCKED,
                player_body_layers(),
                LinearVelocity::ZERO,
                probe,
            ),
        ))
        .id();

    let hitbox = spawn_hitbox(
        &mut commands,
        player,
        AttackHitbox::cleaving(player, t.attack_damage),
        t.hitbox_offset,
        t.hitbox_size,
    );
    commands.entity(player).insert(HitboxLink(hitbox));
}

fn gather_input(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mouse: Option<Res<ButtonInput<MouseButton>>>,
    mut input: ResMut<PlayerInput>,
) {
    let Some(keys) = keys else { return; };

    let mut axis = 0.0;
    if keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        axis -= 1.0;
    }
    if keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        axis += 1.0;
    }
    input.move_x = axis;

    if keys.any_just_pressed([KeyCode::Space, KeyCode::KeyW, KeyCode::ArrowUp]) {
        input.jump_pressed = true;
    }

    let clicked = mouse.is_some_and(|m| m.just_pressed(MouseButton::Left));
    input.attack_pressed = clicked || keys.just_pressed(KeyCode::KeyJ);
}

/// Horizontal velocity for a movement axis; the player plants their feet while swinging.
#[inline]
pub fn horizontal_velocity(move_x: f32, speed: f32, attacking: bool) -> f32 {
    if attacking { 0.0 } else { move_x.clamp(-1.0, 1.0) * speed }
}

/// A probe hit counts as ground when the surface faces up.
pub fn touches_ground(normals: impl IntoIterator<Item = Vec2>) -> bool {
    normals.into_iter().any(|n| n.y > 0.5)
}

fn update_grounded(
    mut q: Query<(&ShapeHits, &mut Grounded, &mut AnimationCues), With<Player>>,
) {
    let Ok((hits, mut grounded, mut cues)) = q.single_mut() else {
        return;
    };
    let now = touches_ground(hits.iter().map(|hit| hit.normal1));
    if now && !grounded.0 {
        cues.jumping = false;
    }
    grounded.set_if_neq(Grounded(now));
}

pub fn apply_movement(
    tunables: Res<Tunables>,
    mut input: ResMut<PlayerInput>,
    mut q: Query<
        (
            &Lifecycle,
            &AttackState,
            &mut Grounded,
            &mut LinearVelocity,
            &mut Facing,
            &mut AnimationCues,
        ),
        With<Player>,
    >,
) {
    let jump = std::mem::take(&mut input.jump_pressed);
    let Ok((life, attack, mut grounded, mut vel, mut facing, mut cues)) = q.single_mut() else {
        return;
    };
    if !life.is_alive() {
        return;
    }

    let attacking = attack.is_attacking();
    vel.x = horizontal_velocity(input.move_x, tunables.player.move_speed, attacking);
    cues.running = vel.x != 0.0;
    if !attacking {
        if let Some(dir) = Facing::from_direction(input.move_x) {
            facing.set_if_neq(dir);
        }
    }

    if jump && grounded.0 {
        vel.y = tunables.player.jump_speed;
        cues.jumping = true;
        grounded.0 = false;
    } else if vel.y < 0.0 && !grounded.0 {
        cues.jumping = false;
    }
}

pub fn start_attack(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut input: ResMut<PlayerInput>,
    mut q: Query<(&Lifecycle, &mut AttackState, &mut ClipPlayer, &mut AnimationCues), With<Player>>,
) {
    if !std::mem::take(&mut input.attack_pressed) {
        return;
    }
    let Ok((life, mut attack, mut clip, mut cues)) = q.single_mut() else {
        return;
    };
    if !life.is_alive() {
        return;
    }

    if attack.begin(time.elapsed_secs(), Some(tunables.player.attack_duration)) {
        clip.play();
        cues.trigger_attack();
        debug!("player started attack");
    }
}

/// End the swing once its fixed duration has elapsed.
pub fn finish_attack(
    time: Res<Time>,
    mut q: Query<(&mut AttackState, &HitboxLink, &mut AnimationCues), With<Player>>,
    mut q_hitboxes: Query<&mut AttackHitbox>,
) {
    let Ok((mut attack, link, mut cues)) = q.single_mut() else {
        return;
    };
    if !attack.expired(time.elapsed_secs()) {
        return;
    }

    attack.end();
    cues.end_attack();
    if let Ok(mut hitbox) = q_hitboxes.get_mut(link.0) {
        hitbox.disarm();
    }
    debug!("player ended attack");
}

pub fn handle_hitbox_cues(
    mut cues_in: MessageReader<HitboxCue>,
    mut q: Query<(&Lifecycle, &mut AttackState, &HitboxLink, &mut AnimationCues), With<Player>>,
    mut q_hitboxes: Query<&mut AttackHitbox>,
) {
    for ev in cues_in.read() {
        let Ok((life, mut attack, link, mut cues)) = q.get_mut(ev.entity) else {
            continue;
        };
        let Ok(mut hitbox) = q_hitboxes.get_mut(link.0) else {
            continue;
        };

        match ev.cue {
            Cue::EnableHitbox if life.is_alive() => {
                hitbox.arm();
                debug!("player hitbox enabled");
            }
            Cue::EnableHitbox => debug!("player hitbox cue ignored after death"),
            Cue::DisableHitbox => hitbox.disarm(),
            Cue::EndAttack => {
                attack.end();
                cues.end_attack();
                hitbox.disarm();
            }
        }
    }
}

#[cfg(test)]
mod tests;
