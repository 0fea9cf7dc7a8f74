//! Enemies plugin: patrolling melee enemies that latch onto the player.
//!
//! ---------------------------
//! HOW THIS IS DESIGNED (ECS)
//! ---------------------------
//! 1) FACTS live in components: `EnemyBrain` (aggro latch + patrol route), `AttackState`,
//!    `Lifecycle`, and the shared combat components.
//!
//! 2) RULES mutate facts in predictable places:
//!    - `drive_enemies` turns the brain's `Intent` into velocity, facing and swings.
//!    - `handle_enemy_cues` reacts to attack clip keyframes.
//!    - combat (elsewhere) applies damage and moves dead enemies to `Lifecycle::Dying`.
//!
//! 3) PRESENTATION is derived from facts: the dying fade reads the `Dying` timer.
//!
//! Despawning never happens inside the step that decided it. Finished corpses get
//! `PendingDespawn` and are removed in PostUpdate.

pub mod brain;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::Occluder2d;

use crate::common::layers::enemy_body_layers;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::animation::{
    AnimationCues, AttackClip, BaseTint, ClipPlayer, Cue, HitboxCue, HurtFlash,
};
use crate::plugins::combat::attack::{AttackState, Facing, HitboxLink, Lifecycle};
use crate::plugins::combat::health::Health;
use crate::plugins::combat::hitbox::{spawn_hitbox, AttackHitbox};
use crate::plugins::combat::wiring::WiringError;
use crate::plugins::combat::{CombatSystems, Faction};
use crate::plugins::player::Player;

pub use brain::{EnemyBrain, Intent, PatrolRoute};

#[derive(Component)]
pub struct Enemy;

/// Marker: enemy should be removed from the world.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingDespawn;

const BODY_SIZE: Vec2 = Vec2::new(28.0, 36.0);
const SPAWN_XS: [f32; 6] = [300.0, 700.0, 1100.0, 1500.0, 1900.0, 2200.0];
const PATROL_HALF_SPAN: f32 = 96.0;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_enemies);

    app.add_systems(
        Update,
        (
            validate_patrol_routes.before(CombatSystems::Intent),
            drive_enemies.in_set(CombatSystems::Intent),
            handle_enemy_cues.in_set(CombatSystems::React),
            fade_dying_enemies.after(CombatSystems::Sync),
        )
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        PostUpdate,
        despawn_marked_enemies.run_if(in_state(GameState::InGame)),
    );
}

fn spawn_enemies(mut commands: Commands, tunables: Res<Tunables>) {
    let t = &tunables.enemy;
    let base = Color::srgb(0.9, 0.25, 0.25);
    let y = tunables.scenery.ground_top + BODY_SIZE.y * 0.5;

    for (i, x) in SPAWN_XS.into_iter().enumerate() {
        let route = PatrolRoute::new([x - PATROL_HALF_SPAN, x + PATROL_HALF_SPAN]);

        let enemy = commands
            .spawn((
                Name::new(format!("Enemy{i}")),
                Enemy,
                DespawnOnExit(GameState::InGame),
                (
                    Faction::Enemy,
                    Health::new(t.max_health, t.invincibility_secs),
                    AttackState::default(),
                    Facing::Left,
                    Lifecycle::Alive,
                    EnemyBrain::new(route),
                ),
                (
                    AnimationCues::default(),
                    ClipPlayer::new(AttackClip {
                        enable_at: t.hitbox_on_at,
                        disable_at: t.hitbox_off_at,
                        end_at: Some(t.attack_clip_len),
                    }),
                    BaseTint(base),
                    HurtFlash(t.invincibility_secs),
                    Sprite {
                        color: base,
                        custom_size: Some(BODY_SIZE),
                        ..default()
                    },
                ),
                (
                    Transform::from_xyz(x, y, 1.0),
                    RigidBody::Dynamic,
                    Collider::rectangle(BODY_SIZE.x, BODY_SIZE.y),
                    LockedAxes::ROTATION_LOCKED,
                    enemy_body_layers(),
                    LinearVelocity::ZERO,
                    Occluder2d::circle(BODY_SIZE.x * 0.5),
                ),
            ))
            .id();

        let hitbox = spawn_hitbox(
            &mut commands,
            enemy,
            AttackHitbox::single(enemy, t.attack_damage),
            t.hitbox_offset,
            t.hitbox_size,
        );
        commands.entity(enemy).insert(HitboxLink(hitbox));
    }

    info!("spawned {} enemies", SPAWN_XS.len());
}

/// Report unusable routes once, when the enemy appears. Such an enemy just stands still.
fn validate_patrol_routes(q: Query<(&Name, &EnemyBrain), Added<EnemyBrain>>) {
    for (name, brain) in &q {
        if brain.patrol().current().is_none() {
            warn!("{name}: invalid patrol route");
        }
    }
}

/// Turn each living enemy's intent into motion and swings.
///
/// Only `vx` is driven; `vy` stays with gravity.
pub fn drive_enemies(
    time: Res<Time>,
    tunables: Res<Tunables>,
    q_player: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut q: Query<
        (
            &Name,
            &Transform,
            &Lifecycle,
            &mut EnemyBrain,
            &mut AttackState,
            &mut LinearVelocity,
            &mut Facing,
            &mut ClipPlayer,
            &mut AnimationCues,
        ),
        With<Enemy>,
    >,
    mut reported_missing: Local<bool>,
) {
    let Ok(player_tf) = q_player.single() else {
        if !*reported_missing && !q.is_empty() {
            warn!("{}", WiringError::MissingPlayer { owner: "enemies".into() });
            *reported_missing = true;
        }
        return;
    };
    *reported_missing = false;

    let now = time.elapsed_secs();
    let t = &tunables.enemy;
    let player = player_tf.translation.truncate();

    for (name, tf, life, mut brain, mut attack, mut vel, mut facing, mut clip, mut cues) in &mut q {
        if !life.is_alive() {
            continue;
        }

        let me = tf.translation.truncate();
        let cooldown_ready = attack.cooldown_ready(now, t.attack_cooldown);

        match brain.think(me, player, attack.is_attacking(), cooldown_ready, t) {
            Intent::Busy => {}
            Intent::Hold => {
                vel.x = 0.0;
                cues.running = false;
            }
            Intent::Attack => {
                vel.x = 0.0;
                cues.running = false;
                if attack.begin(now, None) {
                    clip.play();
                    cues.trigger_attack();
                    debug!("{name} started attack");
                }
            }
            Intent::Walk { dir_x } => {
                vel.x = dir_x * t.move_speed;
                cues.running = true;
                if let Some(dir) = Facing::from_direction(dir_x) {
                    facing.set_if_neq(dir);
                }
            }
            Intent::Lost => {
                vel.x = 0.0;
                cues.running = false;
            }
        }
    }
}

pub fn handle_enemy_cues(
    mut cues_in: MessageReader<HitboxCue>,
    mut q: Query<
        (&Name, &Lifecycle, &mut AttackState, &HitboxLink, &mut AnimationCues),
        With<Enemy>,
    >,
    mut q_hitboxes: Query<&mut AttackHitbox>,
) {
    for ev in cues_in.read() {
        let Ok((name, life, mut attack, link, mut cues)) = q.get_mut(ev.entity) else {
            continue;
        };
        let Ok(mut hitbox) = q_hitboxes.get_mut(link.0) else {
            continue;
        };

        match ev.cue {
            Cue::EnableHitbox => {
                if life.is_alive() && attack.is_attacking() {
                    hitbox.arm();
                    debug!("{name} enabled attack hitbox");
                } else {
                    debug!(
                        "{name} failed to enable hitbox (alive: {}, attacking: {})",
                        life.is_alive(),
                        attack.is_attacking()
                    );
                }
            }
            Cue::DisableHitbox => hitbox.disarm(),
            Cue::EndAttack => {
                attack.end();
                cues.end_attack();
                hitbox.disarm();
                hitbox.reset_hits();
                debug!("{name} ended attack");
            }
        }
    }
}

/// Shrink and fade dying enemies, then mark them for removal.
pub fn fade_dying_enemies(
    time: Res<Time>,
    mut commands: Commands,
    mut q: Query<
        (Entity, &mut Lifecycle, &mut Sprite, &mut Transform),
        (With<Enemy>, Without<PendingDespawn>),
    >,
) {
    for (e, mut life, mut sprite, mut tf) in &mut q {
        let Lifecycle::Dying { timer } = &mut *life else {
            continue;
        };

        timer.tick(time.delta());

        let dur = timer.duration().as_secs_f32().max(0.0001);
        let t = (timer.elapsed_secs() / dur).clamp(0.0, 1.0);

        tf.scale = Vec3::splat(1.0 - 0.5 * t);
        let mut c = sprite.color.to_srgba();
        c.alpha = 1.0 - t;
        sprite.color = c.into();

        if timer.is_finished() {
            *life = Lifecycle::Disabled;
            commands.entity(e).insert(PendingDespawn);
        }
    }
}

fn despawn_marked_enemies(mut commands: Commands, q: Query<Entity, With<PendingDespawn>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}

#[cfg(test)]
mod tests;
