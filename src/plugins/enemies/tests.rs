//! Unit tests for the enemies module.
//!
//! Brain decisions are tested as plain values; the systems are run once on a bare `World`
//! with hand-placed components instead of the physics pipeline.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::test_utils::{ensure_messages, run_system_once, set_clock};
use crate::common::tunables::{EnemyTunables, Tunables};
use crate::plugins::animation::{AnimationCues, AttackClip, ClipPlayer, Cue, HitboxCue};
use crate::plugins::combat::attack::{AttackState, Facing, HitboxLink, Lifecycle};
use crate::plugins::combat::hitbox::AttackHitbox;
use crate::plugins::player::Player;

use super::brain::{EnemyBrain, Intent, PatrolRoute};
use super::{Enemy, PendingDespawn};

fn tunables() -> EnemyTunables {
    EnemyTunables::default()
}

// -----------------------------------------------------------------------------
// Brain
// -----------------------------------------------------------------------------

#[test]
fn two_point_patrol_alternates_and_never_attacks() {
    let t = tunables();
    let mut brain = EnemyBrain::new(PatrolRoute::new([0.0, 100.0]));
    let far_player = Vec2::new(10_000.0, 0.0);

    let mut x = 50.0;
    let mut visited = Vec::new();
    for _ in 0..2_000 {
        let intent = brain.think(Vec2::new(x, 0.0), far_player, false, true, &t);
        let Intent::Walk { dir_x } = intent else {
            panic!("patrolling enemy chose {intent:?}");
        };
        x += dir_x * 2.0;
        if visited.last() != Some(&brain.patrol().index()) {
            visited.push(brain.patrol().index());
        }
    }

    assert!(!brain.is_aggro());
    assert!(visited.len() > 3, "route never cycled: {visited:?}");
    assert!(x >= -t.patrol_reach && x <= 100.0 + t.patrol_reach);
}

#[test]
fn aggro_latches_and_never_reverts() {
    let t = tunables();
    let mut brain = EnemyBrain::new(PatrolRoute::new([0.0, 100.0]));

    let near = Vec2::new(t.aggro_range - 1.0, 0.0);
    brain.think(Vec2::ZERO, near, false, true, &t);
    assert!(brain.is_aggro());

    let far = Vec2::new(t.aggro_range * 10.0, 0.0);
    let intent = brain.think(Vec2::ZERO, far, false, true, &t);
    assert!(brain.is_aggro());
    assert_eq!(intent, Intent::Walk { dir_x: 1.0 });
}

#[test]
fn aggro_enemy_attacks_in_range_only_when_cooled_down() {
    let t = tunables();
    let mut brain = EnemyBrain::new(PatrolRoute::default());
    let player = Vec2::new(t.attack_range * 0.5, 0.0);

    assert_eq!(brain.think(Vec2::ZERO, player, false, true, &t), Intent::Attack);
    assert_eq!(brain.think(Vec2::ZERO, player, false, false, &t), Intent::Hold);
    assert_eq!(brain.think(Vec2::ZERO, player, true, true, &t), Intent::Busy);
}

#[test]
fn chase_heads_toward_player() {
    let t = tunables();
    let mut brain = EnemyBrain::new(PatrolRoute::default());
    let player = Vec2::new(-(t.attack_range + 10.0), 0.0);

    let intent = brain.think(Vec2::ZERO, player, false, true, &t);
    assert_eq!(intent, Intent::Walk { dir_x: -1.0 });
}

#[test]
fn empty_route_is_lost() {
    let t = tunables();
    let mut brain = EnemyBrain::new(PatrolRoute::default());
    let far_player = Vec2::new(10_000.0, 0.0);
    assert_eq!(brain.think(Vec2::ZERO, far_player, false, true, &t), Intent::Lost);
}

// -----------------------------------------------------------------------------
// Systems
// -----------------------------------------------------------------------------

fn spawn_enemy(world: &mut World, at: Vec2, route: PatrolRoute) -> (Entity, Entity) {
    let t = tunables();
    let enemy = world
        .spawn((
            Name::new("Grunt"),
            Enemy,
            Transform::from_translation(at.extend(0.0)),
            Lifecycle::Alive,
            EnemyBrain::new(route),
            AttackState::default(),
            LinearVelocity(Vec2::new(0.0, -5.0)),
            Facing::Left,
            ClipPlayer::new(AttackClip {
                enable_at: t.hitbox_on_at,
                disable_at: t.hitbox_off_at,
                end_at: Some(t.attack_clip_len),
            }),
            AnimationCues::default(),
        ))
        .id();
    let hitbox = world.spawn(AttackHitbox::single(enemy, t.attack_damage)).id();
    world.entity_mut(enemy).insert(HitboxLink(hitbox));
    (enemy, hitbox)
}

fn setup(world: &mut World, player_at: Vec2) {
    world.insert_resource(Tunables::default());
    set_clock(world, 10.0, 0.0);
    world.spawn((Player, Transform::from_translation(player_at.extend(0.0))));
}

#[test]
fn enemy_in_range_starts_swing_and_keeps_vertical_velocity() {
    let mut world = World::new();
    setup(&mut world, Vec2::new(20.0, 0.0));
    let (enemy, _) = spawn_enemy(&mut world, Vec2::ZERO, PatrolRoute::default());

    run_system_once(&mut world, super::drive_enemies);

    let attack = world.get::<AttackState>(enemy).expect("attack state");
    assert!(attack.is_attacking());
    assert_eq!(attack.last_started(), Some(10.0));
    assert!(world.get::<ClipPlayer>(enemy).is_some_and(ClipPlayer::is_playing));
    assert_eq!(
        world.get::<LinearVelocity>(enemy).map(|v| v.0),
        Some(Vec2::new(0.0, -5.0))
    );
}

#[test]
fn patrol_walks_toward_waypoint_and_faces_it() {
    let mut world = World::new();
    setup(&mut world, Vec2::new(10_000.0, 0.0));
    let (enemy, _) = spawn_enemy(&mut world, Vec2::ZERO, PatrolRoute::new([200.0, -200.0]));

    run_system_once(&mut world, super::drive_enemies);

    let speed = tunables().move_speed;
    assert_eq!(
        world.get::<LinearVelocity>(enemy).map(|v| v.0.x),
        Some(speed)
    );
    assert_eq!(world.get::<Facing>(enemy), Some(&Facing::Right));
}

#[test]
fn missing_player_leaves_enemies_idle() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    set_clock(&mut world, 1.0, 0.0);
    let (enemy, _) = spawn_enemy(&mut world, Vec2::ZERO, PatrolRoute::new([200.0]));

    run_system_once(&mut world, super::drive_enemies);

    assert_eq!(
        world.get::<LinearVelocity>(enemy).map(|v| v.0.x),
        Some(0.0)
    );
}

#[test]
fn enable_cue_needs_an_active_swing() {
    let mut world = World::new();
    ensure_messages::<HitboxCue>(&mut world);
    let (enemy, hitbox) = spawn_enemy(&mut world, Vec2::ZERO, PatrolRoute::default());

    world.write_message(HitboxCue {
        entity: enemy,
        cue: Cue::EnableHitbox,
    });
    run_system_once(&mut world, super::handle_enemy_cues);

    assert!(!world.get::<AttackHitbox>(hitbox).is_some_and(AttackHitbox::is_armed));
}

#[test]
fn end_cue_finishes_swing_and_resets_hitbox() {
    let mut world = World::new();
    ensure_messages::<HitboxCue>(&mut world);
    let (enemy, hitbox) = spawn_enemy(&mut world, Vec2::ZERO, PatrolRoute::default());
    if let Some(mut attack) = world.get_mut::<AttackState>(enemy) {
        attack.begin(0.0, None);
    }

    for cue in [Cue::EnableHitbox, Cue::EndAttack] {
        world.write_message(HitboxCue { entity: enemy, cue });
    }
    run_system_once(&mut world, super::handle_enemy_cues);

    assert!(!world.get::<AttackState>(enemy).is_some_and(AttackState::is_attacking));
    assert!(!world.get::<AttackHitbox>(hitbox).is_some_and(AttackHitbox::is_armed));
}

#[test]
fn dying_enemy_fades_then_is_marked_for_removal() {
    let mut world = World::new();
    let enemy = world
        .spawn((
            Enemy,
            Lifecycle::Dying {
                timer: Timer::from_seconds(2.0, TimerMode::Once),
            },
            Sprite::default(),
            Transform::default(),
        ))
        .id();

    set_clock(&mut world, 1.0, 1.0);
    run_system_once(&mut world, super::fade_dying_enemies);
    let alpha = world
        .get::<Sprite>(enemy)
        .map(|s| s.color.to_srgba().alpha)
        .unwrap_or(-1.0);
    assert!((alpha - 0.5).abs() < 1e-3);
    assert!(world.get::<PendingDespawn>(enemy).is_none());

    set_clock(&mut world, 2.5, 1.5);
    run_system_once(&mut world, super::fade_dying_enemies);
    assert!(world.get::<PendingDespawn>(enemy).is_some());
    assert!(matches!(world.get::<Lifecycle>(enemy), Some(Lifecycle::Disabled)));

    run_system_once(&mut world, super::despawn_marked_enemies);
    assert!(world.get_entity(enemy).is_err());
}

#[test]
fn spawn_places_linked_enemies() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    run_system_once(&mut world, super::spawn_enemies);

    let mut q = world.query_filtered::<(Entity, &HitboxLink), With<Enemy>>();
    let links: Vec<(Entity, Entity)> = q.iter(&world).map(|(e, l)| (e, l.0)).collect();
    assert_eq!(links.len(), super::SPAWN_XS.len());
    for (enemy, hitbox) in links {
        assert_eq!(world.get::<AttackHitbox>(hitbox).map(|h| h.owner), Some(enemy));
    }
}
