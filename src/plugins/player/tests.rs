use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::test_utils::{clear_messages, ensure_messages, run_system_once, set_clock};
use crate::common::tunables::Tunables;
use crate::plugins::animation::{AnimationCues, AttackClip, ClipPlayer, Cue, HitboxCue};
use crate::plugins::combat::attack::{AttackState, Facing, HitboxLink, Lifecycle};
use crate::plugins::combat::hitbox::{AttackHitbox, HitVerdict, IgnoreReason};
use crate::plugins::combat::Faction;

use super::{Grounded, Player, PlayerInput};

/// A player without a physics body: just what the controller systems touch.
fn bare_player(world: &mut World) -> (Entity, Entity) {
    let tunables = Tunables::default();
    let player = world
        .spawn((
            Player,
            Lifecycle::Alive,
            AttackState::default(),
            Grounded(true),
            LinearVelocity::ZERO,
            Facing::Right,
            AnimationCues::default(),
            ClipPlayer::new(AttackClip {
                enable_at: tunables.player.hitbox_on_at,
                disable_at: tunables.player.hitbox_off_at,
                end_at: None,
            }),
        ))
        .id();
    let hitbox = world
        .spawn(AttackHitbox::cleaving(player, tunables.player.attack_damage))
        .id();
    world.entity_mut(player).insert(HitboxLink(hitbox));
    world.insert_resource(tunables);
    world.init_resource::<PlayerInput>();
    (player, hitbox)
}

fn velocity(world: &World, e: Entity) -> Vec2 {
    world.get::<LinearVelocity>(e).map(|v| v.0).unwrap_or(Vec2::NAN)
}

#[test]
fn spawn_creates_player_with_linked_hitbox() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    run_system_once(&mut world, super::spawn);

    let (player, link) = world
        .query_filtered::<(Entity, &HitboxLink), With<Player>>()
        .single(&world)
        .expect("one player");
    let hitbox = world.get::<AttackHitbox>(link.0).expect("linked hitbox");
    assert_eq!(hitbox.owner, player);
    assert!(!hitbox.is_armed());
}

#[test]
fn movement_sets_horizontal_velocity_and_facing() {
    let mut world = World::new();
    let (player, _) = bare_player(&mut world);
    world.resource_mut::<PlayerInput>().move_x = -1.0;

    run_system_once(&mut world, super::apply_movement);

    let speed = world.resource::<Tunables>().player.move_speed;
    assert_eq!(velocity(&world, player), Vec2::new(-speed, 0.0));
    assert_eq!(world.get::<Facing>(player), Some(&Facing::Left));
    assert!(world.get::<AnimationCues>(player).is_some_and(|c| c.running));
}

#[test]
fn attacking_player_stands_still() {
    assert_eq!(super::horizontal_velocity(1.0, 256.0, true), 0.0);
    assert_eq!(super::horizontal_velocity(1.0, 256.0, false), 256.0);
}

#[test]
fn jump_requires_ground() {
    let mut world = World::new();
    let (player, _) = bare_player(&mut world);
    let jump_speed = world.resource::<Tunables>().player.jump_speed;

    world.resource_mut::<PlayerInput>().jump_pressed = true;
    run_system_once(&mut world, super::apply_movement);
    assert_eq!(velocity(&world, player).y, jump_speed);
    assert_eq!(world.get::<Grounded>(player), Some(&Grounded(false)));

    // airborne: a second press is swallowed
    if let Some(mut v) = world.get_mut::<LinearVelocity>(player) {
        v.0.y = 10.0;
    }
    world.resource_mut::<PlayerInput>().jump_pressed = true;
    run_system_once(&mut world, super::apply_movement);
    assert_eq!(velocity(&world, player).y, 10.0);
    assert!(!world.resource::<PlayerInput>().jump_pressed);
}

#[test]
fn ground_needs_upward_normal() {
    assert!(super::touches_ground([Vec2::Y]));
    assert!(!super::touches_ground([Vec2::X, Vec2::NEG_Y]));
    assert!(!super::touches_ground(std::iter::empty()));
}

#[test]
fn attack_press_starts_one_swing() {
    let mut world = World::new();
    let (player, _) = bare_player(&mut world);
    set_clock(&mut world, 2.0, 0.0);

    world.resource_mut::<PlayerInput>().attack_pressed = true;
    run_system_once(&mut world, super::start_attack);

    let attack = world.get::<AttackState>(player).expect("attack state");
    assert!(attack.is_attacking());
    assert_eq!(attack.last_started(), Some(2.0));
    assert!(world.get::<ClipPlayer>(player).is_some_and(ClipPlayer::is_playing));

    // re-entrancy: a press mid-swing does not restart it
    set_clock(&mut world, 2.2, 0.0);
    world.resource_mut::<PlayerInput>().attack_pressed = true;
    run_system_once(&mut world, super::start_attack);
    assert_eq!(
        world.get::<AttackState>(player).and_then(AttackState::last_started),
        Some(2.0)
    );
}

#[test]
fn swing_ends_at_deadline_and_disarms() {
    let mut world = World::new();
    let (player, hitbox) = bare_player(&mut world);
    set_clock(&mut world, 1.0, 0.0);
    world.resource_mut::<PlayerInput>().attack_pressed = true;
    run_system_once(&mut world, super::start_attack);
    if let Some(mut h) = world.get_mut::<AttackHitbox>(hitbox) {
        h.arm();
    }

    set_clock(&mut world, 1.3, 0.0);
    run_system_once(&mut world, super::finish_attack);
    assert!(world.get::<AttackState>(player).is_some_and(AttackState::is_attacking));

    set_clock(&mut world, 1.6, 0.0);
    run_system_once(&mut world, super::finish_attack);
    assert!(!world.get::<AttackState>(player).is_some_and(AttackState::is_attacking));
    assert!(!world.get::<AttackHitbox>(hitbox).is_some_and(AttackHitbox::is_armed));
}

#[test]
fn enable_cue_is_ignored_once_disabled() {
    let mut world = World::new();
    let (player, hitbox) = bare_player(&mut world);
    ensure_messages::<HitboxCue>(&mut world);
    world.entity_mut(player).insert(Lifecycle::Disabled);

    world.write_message(HitboxCue {
        entity: player,
        cue: Cue::EnableHitbox,
    });
    run_system_once(&mut world, super::handle_hitbox_cues);

    assert!(!world.get::<AttackHitbox>(hitbox).is_some_and(AttackHitbox::is_armed));
}

#[test]
fn enable_then_disable_cues_toggle_hitbox() {
    let mut world = World::new();
    let (player, hitbox) = bare_player(&mut world);
    ensure_messages::<HitboxCue>(&mut world);

    world.write_message(HitboxCue {
        entity: player,
        cue: Cue::EnableHitbox,
    });
    run_system_once(&mut world, super::handle_hitbox_cues);
    assert!(world.get::<AttackHitbox>(hitbox).is_some_and(AttackHitbox::is_armed));

    clear_messages::<HitboxCue>(&mut world);
    world.write_message(HitboxCue {
        entity: player,
        cue: Cue::DisableHitbox,
    });
    run_system_once(&mut world, super::handle_hitbox_cues);
    assert!(!world.get::<AttackHitbox>(hitbox).is_some_and(AttackHitbox::is_armed));
}

#[test]
fn duplicate_enable_cue_does_not_reopen_the_swing() {
    let mut world = World::new();
    let (player, hitbox) = bare_player(&mut world);
    let enemy = world.spawn_empty().id();
    ensure_messages::<HitboxCue>(&mut world);

    world.write_message(HitboxCue {
        entity: player,
        cue: Cue::EnableHitbox,
    });
    run_system_once(&mut world, super::handle_hitbox_cues);
    let first = world
        .get_mut::<AttackHitbox>(hitbox)
        .map(|mut h| h.on_overlap_begin(enemy, Faction::Enemy, true, false));
    assert_eq!(first, Some(HitVerdict::Hit { damage: 2 }));

    clear_messages::<HitboxCue>(&mut world);
    world.write_message(HitboxCue {
        entity: player,
        cue: Cue::EnableHitbox,
    });
    run_system_once(&mut world, super::handle_hitbox_cues);
    let second = world
        .get_mut::<AttackHitbox>(hitbox)
        .map(|mut h| h.on_overlap_begin(enemy, Faction::Enemy, true, false));
    assert_eq!(second, Some(HitVerdict::Ignored(IgnoreReason::AlreadyHit)));
}
