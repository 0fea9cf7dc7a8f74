//! Death handling and session notification.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::{downed_body_layers, Layer};
use crate::common::tunables::Tunables;
use crate::plugins::animation::{AnimationCues, ClipPlayer};
use crate::plugins::session::SessionReport;

use super::attack::{AttackState, HitboxLink, Lifecycle};
use super::hitbox::AttackHitbox;
use super::messages::{DamageTaken, Downed};
use super::Faction;

/// Apply the death transition to every combatant whose latch just closed.
///
/// Order matters only within one entity: stop motion, cancel the swing (deadline and clip, so
/// no stale `EnableHitbox` can fire), disarm the hitbox, then leave `Alive` for good.
pub fn resolve_downed(
    tunables: Res<Tunables>,
    mut downed: MessageReader<Downed>,
    mut q: Query<(
        &mut Lifecycle,
        &mut AttackState,
        &mut LinearVelocity,
        &mut CollisionLayers,
        Option<&HitboxLink>,
        Option<&mut ClipPlayer>,
        Option<&mut AnimationCues>,
    )>,
    mut q_hitboxes: Query<&mut AttackHitbox>,
    mut reports: MessageWriter<SessionReport>,
) {
    for &Downed { entity, faction } in downed.read() {
        let Ok((mut life, mut attack, mut vel, mut layers, link, clip, cues)) = q.get_mut(entity)
        else {
            continue;
        };
        if !life.is_alive() {
            continue;
        }

        vel.0 = Vec2::ZERO;
        attack.end();
        if let Some(mut clip) = clip {
            clip.stop();
        }
        if let Some(&HitboxLink(hitbox_e)) = link {
            if let Ok(mut hitbox) = q_hitboxes.get_mut(hitbox_e) {
                hitbox.disarm();
            }
        }
        if let Some(mut cues) = cues {
            cues.trigger_dead();
        }

        match faction {
            Faction::Player => {
                *life = Lifecycle::Disabled;
                *layers = downed_body_layers(Layer::Player);
                info!("player {entity:?} died");
                reports.write(SessionReport::PlayerDied);
            }
            Faction::Enemy => {
                let delay = tunables.enemy.death_delay;
                *life = Lifecycle::Dying {
                    timer: Timer::from_seconds(delay, TimerMode::Once),
                };
                *layers = downed_body_layers(Layer::Enemy);
                info!("enemy {entity:?} died, despawning in {delay}s");
                reports.write(SessionReport::EnemyKilled);
            }
        }
    }
}

/// Mirror player damage into the session's health.
pub fn report_player_damage(
    mut damage: MessageReader<DamageTaken>,
    mut reports: MessageWriter<SessionReport>,
) {
    for ev in damage.read() {
        if ev.faction == Faction::Player && ev.outcome.landed() {
            reports.write(SessionReport::PlayerDamaged(ev.amount));
        }
    }
}
