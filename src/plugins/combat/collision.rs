use avian2d::prelude::*;
use bevy::prelude::*;

use super::attack::AttackState;
use super::health::{DamageOutcome, Health};
use super::hitbox::{AttackHitbox, HitVerdict};
use super::messages::{DamageTaken, Downed};
use super::Faction;

#[derive(Clone, Copy, Debug)]
struct CollisionTarget {
    collider: Entity,
    body: Option<Entity>,
}

impl CollisionTarget {
    #[inline]
    fn gameplay_owner(self) -> Entity {
        self.body.unwrap_or(self.collider)
    }
}

#[inline]
fn targets(ev: &CollisionStart) -> (CollisionTarget, CollisionTarget) {
    (
        CollisionTarget {
            collider: ev.collider1,
            body: ev.body1,
        },
        CollisionTarget {
            collider: ev.collider2,
            body: ev.body2,
        },
    )
}

/// Route hitbox overlap-begin events into `AttackHitbox::on_overlap_begin` and apply the
/// resulting damage.
///
/// Events from simultaneous overlaps arrive in no particular order; per-cycle hit tracking
/// makes the outcome independent of it.
pub fn dispatch_hitbox_overlaps(
    time: Res<Time>,
    mut started: MessageReader<CollisionStart>,
    mut q_hitboxes: Query<&mut AttackHitbox>,
    q_owners: Query<&AttackState>,
    mut q_targets: Query<(&Faction, &mut Health)>,
    mut damage_out: MessageWriter<DamageTaken>,
    mut downed_out: MessageWriter<Downed>,
) {
    let now = time.elapsed_secs();

    for ev in started.read() {
        let (t1, t2) = targets(ev);

        let h1 = q_hitboxes.contains(t1.collider);
        let h2 = q_hitboxes.contains(t2.collider);
        if !(h1 ^ h2) {
            continue; // exactly one side must be a hitbox
        }
        let (hitbox_side, other_side) = if h1 { (t1, t2) } else { (t2, t1) };

        let Ok(mut hitbox) = q_hitboxes.get_mut(hitbox_side.collider) else {
            continue;
        };

        let target = other_side.gameplay_owner();
        if target == hitbox.owner {
            continue;
        }

        let Ok((&faction, mut health)) = q_targets.get_mut(target) else {
            debug!("hitbox {:?} overlapped non-combatant {target:?}", hitbox_side.collider);
            continue;
        };

        let owner_attacking = q_owners
            .get(hitbox.owner)
            .is_ok_and(AttackState::is_attacking);

        match hitbox.on_overlap_begin(target, faction, owner_attacking, health.is_dead()) {
            HitVerdict::Ignored(reason) => {
                debug!("hit on {target:?} ignored: {reason:?}");
            }
            HitVerdict::Hit { damage } => {
                let outcome = health.apply_damage(damage, now);
                debug!(
                    "{:?} hit {faction:?} {target:?} for {damage}: {outcome:?} ({}/{})",
                    hitbox.owner,
                    health.current(),
                    health.max()
                );

                if outcome.landed() {
                    damage_out.write(DamageTaken {
                        target,
                        faction,
                        amount: damage,
                        outcome,
                    });
                }
                if outcome == DamageOutcome::Died {
                    downed_out.write(Downed {
                        entity: target,
                        faction,
                    });
                }
            }
        }
    }
}
