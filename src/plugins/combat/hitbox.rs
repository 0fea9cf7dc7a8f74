//! Attack hitboxes: transient damage volumes armed for the active part of a swing.
//!
//! A hitbox is a `Sensor` collider parented to its owner's body. Disarmed hitboxes keep their
//! layer membership but have empty filters, so they overlap nothing and Avian never reports
//! them. Arming restores the filters, and any opponent already inside produces a fresh
//! `CollisionStart`.

use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::common::layers::Layer;

use super::Faction;

/// How many times one armed cycle may land.
#[derive(Debug, Clone)]
pub enum HitTracking {
    /// Each distinct target at most once (a player swing can cleave a crowd).
    EachTargetOnce(HashSet<Entity>),
    /// First landed hit closes the cycle (an enemy swing has a single victim).
    SingleHit(bool),
}

impl HitTracking {
    fn clear(&mut self) {
        match self {
            Self::EachTargetOnce(seen) => seen.clear(),
            Self::SingleHit(hit) => *hit = false,
        }
    }

    fn already_hit(&self, target: Entity) -> bool {
        match self {
            Self::EachTargetOnce(seen) => seen.contains(&target),
            Self::SingleHit(hit) => *hit,
        }
    }

    fn record(&mut self, target: Entity) {
        match self {
            Self::EachTargetOnce(seen) => {
                seen.insert(target);
            }
            Self::SingleHit(hit) => *hit = true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Disarmed,
    WrongFaction,
    AlreadyHit,
    OwnerIdle,
    TargetDead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitVerdict {
    Ignored(IgnoreReason),
    Hit { damage: i32 },
}

#[derive(Component, Debug, Clone)]
pub struct AttackHitbox {
    pub owner: Entity,
    pub damage: i32,
    /// Faction this hitbox is allowed to damage.
    pub targets: Faction,
    armed: bool,
    tracking: HitTracking,
}

impl AttackHitbox {
    /// Player variant: multi-target, each enemy once per swing.
    pub fn cleaving(owner: Entity, damage: i32) -> Self {
        Self {
            owner,
            damage,
            targets: Faction::Enemy,
            armed: false,
            tracking: HitTracking::EachTargetOnce(HashSet::default()),
        }
    }

    /// Enemy variant: one hit per swing.
    pub fn single(owner: Entity, damage: i32) -> Self {
        Self {
            owner,
            damage,
            targets: Faction::Player,
            armed: false,
            tracking: HitTracking::SingleHit(false),
        }
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Start a new cycle. Arming an already armed hitbox keeps the current cycle's hits.
    pub fn arm(&mut self) {
        if !self.armed {
            self.tracking.clear();
            self.armed = true;
        }
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Forget the hits of the current cycle without changing the armed flag.
    pub fn reset_hits(&mut self) {
        self.tracking.clear();
    }

    pub fn on_overlap_begin(
        &mut self,
        target: Entity,
        target_faction: Faction,
        owner_attacking: bool,
        target_dead: bool,
    ) -> HitVerdict {
        if !self.armed {
            return HitVerdict::Ignored(IgnoreReason::Disarmed);
        }
        if target_faction != self.targets {
            return HitVerdict::Ignored(IgnoreReason::WrongFaction);
        }
        if self.tracking.already_hit(target) {
            return HitVerdict::Ignored(IgnoreReason::AlreadyHit);
        }
        if !owner_attacking {
            return HitVerdict::Ignored(IgnoreReason::OwnerIdle);
        }
        if target_dead {
            return HitVerdict::Ignored(IgnoreReason::TargetDead);
        }

        self.tracking.record(target);
        HitVerdict::Hit { damage: self.damage }
    }

    /// Membership for this hitbox's side.
    #[inline]
    pub fn layer(&self) -> Layer {
        match self.targets {
            Faction::Enemy => Layer::PlayerAttack,
            Faction::Player => Layer::EnemyAttack,
        }
    }

    /// Collision layers matching the armed flag.
    pub fn collision_layers(&self) -> CollisionLayers {
        if self.armed {
            let target = match self.targets {
                Faction::Enemy => Layer::Enemy,
                Faction::Player => Layer::Player,
            };
            CollisionLayers::new(self.layer(), [target])
        } else {
            CollisionLayers::new(self.layer(), [] as [Layer; 0])
        }
    }
}

/// Spawn a disarmed hitbox as a child sensor of `owner`.
pub fn spawn_hitbox(
    commands: &mut Commands,
    owner: Entity,
    hitbox: AttackHitbox,
    offset: Vec2,
    size: Vec2,
) -> Entity {
    let layers = hitbox.collision_layers();
    let name = match hitbox.targets {
        Faction::Enemy => "PlayerAttackHitbox",
        Faction::Player => "EnemyAttackHitbox",
    };

    let e = commands
        .spawn((
            Name::new(name),
            hitbox,
            HitboxOffset(offset),
            Transform::from_translation(offset.extend(0.0)),
            Collider::rectangle(size.x, size.y),
            Sensor,
            CollisionEventsEnabled,
            layers,
        ))
        .id();
    commands.entity(owner).add_child(e);
    e
}

/// Authored (right-facing) local offset of a hitbox; mirrored by facing.
#[derive(Component, Debug, Clone, Copy)]
pub struct HitboxOffset(pub Vec2);

/// Keep collision filters in step with the armed flag.
pub fn sync_hitbox_layers(
    mut q: Query<(&AttackHitbox, &mut CollisionLayers), Changed<AttackHitbox>>,
) {
    for (hitbox, mut layers) in &mut q {
        *layers = hitbox.collision_layers();
    }
}
