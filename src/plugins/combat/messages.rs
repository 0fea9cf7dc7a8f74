//! Combat results, written by the overlap dispatcher, plus incoming heals.
//!
//! Hit resolution is the single writer of `Health`; everything downstream (death handling,
//! hurt feedback, session bookkeeping) reacts to these messages instead of polling health.

use bevy::prelude::*;

use super::health::DamageOutcome;
use super::Faction;

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageTaken {
    pub target: Entity,
    pub faction: Faction,
    pub amount: i32,
    pub outcome: DamageOutcome,
}

/// A combatant's death latch just closed. Written at most once per entity.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Downed {
    pub entity: Entity,
    pub faction: Faction,
}

/// Restore up to `amount` health on a combatant. Dead combatants stay dead.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Heal {
    pub entity: Entity,
    pub amount: i32,
}
