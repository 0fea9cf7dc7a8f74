//! Spawn-time validation of combatant ↔ hitbox references.
//!
//! Broken wiring is a configuration defect, not a runtime fault: it is reported once when the
//! combatant appears and the affected feature simply never fires.

use bevy::prelude::*;
use thiserror::Error;

use super::attack::HitboxLink;
use super::hitbox::AttackHitbox;
use super::Faction;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WiringError {
    #[error("{owner}: no attack hitbox assigned")]
    MissingHitbox { owner: String },

    #[error("{owner}: hitbox link {hitbox:?} does not point at an AttackHitbox")]
    DanglingHitbox { owner: String, hitbox: Entity },

    #[error("{owner}: hitbox {hitbox:?} belongs to {actual:?}")]
    ForeignHitbox {
        owner: String,
        hitbox: Entity,
        actual: Entity,
    },

    #[error("{owner}: hitbox {hitbox:?} would strike its own faction ({faction:?})")]
    FriendlyHitbox {
        owner: String,
        hitbox: Entity,
        faction: Faction,
    },

    #[error("{owner}: no player to track")]
    MissingPlayer { owner: String },
}

pub fn check_hitbox_link(
    owner: Entity,
    label: &str,
    faction: Faction,
    link: Option<&HitboxLink>,
    hitbox: impl FnOnce(Entity) -> Option<(Entity, Faction)>,
) -> Result<(), WiringError> {
    let Some(&HitboxLink(hitbox_e)) = link else {
        return Err(WiringError::MissingHitbox {
            owner: label.to_owned(),
        });
    };

    let Some((hitbox_owner, targets)) = hitbox(hitbox_e) else {
        return Err(WiringError::DanglingHitbox {
            owner: label.to_owned(),
            hitbox: hitbox_e,
        });
    };

    if hitbox_owner != owner {
        return Err(WiringError::ForeignHitbox {
            owner: label.to_owned(),
            hitbox: hitbox_e,
            actual: hitbox_owner,
        });
    }

    if targets == faction {
        return Err(WiringError::FriendlyHitbox {
            owner: label.to_owned(),
            hitbox: hitbox_e,
            faction,
        });
    }

    Ok(())
}

/// Validate every combatant the first frame it exists.
pub fn validate_new_combatants(
    q_new: Query<(Entity, Option<&Name>, &Faction, Option<&HitboxLink>), Added<Faction>>,
    q_hitboxes: Query<&AttackHitbox>,
) {
    for (e, name, &faction, link) in &q_new {
        let label = name.map_or_else(|| format!("{e:?}"), |n| n.as_str().to_owned());
        let result = check_hitbox_link(e, &label, faction, link, |h| {
            q_hitboxes.get(h).ok().map(|hb| (hb.owner, hb.targets))
        });

        match result {
            Ok(()) => debug!("{label}: attack hitbox wiring ok"),
            Err(err) => error!("{err}"),
        }
    }
}
