//! Combat plugin: health, attack hitboxes, overlap resolution and death.
//!
//! # Data flow
//! ```text
//!   Update (variable dt, virtual clock)
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │ CombatSystems::Intent   player input / enemy brain -> AttackState    │
//! │ CombatSystems::Animate  clips emit HitboxCue (Enable/Disable/End)    │
//! │ CombatSystems::React    controllers arm/disarm AttackHitbox          │
//! │ CombatSystems::Sync     AttackHitbox -> CollisionLayers, facing      │
//! └──────────────────────────────────────────────────────────────────────┘
//!                │
//!                v
//!   FixedPostUpdate (after Avian collision events)
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │ dispatch_hitbox_overlaps   CollisionStart -> Health, DamageTaken,    │
//! │                            Downed                                    │
//! │ resolve_downed             Downed -> Lifecycle, SessionReport        │
//! │ report_player_damage       DamageTaken -> SessionReport              │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```

pub mod attack;
pub mod collision;
pub mod death;
pub mod health;
pub mod hitbox;
pub mod messages;
pub mod wiring;

use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::session;

/// Which side a combatant fights for.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Faction {
    Player,
    Enemy,
}

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatSystems {
    Intent,
    Animate,
    React,
    Sync,
}

pub fn plugin(app: &mut App) {
    app.add_message::<messages::DamageTaken>()
        .add_message::<messages::Downed>()
        .add_message::<messages::Heal>();

    app.configure_sets(
        Update,
        (
            CombatSystems::Intent,
            CombatSystems::Animate,
            CombatSystems::React,
            CombatSystems::Sync,
        )
            .chain()
            .run_if(in_state(GameState::InGame)),
    );
    app.configure_sets(Update, CombatSystems::Intent.run_if(session::is_playing));

    app.add_systems(
        Update,
        (
            wiring::validate_new_combatants.before(CombatSystems::Intent),
            health::refresh_invincibility.before(CombatSystems::Intent),
            (hitbox::sync_hitbox_layers, attack::apply_facing).in_set(CombatSystems::Sync),
        )
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        FixedPostUpdate,
        (
            collision::dispatch_hitbox_overlaps,
            (
                death::resolve_downed,
                death::report_player_damage,
                health::apply_heals,
            ),
        )
            .chain()
            .after(CollisionEventSystems)
            .run_if(in_state(GameState::InGame)),
    );
}
