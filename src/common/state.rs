//! Global state machine.
//!
//! ```text
//! Title --start--> InGame --restart--> Restarting --> InGame
//! ```
//!
//! Pause / game over / victory are session phases inside `InGame`, not app states:
//! the world stays visible and only virtual time stops.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Title,
    InGame,
    /// One-frame hop so every `InGame`-scoped entity is torn down before the next session.
    Restarting,
}
