//! Session bookkeeping: player health mirror, kills, play time and phase.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::common::tunables::SessionTunables;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Playing,
    Paused,
    GameOver,
    Victory,
}

impl Phase {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver | Self::Victory)
    }
}

pub const DEFEAT_MESSAGES: [&str; 6] = [
    "You were defeated!",
    "Better luck next time!",
    "The enemies got the best of you!",
    "Don't give up, try again!",
    "You fought bravely!",
    "Skill Issue.",
];

pub fn pick_defeat_message(rng: &mut impl Rng) -> &'static str {
    DEFEAT_MESSAGES.choose(rng).copied().unwrap_or(DEFEAT_MESSAGES[0])
}

/// The one live session. Created on entering `InGame`, dropped on leaving it.
#[derive(Resource, Debug, Clone)]
pub struct Session {
    phase: Phase,
    player_health: i32,
    max_health: i32,
    kills: u32,
    victory_kills: u32,
    elapsed: f32,
    defeat_message: Option<&'static str>,
}

impl Session {
    pub fn new(tunables: &SessionTunables) -> Self {
        let max_health = tunables.max_health.max(1);
        Self {
            phase: Phase::Playing,
            player_health: max_health,
            max_health,
            kills: 0,
            victory_kills: tunables.victory_kills,
            elapsed: 0.0,
            defeat_message: None,
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    #[inline]
    pub fn player_health(&self) -> i32 {
        self.player_health
    }

    #[inline]
    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    #[inline]
    pub fn kills(&self) -> u32 {
        self.kills
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn defeat_message(&self) -> Option<&'static str> {
        self.defeat_message
    }

    /// Play time as `mm:ss`.
    pub fn elapsed_clock(&self) -> String {
        let total = self.elapsed.max(0.0) as u32;
        format!("{:02}:{:02}", total / 60, total % 60)
    }

    /// Returns the new phase when this report ended the session.
    pub fn report_player_damage(&mut self, amount: i32) -> Option<Phase> {
        if self.is_over() {
            return None;
        }
        self.player_health = (self.player_health - amount).clamp(0, self.max_health);
        if self.player_health <= 0 {
            return self.enter(Phase::GameOver);
        }
        None
    }

    pub fn heal(&mut self, amount: i32) {
        if self.is_over() {
            return;
        }
        self.player_health = (self.player_health + amount).clamp(0, self.max_health);
    }

    pub fn report_enemy_killed(&mut self) -> Option<Phase> {
        if self.is_over() {
            return None;
        }
        self.kills += 1;
        if self.kills >= self.victory_kills {
            return self.enter(Phase::Victory);
        }
        None
    }

    /// The player's own death latch closed; defeat regardless of the mirrored health.
    pub fn player_died(&mut self) -> Option<Phase> {
        if self.is_over() {
            return None;
        }
        self.enter(Phase::GameOver)
    }

    pub fn toggle_pause(&mut self) -> Option<Phase> {
        let next = match self.phase {
            Phase::Playing => Phase::Paused,
            Phase::Paused => Phase::Playing,
            Phase::GameOver | Phase::Victory => return None,
        };
        self.enter(next)
    }

    /// Accumulate play time; frozen outside `Playing`.
    pub fn advance(&mut self, dt: f32) {
        if self.phase == Phase::Playing {
            self.elapsed += dt.max(0.0);
        }
    }

    pub fn set_defeat_message(&mut self, message: &'static str) {
        if self.phase == Phase::GameOver {
            self.defeat_message = Some(message);
        }
    }

    fn enter(&mut self, phase: Phase) -> Option<Phase> {
        self.phase = phase;
        Some(phase)
    }
}
