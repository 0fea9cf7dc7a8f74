//! Health with an invincibility window and a one-way death latch.
//!
//! ```text
//! Vulnerable --hit--> Invincible --deadline--> Vulnerable --hit--> ... --lethal hit--> Dead
//! ```
//!
//! The window is a deadline on the session clock, never a suspended task: callers pass
//! `now` and the comparison happens on every query.

use bevy::prelude::*;

use crate::plugins::session::SessionReport;

use super::messages::Heal;
use super::Faction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Dead or inside the invincibility window; nothing changed.
    Ignored,
    /// Damage applied, invincibility window started.
    Hurt,
    /// Damage applied and the death latch closed. Returned exactly once.
    Died,
}

impl DamageOutcome {
    #[inline]
    pub fn landed(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

#[derive(Component, Debug, Clone)]
pub struct Health {
    current: i32,
    max: i32,
    invincibility_secs: f32,
    invincible_until: Option<f32>,
    dead: bool,
}

impl Health {
    pub fn new(max: i32, invincibility_secs: f32) -> Self {
        let max = max.max(1);
        Self {
            current: max,
            max,
            invincibility_secs: invincibility_secs.max(0.0),
            invincible_until: None,
            dead: false,
        }
    }

    #[inline]
    pub fn current(&self) -> i32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> i32 {
        self.max
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Invincibility is meaningless once dead.
    #[inline]
    pub fn is_invincible(&self, now: f32) -> bool {
        !self.dead && self.invincible_until.is_some_and(|until| now < until)
    }

    pub fn apply_damage(&mut self, amount: i32, now: f32) -> DamageOutcome {
        if self.dead || self.is_invincible(now) {
            return DamageOutcome::Ignored;
        }

        self.current = (self.current - amount).clamp(0, self.max);

        if self.current <= 0 {
            self.dead = true;
            self.invincible_until = None;
            return DamageOutcome::Died;
        }

        self.invincible_until = Some(now + self.invincibility_secs);
        DamageOutcome::Hurt
    }

    /// Returns how much health was actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if self.dead {
            return 0;
        }
        let before = self.current;
        self.current = (self.current + amount).clamp(0, self.max);
        self.current - before
    }

    /// Drop an expired deadline so the stored state reads as vulnerable again.
    pub fn refresh(&mut self, now: f32) {
        if self.invincible_until.is_some_and(|until| now >= until) {
            self.invincible_until = None;
        }
    }
}

/// Expire invincibility deadlines once per tick.
pub fn refresh_invincibility(time: Res<Time>, mut q: Query<&mut Health>) {
    let now = time.elapsed_secs();
    for mut health in &mut q {
        if health.invincible_until.is_some() {
            health.refresh(now);
        }
    }
}

/// Apply queued heals; a player heal is mirrored into the session with the amount restored.
pub fn apply_heals(
    mut heals: MessageReader<Heal>,
    mut q: Query<(&Faction, &mut Health)>,
    mut reports: MessageWriter<SessionReport>,
) {
    for &Heal { entity, amount } in heals.read() {
        let Ok((faction, mut health)) = q.get_mut(entity) else {
            continue;
        };
        let restored = health.heal(amount);
        debug!(
            "{faction:?} {entity:?} healed {restored} ({}/{})",
            health.current(),
            health.max()
        );
        if *faction == Faction::Player && restored > 0 {
            reports.write(SessionReport::PlayerHealed(restored));
        }
    }
}
