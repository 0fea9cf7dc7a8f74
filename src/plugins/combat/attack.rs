//! Attack state, facing and lifecycle shared by player and enemies.

use bevy::prelude::*;

/// Attack sub-state of a combatant.
///
/// `ends_at` is the player's fixed-duration deadline; enemies end their swing from the clip's
/// `EndAttack` cue instead and leave it `None`. `last_started` drives the enemy cooldown.
#[derive(Component, Debug, Clone, Default)]
pub struct AttackState {
    attacking: bool,
    ends_at: Option<f32>,
    last_started: Option<f32>,
}

impl AttackState {
    #[inline]
    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    #[inline]
    pub fn last_started(&self) -> Option<f32> {
        self.last_started
    }

    /// Start a swing unless one is already in flight.
    pub fn begin(&mut self, now: f32, duration: Option<f32>) -> bool {
        if self.attacking {
            return false;
        }
        self.attacking = true;
        self.last_started = Some(now);
        self.ends_at = duration.map(|d| now + d);
        true
    }

    /// Cooldown measured from the start of the previous swing.
    pub fn cooldown_ready(&self, now: f32, cooldown: f32) -> bool {
        self.last_started.is_none_or(|t| now - t >= cooldown)
    }

    /// True once the fixed-duration deadline has passed.
    pub fn expired(&self, now: f32) -> bool {
        self.attacking && self.ends_at.is_some_and(|t| now >= t)
    }

    /// End (or cancel) the swing. Returns whether one was in flight.
    pub fn end(&mut self) -> bool {
        let was = self.attacking;
        self.attacking = false;
        self.ends_at = None;
        was
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Facing implied by a horizontal direction; `None` when there is no horizontal motion.
    pub fn from_direction(x: f32) -> Option<Self> {
        if x < 0.0 {
            Some(Self::Left)
        } else if x > 0.0 {
            Some(Self::Right)
        } else {
            None
        }
    }

    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Mirror an authored right-facing offset.
    #[inline]
    pub fn mirror(self, offset: Vec2) -> Vec2 {
        Vec2::new(offset.x.abs() * self.sign(), offset.y)
    }
}

/// Alive → (Dying) → Disabled. Anything past `Alive` ignores input, AI and animation callbacks.
#[derive(Component, Debug, Clone, Default)]
pub enum Lifecycle {
    #[default]
    Alive,
    /// Enemy death delay before despawn.
    Dying { timer: Timer },
    Disabled,
}

impl Lifecycle {
    #[inline]
    pub fn is_alive(&self) -> bool {
        matches!(self, Self::Alive)
    }
}

/// Explicit owner → hitbox reference, validated once after spawn.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitboxLink(pub Entity);

/// Mirror hitbox offsets and sprites whenever facing changes.
pub fn apply_facing(
    mut q_owners: Query<(&Facing, Option<&HitboxLink>, Option<&mut Sprite>), Changed<Facing>>,
    mut q_hitboxes: Query<(&super::hitbox::HitboxOffset, &mut Transform)>,
) {
    for (&facing, link, sprite) in &mut q_owners {
        if let Some(mut sprite) = sprite {
            sprite.flip_x = facing == Facing::Left;
        }
        let Some(&HitboxLink(hitbox_e)) = link else {
            continue;
        };
        if let Ok((offset, mut tf)) = q_hitboxes.get_mut(hitbox_e) {
            let mirrored = facing.mirror(offset.0);
            tf.translation.x = mirrored.x;
            tf.translation.y = mirrored.y;
        }
    }
}
