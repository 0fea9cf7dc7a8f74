//! Enemy decision making, free of ECS types so it can be tested directly.

use bevy::prelude::*;

use crate::common::tunables::EnemyTunables;

/// Horizontal patrol waypoints, visited cyclically.
///
/// Enemies walk on the ground, so only x matters for reaching a point.
#[derive(Debug, Clone, Default)]
pub struct PatrolRoute {
    points: Vec<f32>,
    index: usize,
}

impl PatrolRoute {
    pub fn new(points: impl Into<Vec<f32>>) -> Self {
        Self {
            points: points.into(),
            index: 0,
        }
    }

    #[inline]
    pub fn current(&self) -> Option<f32> {
        self.points.get(self.index).copied()
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    fn advance(&mut self) {
        if !self.points.is_empty() {
            self.index = (self.index + 1) % self.points.len();
        }
    }
}

/// What the enemy wants to do this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Mid-swing; leave velocity and facing alone.
    Busy,
    /// Stand still (in range, cooling down).
    Hold,
    /// Walk horizontally; `dir_x` is the x component of the unit direction.
    Walk { dir_x: f32 },
    /// Stand still and start a swing.
    Attack,
    /// No usable patrol route.
    Lost,
}

#[derive(Component, Debug, Clone)]
pub struct EnemyBrain {
    aggro: bool,
    patrol: PatrolRoute,
}

impl EnemyBrain {
    pub fn new(patrol: PatrolRoute) -> Self {
        Self {
            aggro: false,
            patrol,
        }
    }

    #[inline]
    pub fn is_aggro(&self) -> bool {
        self.aggro
    }

    #[inline]
    pub fn patrol(&self) -> &PatrolRoute {
        &self.patrol
    }

    /// Decide the next move. Aggro latches the first time the player comes within range and
    /// never reverts.
    pub fn think(
        &mut self,
        me: Vec2,
        player: Vec2,
        attacking: bool,
        cooldown_ready: bool,
        tunables: &EnemyTunables,
    ) -> Intent {
        let distance = me.distance(player);
        if !self.aggro && distance < tunables.aggro_range {
            self.aggro = true;
            debug!("enemy at {me} became aggressive");
        }

        if attacking {
            return Intent::Busy;
        }

        if self.aggro {
            return if distance > tunables.attack_range {
                Intent::Walk {
                    dir_x: (player - me).normalize_or_zero().x,
                }
            } else if cooldown_ready {
                Intent::Attack
            } else {
                Intent::Hold
            };
        }

        let Some(target_x) = self.patrol.current() else {
            return Intent::Lost;
        };
        let dx = target_x - me.x;
        let dir_x = Vec2::new(dx, 0.0).normalize_or_zero().x;
        if dx.abs() < tunables.patrol_reach {
            self.patrol.advance();
        }
        Intent::Walk { dir_x }
    }
}
