//! Animation cues and attack clips (asset-free).
//!
//! Controllers push semantic cues (`running`, `jumping`, `attack`, `damaged`, `dead`) into
//! `AnimationCues`; presentation derives sprite colour from them. Attack swings play an
//! `AttackClip`, whose authored keyframes emit `HitboxCue` messages. Controllers treat those
//! exactly like engine animation events: they may arrive zero or more times, late, or after
//! the owner died, and every handler guards for that.

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::combat::attack::Lifecycle;
use crate::plugins::combat::messages::DamageTaken;
use crate::plugins::combat::CombatSystems;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    EnableHitbox,
    DisableHitbox,
    EndAttack,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitboxCue {
    pub entity: Entity,
    pub cue: Cue,
}

/// Keyframe offsets (seconds from clip start).
#[derive(Debug, Clone, Copy)]
pub struct AttackClip {
    pub enable_at: f32,
    pub disable_at: f32,
    /// `None` when the owner ends its swing on its own timer.
    pub end_at: Option<f32>,
}

impl AttackClip {
    /// Keyframes sorted by time.
    fn keyframes(&self) -> Vec<(f32, Cue)> {
        let mut frames: Vec<(f32, Cue)> = [
            Some((self.enable_at, Cue::EnableHitbox)),
            Some((self.disable_at, Cue::DisableHitbox)),
            self.end_at.map(|t| (t, Cue::EndAttack)),
        ]
        .into_iter()
        .flatten()
        .collect();
        frames.sort_by(|a, b| a.0.total_cmp(&b.0));
        frames
    }
}

#[derive(Debug, Clone, Copy)]
struct Playback {
    elapsed: f32,
    fired: usize,
}

/// Playback state of one entity's attack clip.
#[derive(Component, Debug, Clone)]
pub struct ClipPlayer {
    keyframes: Vec<(f32, Cue)>,
    playback: Option<Playback>,
}

impl ClipPlayer {
    pub fn new(clip: AttackClip) -> Self {
        Self {
            keyframes: clip.keyframes(),
            playback: None,
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playback.is_some()
    }

    /// (Re)start from the first frame.
    pub fn play(&mut self) {
        self.playback = Some(Playback { elapsed: 0.0, fired: 0 });
    }

    /// Cancel playback; pending keyframes never fire.
    pub fn stop(&mut self) {
        self.playback = None;
    }

    /// Advance by `dt` and return the cues whose keyframes were reached, in keyframe order.
    /// Playback stops after the last keyframe.
    pub fn advance(&mut self, dt: f32) -> Vec<Cue> {
        let Some(mut pb) = self.playback else {
            return Vec::new();
        };
        pb.elapsed += dt;

        let due: Vec<Cue> = self.keyframes[pb.fired..]
            .iter()
            .take_while(|(t, _)| *t <= pb.elapsed)
            .map(|&(_, cue)| cue)
            .collect();
        pb.fired += due.len();

        self.playback = (pb.fired < self.keyframes.len()).then_some(pb);
        due
    }
}

/// Semantic animation state pushed by controllers.
#[derive(Component, Debug, Clone, Default)]
pub struct AnimationCues {
    pub running: bool,
    pub jumping: bool,
    attack: bool,
    dead: bool,
    flash_remaining: f32,
}

impl AnimationCues {
    pub fn trigger_attack(&mut self) {
        self.attack = true;
    }

    pub fn end_attack(&mut self) {
        self.attack = false;
    }

    #[inline]
    pub fn attacking(&self) -> bool {
        self.attack
    }

    pub fn trigger_damaged(&mut self, flash_secs: f32) {
        self.flash_remaining = self.flash_remaining.max(flash_secs);
    }

    #[inline]
    pub fn flashing(&self) -> bool {
        self.flash_remaining > 0.0
    }

    pub fn trigger_dead(&mut self) {
        self.dead = true;
        self.running = false;
        self.attack = false;
    }

    #[inline]
    pub fn dead(&self) -> bool {
        self.dead
    }

    fn tick(&mut self, dt: f32) {
        self.flash_remaining = (self.flash_remaining - dt).max(0.0);
    }
}

/// Resting sprite colour; cues tint on top of it.
#[derive(Component, Debug, Clone, Copy)]
pub struct BaseTint(pub Color);

/// How long a hit flashes the victim's sprite.
#[derive(Component, Debug, Clone, Copy)]
pub struct HurtFlash(pub f32);

pub fn plugin(app: &mut App) {
    app.add_message::<HitboxCue>();

    app.add_systems(
        Update,
        drive_attack_clips
            .in_set(CombatSystems::Animate)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        Update,
        (flash_on_damage, present_cues)
            .chain()
            .in_set(CombatSystems::Sync)
            .run_if(in_state(GameState::InGame)),
    );
}

/// Advance clips and emit keyframe cues.
pub fn drive_attack_clips(
    time: Res<Time>,
    mut q: Query<(Entity, &mut ClipPlayer)>,
    mut cues_out: MessageWriter<HitboxCue>,
) {
    let dt = time.delta_secs();
    for (entity, mut player) in &mut q {
        if !player.is_playing() {
            continue;
        }
        for cue in player.advance(dt) {
            cues_out.write(HitboxCue { entity, cue });
        }
    }
}

fn flash_on_damage(
    mut damage: MessageReader<DamageTaken>,
    mut q: Query<(&mut AnimationCues, &HurtFlash)>,
) {
    for ev in damage.read() {
        if let Ok((mut cues, flash)) = q.get_mut(ev.target) {
            cues.trigger_damaged(flash.0);
        }
    }
}

/// Derive sprite colour from cues. Alpha is left alone (the death fade owns it).
fn present_cues(
    time: Res<Time>,
    mut q: Query<(&mut AnimationCues, &BaseTint, &mut Sprite, &Lifecycle)>,
) {
    let dt = time.delta_secs();

    for (mut cues, base, mut sprite, life) in &mut q {
        cues.tick(dt);

        let alpha = sprite.color.to_srgba().alpha;
        let mut out = base.0.to_srgba();

        if cues.dead() || !life.is_alive() {
            out = Srgba::rgb(0.45, 0.45, 0.48);
        } else if cues.flashing() {
            out = Srgba::rgb(1.0, 0.1, 0.1);
        } else if cues.attacking() {
            out.red = (out.red + 0.35).min(1.0);
            out.green = (out.green + 0.35).min(1.0);
            out.blue = (out.blue + 0.35).min(1.0);
        } else if cues.jumping {
            out.blue = (out.blue + 0.15).min(1.0);
        }

        out.alpha = alpha;
        sprite.color = out.into();
    }
}
