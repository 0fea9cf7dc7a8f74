//! Session plugin: the single source of truth for win / lose / pause.
//!
//! Producers never touch `Session` directly. Combat writes `SessionReport`s, hotkeys and menu
//! buttons write `MenuAction`s, and the systems here are the only writers of the resource:
//!
//! ```text
//! OnEnter(InGame)  establish_session  (first writer wins)
//! Update           actions -> reports -> clock -> freeze virtual time
//! OnExit(InGame)   teardown_session
//! ```

pub mod model;

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;

pub use model::{Phase, Session};

/// Player-relevant combat events.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionReport {
    PlayerDamaged(i32),
    PlayerHealed(i32),
    PlayerDied,
    EnemyKilled,
}

/// User intent from keyboard shortcuts or menu buttons.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Start,
    TogglePause,
    Resume,
    Restart,
    Quit,
}

pub fn plugin(app: &mut App) {
    app.add_message::<SessionReport>()
        .add_message::<MenuAction>();

    app.add_systems(OnEnter(GameState::Title), freeze_virtual_time)
        .add_systems(OnEnter(GameState::InGame), establish_session)
        .add_systems(OnExit(GameState::InGame), teardown_session)
        .add_systems(OnEnter(GameState::Restarting), finish_restart);

    app.add_systems(Update, (read_hotkeys, apply_menu_actions).chain());

    app.add_systems(
        Update,
        (apply_session_reports, advance_session_clock, sync_virtual_time)
            .chain()
            .after(apply_menu_actions)
            .run_if(in_state(GameState::InGame)),
    );
}

/// Run condition: a live session in `Phase::Playing`.
pub fn is_playing(session: Option<Res<Session>>) -> bool {
    session.is_some_and(|s| s.phase() == Phase::Playing)
}

/// Create the session unless one is already live.
pub fn establish_session(
    mut commands: Commands,
    tunables: Res<Tunables>,
    existing: Option<Res<Session>>,
) {
    if existing.is_some() {
        warn!("a session is already live; discarding the duplicate");
        return;
    }
    commands.insert_resource(Session::new(&tunables.session));
    info!("session started");
}

fn teardown_session(mut commands: Commands) {
    commands.remove_resource::<Session>();
}

fn finish_restart(mut next: ResMut<NextState<GameState>>) {
    next.set(GameState::InGame);
}

fn freeze_virtual_time(mut time: ResMut<Time<Virtual>>) {
    time.pause();
}

fn read_hotkeys(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    state: Res<State<GameState>>,
    session: Option<Res<Session>>,
    mut out: MessageWriter<MenuAction>,
) {
    let Some(keys) = keys else { return; };

    match state.get() {
        GameState::Title => {
            if keys.any_just_pressed([KeyCode::Enter, KeyCode::Space]) {
                out.write(MenuAction::Start);
            }
        }
        GameState::InGame => {
            if keys.just_pressed(KeyCode::Escape) {
                out.write(MenuAction::TogglePause);
            }
            if session.is_some_and(|s| s.is_over()) && keys.just_pressed(KeyCode::KeyR) {
                out.write(MenuAction::Restart);
            }
        }
        GameState::Restarting => {}
    }
}

pub fn apply_menu_actions(
    mut actions: MessageReader<MenuAction>,
    state: Res<State<GameState>>,
    mut next: ResMut<NextState<GameState>>,
    mut session: Option<ResMut<Session>>,
    mut exit: MessageWriter<AppExit>,
) {
    for cmd in actions.read() {
        match (cmd, state.get()) {
            (MenuAction::Start, GameState::Title) => {
                info!("starting game");
                next.set(GameState::InGame);
            }
            (MenuAction::TogglePause, GameState::InGame) => {
                let Some(session) = session.as_mut() else { continue; };
                match session.toggle_pause() {
                    Some(Phase::Paused) => info!("game paused"),
                    Some(_) => info!("game resumed"),
                    None => debug!("pause ignored: session is over"),
                }
            }
            (MenuAction::Resume, GameState::InGame) => {
                let Some(session) = session.as_mut() else { continue; };
                if session.is_paused() && session.toggle_pause().is_some() {
                    info!("game resumed");
                }
            }
            (MenuAction::Restart, GameState::InGame) => {
                info!("restarting game");
                next.set(GameState::Restarting);
            }
            (MenuAction::Quit, _) => {
                info!("quitting game");
                exit.write(AppExit::Success);
            }
            (cmd, state) => debug!("{cmd:?} ignored in {state:?}"),
        }
    }
}

pub fn apply_session_reports(
    mut reports: MessageReader<SessionReport>,
    mut session: ResMut<Session>,
) {
    for report in reports.read() {
        let changed = match *report {
            SessionReport::PlayerDamaged(amount) => {
                let changed = session.report_player_damage(amount);
                debug!(
                    "player health {}/{}",
                    session.player_health(),
                    session.max_health()
                );
                changed
            }
            SessionReport::PlayerHealed(amount) => {
                session.heal(amount);
                None
            }
            SessionReport::PlayerDied => session.player_died(),
            SessionReport::EnemyKilled => {
                let changed = session.report_enemy_killed();
                info!("enemy killed, total {}", session.kills());
                changed
            }
        };

        match changed {
            Some(Phase::GameOver) => {
                session.set_defeat_message(model::pick_defeat_message(&mut rand::thread_rng()));
                info!("=== GAME OVER === ({})", session.elapsed_clock());
            }
            Some(Phase::Victory) => info!("=== VICTORY === ({})", session.elapsed_clock()),
            _ => {}
        }
    }
}

fn advance_session_clock(time: Res<Time>, mut session: ResMut<Session>) {
    session.advance(time.delta_secs());
}

/// Anything but `Playing` stops virtual time, which stops physics, AI and every deadline.
pub fn sync_virtual_time(session: Res<Session>, mut time: ResMut<Time<Virtual>>) {
    let halt = session.phase() != Phase::Playing;
    if halt != time.is_paused() {
        if halt {
            time.pause();
        } else {
            time.unpause();
        }
    }
}
