mod common;

use bevy::prelude::*;
use ember_run::common::state::GameState;
use ember_run::plugins::enemies::Enemy;
use ember_run::plugins::player::Player;
use ember_run::plugins::session::{MenuAction, Phase, Session, SessionReport};

fn phase(app: &App) -> Phase {
    app.world().resource::<Session>().phase()
}

#[test]
fn lethal_damage_ends_the_run_and_freezes_time() {
    let mut app = common::app_in_game();

    app.world_mut().write_message(SessionReport::PlayerDamaged(2));
    app.update();
    assert_eq!(phase(&app), Phase::Playing);
    assert_eq!(app.world().resource::<Session>().player_health(), 3);

    app.world_mut().write_message(SessionReport::PlayerDamaged(3));
    app.update();

    let session = app.world().resource::<Session>();
    assert_eq!(session.phase(), Phase::GameOver);
    assert!(session.defeat_message().is_some());
    assert!(app.world().resource::<Time<Virtual>>().is_paused());
}

#[test]
fn fifth_kill_wins_and_later_reports_are_ignored() {
    let mut app = common::app_in_game();

    for _ in 0..4 {
        app.world_mut().write_message(SessionReport::EnemyKilled);
    }
    app.update();
    assert_eq!(phase(&app), Phase::Playing);

    app.world_mut().write_message(SessionReport::EnemyKilled);
    app.update();
    assert_eq!(phase(&app), Phase::Victory);

    app.world_mut().write_message(SessionReport::PlayerDied);
    app.update();
    assert_eq!(phase(&app), Phase::Victory);
    assert_eq!(app.world().resource::<Session>().kills(), 5);
}

#[test]
fn pause_toggles_virtual_time() {
    let mut app = common::app_in_game();

    app.world_mut().write_message(MenuAction::TogglePause);
    app.update();
    assert_eq!(phase(&app), Phase::Paused);
    assert!(app.world().resource::<Time<Virtual>>().is_paused());

    app.world_mut().write_message(MenuAction::Resume);
    app.update();
    assert_eq!(phase(&app), Phase::Playing);
    assert!(!app.world().resource::<Time<Virtual>>().is_paused());
}

#[test]
fn restart_after_game_over_starts_a_fresh_session() {
    let mut app = common::app_in_game();

    app.world_mut().write_message(SessionReport::PlayerDied);
    app.update();
    assert_eq!(phase(&app), Phase::GameOver);

    app.world_mut().write_message(MenuAction::Restart);
    // read action, exit InGame into Restarting, then back into InGame
    for _ in 0..4 {
        app.update();
    }

    assert_eq!(common::state(&app), GameState::InGame);
    let session = app.world().resource::<Session>();
    assert_eq!(session.phase(), Phase::Playing);
    assert_eq!(session.kills(), 0);
    assert_eq!(session.player_health(), session.max_health());
    assert_eq!(common::count::<With<Player>>(&mut app), 1);
    assert_eq!(common::count::<With<Enemy>>(&mut app), 6);
}

#[test]
fn quit_requests_app_exit() {
    let mut app = common::app_in_game();

    app.world_mut().write_message(MenuAction::Quit);
    app.update();

    assert_eq!(app.should_exit(), Some(AppExit::Success));
}
