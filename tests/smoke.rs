mod common;

use bevy::prelude::*;
use ember_run::common::state::GameState;
use ember_run::plugins::enemies::Enemy;
use ember_run::plugins::player::Player;
use ember_run::plugins::session::{MenuAction, Phase, Session};

#[test]
fn boots_into_title_with_time_frozen() {
    let mut app = common::app_headless();

    for _ in 0..3 {
        app.update();
    }

    assert_eq!(common::state(&app), GameState::Title);
    assert!(app.world().get_resource::<Session>().is_none());
    assert!(app.world().resource::<Time<Virtual>>().is_paused());
}

#[test]
fn start_action_enters_the_game() {
    let mut app = common::app_headless();
    app.update();

    app.world_mut().write_message(MenuAction::Start);
    // one frame to read the action, one to run the transition
    app.update();
    app.update();

    assert_eq!(common::state(&app), GameState::InGame);
    let session = app.world().resource::<Session>();
    assert_eq!(session.phase(), Phase::Playing);
    assert_eq!(session.player_health(), 5);
}

#[test]
fn entering_the_game_spawns_the_level() {
    let mut app = common::app_in_game();

    for _ in 0..5 {
        app.update();
    }

    assert_eq!(common::count::<With<Player>>(&mut app), 1);
    assert_eq!(common::count::<With<Enemy>>(&mut app), 6);
    assert!(!app.world().resource::<Time<Virtual>>().is_paused());
}
