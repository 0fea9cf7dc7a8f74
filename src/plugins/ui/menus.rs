//! Title, pause, game-over and victory panels.
//!
//! Buttons only emit `MenuAction`s; the session plugin decides what they do. In-game panels are
//! spawned hidden and shown by `sync_panels` from the session phase.

use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::plugins::session::{MenuAction, Phase, Session};

#[derive(Component, Debug, Clone, Copy)]
pub struct MenuButton(pub MenuAction);

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Pause,
    GameOver,
    Victory,
}

/// Text on the game-over panel that carries the defeat line and run stats.
#[derive(Component)]
pub struct DefeatText;

#[derive(Component)]
pub struct VictoryText;

const BUTTON_IDLE: Color = Color::srgb(0.22, 0.14, 0.16);
const BUTTON_HOVER: Color = Color::srgb(0.36, 0.22, 0.2);
const BUTTON_PRESSED: Color = Color::srgb(0.55, 0.3, 0.2);
const PANEL_BG: Color = Color::srgba(0.05, 0.03, 0.04, 0.85);
const TEXT: Color = Color::srgb(0.95, 0.9, 0.85);

pub fn setup_menu_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::Title), spawn_title)
        .add_systems(OnEnter(GameState::InGame), spawn_session_panels)
        .add_systems(Update, press_menu_buttons)
        .add_systems(
            Update,
            (sync_panels, update_summary_text).run_if(in_state(GameState::InGame)),
        );
}

/// Which panel a phase shows, if any.
pub fn panel_for(phase: Phase) -> Option<Panel> {
    match phase {
        Phase::Playing => None,
        Phase::Paused => Some(Panel::Pause),
        Phase::GameOver => Some(Panel::GameOver),
        Phase::Victory => Some(Panel::Victory),
    }
}

pub fn button_label(action: MenuAction) -> &'static str {
    match action {
        MenuAction::Start => "Start",
        MenuAction::TogglePause | MenuAction::Resume => "Resume",
        MenuAction::Restart => "Restart",
        MenuAction::Quit => "Quit",
    }
}

fn panel_node() -> Node {
    Node {
        width: Val::Percent(100.0),
        height: Val::Percent(100.0),
        position_type: PositionType::Absolute,
        flex_direction: FlexDirection::Column,
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        row_gap: Val::Px(14.0),
        ..default()
    }
}

fn heading(text: impl Into<String>, size: f32) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(TEXT),
    )
}

fn spawn_button(parent: &mut ChildSpawnerCommands, action: MenuAction) {
    parent
        .spawn((
            Button,
            MenuButton(action),
            Node {
                width: Val::Px(200.0),
                height: Val::Px(48.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(BUTTON_IDLE),
        ))
        .with_children(|b| {
            b.spawn(heading(button_label(action), 22.0));
        });
}

fn spawn_title(mut commands: Commands) {
    // The gameplay camera only exists in-game.
    commands.spawn((
        Name::new("TitleCamera"),
        Camera2d,
        DespawnOnExit(GameState::Title),
    ));

    commands
        .spawn((
            Name::new("TitleMenu"),
            panel_node(),
            BackgroundColor(PANEL_BG),
            DespawnOnExit(GameState::Title),
        ))
        .with_children(|p| {
            p.spawn(heading("Ember Run", 56.0));
            p.spawn(heading("A/D move, Space jump, J attack, Esc pause", 18.0));
            spawn_button(p, MenuAction::Start);
            spawn_button(p, MenuAction::Quit);
        });
}

/// In-game panels start hidden and go with the session.
fn hidden() -> impl Bundle {
    (Visibility::Hidden, DespawnOnExit(GameState::InGame))
}

fn spawn_session_panels(mut commands: Commands) {
    commands
        .spawn((
            Name::new("PauseMenu"),
            Panel::Pause,
            panel_node(),
            BackgroundColor(PANEL_BG),
            hidden(),
        ))
        .with_children(|p| {
            p.spawn(heading("Paused", 48.0));
            spawn_button(p, MenuAction::Resume);
            spawn_button(p, MenuAction::Restart);
            spawn_button(p, MenuAction::Quit);
        });

    commands
        .spawn((
            Name::new("GameOverMenu"),
            Panel::GameOver,
            panel_node(),
            BackgroundColor(PANEL_BG),
            hidden(),
        ))
        .with_children(|p| {
            p.spawn(heading("Game Over", 48.0));
            p.spawn((DefeatText, heading("", 20.0)));
            spawn_button(p, MenuAction::Restart);
            spawn_button(p, MenuAction::Quit);
        });

    commands
        .spawn((
            Name::new("VictoryMenu"),
            Panel::Victory,
            panel_node(),
            BackgroundColor(PANEL_BG),
            hidden(),
        ))
        .with_children(|p| {
            p.spawn(heading("Victory", 48.0));
            p.spawn((VictoryText, heading("", 20.0)));
            spawn_button(p, MenuAction::Restart);
            spawn_button(p, MenuAction::Quit);
        });
}

pub fn press_menu_buttons(
    mut q: Query<(&Interaction, &MenuButton, &mut BackgroundColor), Changed<Interaction>>,
    mut out: MessageWriter<MenuAction>,
) {
    for (interaction, button, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                bg.0 = BUTTON_PRESSED;
                out.write(button.0);
            }
            Interaction::Hovered => bg.0 = BUTTON_HOVER,
            Interaction::None => bg.0 = BUTTON_IDLE,
        }
    }
}

pub fn sync_panels(session: Option<Res<Session>>, mut q: Query<(&Panel, &mut Visibility)>) {
    let shown = session.and_then(|s| panel_for(s.phase()));
    for (panel, mut vis) in &mut q {
        let want = if shown == Some(*panel) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        vis.set_if_neq(want);
    }
}

pub fn summary_line(session: &Session) -> String {
    format!("{} kills in {}", session.kills(), session.elapsed_clock())
}

fn update_summary_text(
    session: Option<Res<Session>>,
    mut q_defeat: Query<&mut Text, (With<DefeatText>, Without<VictoryText>)>,
    mut q_victory: Query<&mut Text, (With<VictoryText>, Without<DefeatText>)>,
) {
    let Some(session) = session else { return; };
    if !session.is_changed() || !session.is_over() {
        return;
    }

    let summary = summary_line(&session);
    match session.phase() {
        Phase::GameOver => {
            if let Ok(mut text) = q_defeat.single_mut() {
                text.0 = match session.defeat_message() {
                    Some(line) => format!("{line}\n{summary}"),
                    None => summary,
                };
            }
        }
        Phase::Victory => {
            if let Ok(mut text) = q_victory.single_mut() {
                text.0 = summary;
            }
        }
        _ => {}
    }
}
