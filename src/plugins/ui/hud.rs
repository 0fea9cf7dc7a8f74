//! In-game HUD: heart row, kill counter and play timer, all bound read-only to `Session`.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::session::Session;

#[derive(Component)]
pub struct HudRoot;

/// One heart of the health row; `0` is the leftmost.
#[derive(Component, Debug, Clone, Copy)]
pub struct HeartIcon(pub i32);

#[derive(Component)]
pub struct KillCounter;

#[derive(Component)]
pub struct PlayTimer;

const HEART_FULL: Color = Color::srgb(0.9, 0.15, 0.2);
const HEART_EMPTY: Color = Color::srgb(0.25, 0.2, 0.22);

pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(
            Update,
            (update_hearts, update_counters, hide_when_over).run_if(in_state(GameState::InGame)),
        );
}

#[inline]
pub fn heart_filled(index: i32, health: i32) -> bool {
    index < health
}

pub fn kills_label(kills: u32, target: u32) -> String {
    format!("Kills: {kills}/{target}")
}

fn spawn_hud(mut commands: Commands, tunables: Res<Tunables>) {
    let hearts = tunables.session.max_health;
    let target = tunables.session.victory_kills;

    commands
        .spawn((
            Name::new("Hud"),
            HudRoot,
            Node {
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Row,
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::Center,
                padding: UiRect::all(Val::Px(16.0)),
                ..default()
            },
            DespawnOnExit(GameState::InGame),
        ))
        .with_children(|parent| {
            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    column_gap: Val::Px(6.0),
                    ..default()
                })
                .with_children(|row| {
                    for i in 0..hearts {
                        row.spawn((
                            HeartIcon(i),
                            Node {
                                width: Val::Px(22.0),
                                height: Val::Px(22.0),
                                ..default()
                            },
                            BackgroundColor(HEART_FULL),
                        ));
                    }
                });

            parent.spawn((
                KillCounter,
                Text::new(kills_label(0, target)),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.9, 0.85)),
            ));

            parent.spawn((
                PlayTimer,
                Text::new("00:00"),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.9, 0.85)),
            ));
        });
}

fn update_hearts(
    session: Option<Res<Session>>,
    mut q: Query<(&HeartIcon, &mut BackgroundColor)>,
) {
    let Some(session) = session else { return; };
    if !session.is_changed() {
        return;
    }
    for (heart, mut bg) in &mut q {
        let color = if heart_filled(heart.0, session.player_health()) {
            HEART_FULL
        } else {
            HEART_EMPTY
        };
        bg.set_if_neq(BackgroundColor(color));
    }
}

fn update_counters(
    session: Option<Res<Session>>,
    tunables: Res<Tunables>,
    mut q_kills: Query<&mut Text, (With<KillCounter>, Without<PlayTimer>)>,
    mut q_timer: Query<&mut Text, (With<PlayTimer>, Without<KillCounter>)>,
) {
    let Some(session) = session else { return; };

    if let Ok(mut text) = q_kills.single_mut() {
        let label = kills_label(session.kills(), tunables.session.victory_kills);
        if text.0 != label {
            text.0 = label;
        }
    }
    if let Ok(mut text) = q_timer.single_mut() {
        let clock = session.elapsed_clock();
        if text.0 != clock {
            text.0 = clock;
        }
    }
}

/// The HUD steps aside once the run is over; the end panels carry the final stats.
pub fn hide_when_over(
    session: Option<Res<Session>>,
    mut q: Query<&mut Visibility, With<HudRoot>>,
) {
    let over = session.is_some_and(|s| s.is_over());
    let want = if over { Visibility::Hidden } else { Visibility::Inherited };
    for mut vis in &mut q {
        vis.set_if_neq(want);
    }
}
