//! UI plugin (render-only): HUD plus title / pause / end-of-run menus.

pub mod hud;
pub mod menus;

use bevy::prelude::*;

pub fn plugin(app: &mut App) {
    hud::setup_hud_systems(app);
    menus::setup_menu_systems(app);
}
