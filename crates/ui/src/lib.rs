use bevy::prelude::*;
use bevy_egui::EguiPlugin;

pub mod control_panel;
pub mod error_notice;
pub mod readout_panel;
pub mod theme;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .add_systems(Startup, theme::apply_canopy_theme)
            .add_systems(
                Update,
                (
                    control_panel::control_panel_ui,
                    readout_panel::readout_panel_ui,
                    error_notice::error_notice_ui,
                ),
            );
    }
}
