//! Dismissable notice shown after a failed simulation run.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use scenario::ScenarioNotice;

use crate::theme::ERROR_RED;

pub fn error_notice_ui(mut contexts: EguiContexts, mut notice: ResMut<ScenarioNotice>) {
    let Some(message) = notice.message.clone() else {
        return;
    };

    let mut dismissed = false;
    egui::Window::new("Simulation failed")
        .anchor(egui::Align2::CENTER_TOP, [0.0, 12.0])
        .collapsible(false)
        .resizable(false)
        .show(contexts.ctx_mut(), |ui| {
            ui.colored_label(ERROR_RED, message);
            ui.label("The previous scene is kept. Try sampling again.");
            if ui.button("Dismiss").clicked() {
                dismissed = true;
            }
        });

    if dismissed {
        notice.dismiss();
    }
}
