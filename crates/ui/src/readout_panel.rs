//! Temperatures, site parameters and net fluxes of the latest record.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use scenario::{ReadoutLine, Readouts};

use crate::theme::ERROR_RED;

fn lines(ui: &mut egui::Ui, lines: &[ReadoutLine], failed: bool) {
    for line in lines {
        let text = egui::RichText::new(line.text()).monospace();
        if failed {
            ui.label(text.color(ERROR_RED));
        } else {
            ui.label(text);
        }
    }
}

fn section(ui: &mut egui::Ui, title: &str, readouts: &[ReadoutLine], failed: bool) {
    ui.strong(title);
    lines(ui, readouts, failed);
}

pub fn readout_panel_ui(mut contexts: EguiContexts, readouts: Res<Readouts>) {
    let failed = readouts.is_error();

    egui::Window::new("Readouts")
        .anchor(egui::Align2::RIGHT_TOP, [-12.0, 12.0])
        .resizable(false)
        .default_width(260.0)
        .show(contexts.ctx_mut(), |ui| {
            section(ui, "Temperatures", &readouts.temperatures, failed);
            ui.separator();
            section(ui, "Net fluxes", &readouts.net_fluxes, failed);
            ui.separator();
            egui::CollapsingHeader::new("Site parameters")
                .default_open(false)
                .show(ui, |ui| {
                    lines(ui, &readouts.parameters, failed);
                });
        });
}
