//! Scenario controls window.
//!
//! - Season and forest type pickers
//! - Secondary stand size and spacing sliders
//! - Sample button, disabled while a request is in flight
//! - One checkbox per flux category, applied without a rebuild

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use rendering::{CategoryFilter, FluxCategory};
use scenario::config::{MAX_TREE_COUNT, MAX_TREE_SPACING, MIN_TREE_COUNT, MIN_TREE_SPACING};
use scenario::{ForestType, RequestScenario, ScenarioController, ScenarioControls, ScenarioPhase, Season};

use crate::theme::{to_egui, ERROR_RED, MUTED};

// =============================================================================
// Helpers
// =============================================================================

/// Status line under the sample button.
pub fn phase_label(phase: ScenarioPhase) -> &'static str {
    match phase {
        ScenarioPhase::Idle => "Ready",
        ScenarioPhase::Loading => "Running simulation...",
        ScenarioPhase::Error => "Last run failed",
    }
}

fn phase_color(phase: ScenarioPhase) -> egui::Color32 {
    match phase {
        ScenarioPhase::Error => ERROR_RED,
        _ => MUTED,
    }
}

pub fn sample_button_label(phase: ScenarioPhase) -> &'static str {
    if phase == ScenarioPhase::Loading {
        "Sampling..."
    } else {
        "Sample"
    }
}

// =============================================================================
// Systems
// =============================================================================

pub fn control_panel_ui(
    mut contexts: EguiContexts,
    mut controls: ResMut<ScenarioControls>,
    controller: Res<ScenarioController>,
    mut filter: ResMut<CategoryFilter>,
    mut requests: EventWriter<RequestScenario>,
) {
    let phase = controller.phase();
    let mut edited = *controls;
    let mut toggles: Vec<(FluxCategory, bool)> = Vec::new();

    egui::Window::new("Scenario")
        .anchor(egui::Align2::LEFT_TOP, [12.0, 12.0])
        .resizable(false)
        .default_width(240.0)
        .show(contexts.ctx_mut(), |ui| {
            ui.spacing_mut().item_spacing.y = 6.0;

            egui::ComboBox::from_label("Season")
                .selected_text(edited.season.label())
                .show_ui(ui, |ui| {
                    for season in Season::ALL {
                        ui.selectable_value(&mut edited.season, season, season.label());
                    }
                });
            egui::ComboBox::from_label("Forest")
                .selected_text(edited.forest_type.label())
                .show_ui(ui, |ui| {
                    for forest in ForestType::ALL {
                        ui.selectable_value(&mut edited.forest_type, forest, forest.label());
                    }
                });

            ui.separator();

            ui.add(
                egui::Slider::new(&mut edited.tree_count, MIN_TREE_COUNT..=MAX_TREE_COUNT)
                    .text("trees"),
            );
            ui.add(
                egui::Slider::new(&mut edited.tree_spacing, MIN_TREE_SPACING..=MAX_TREE_SPACING)
                    .text("spacing (m)"),
            );

            ui.separator();

            let button = egui::Button::new(sample_button_label(phase));
            if ui.add_enabled(controller.can_trigger(), button).clicked() {
                requests.send(RequestScenario);
            }
            ui.colored_label(phase_color(phase), phase_label(phase));

            ui.separator();

            ui.label("Flux glyphs:");
            for category in FluxCategory::ALL {
                ui.horizontal(|ui| {
                    let mut on = filter.is_enabled(category);
                    if ui.checkbox(&mut on, category.label()).changed() {
                        toggles.push((category, on));
                    }
                    ui.colored_label(to_egui(category.color()), "■");
                });
            }
        });

    if edited != *controls {
        *controls = edited;
    }
    for (category, on) in toggles {
        filter.set(category, on);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_labels_distinct() {
        let labels = [
            phase_label(ScenarioPhase::Idle),
            phase_label(ScenarioPhase::Loading),
            phase_label(ScenarioPhase::Error),
        ];
        for i in 0..labels.len() {
            for j in (i + 1)..labels.len() {
                assert_ne!(labels[i], labels[j]);
            }
        }
    }

    #[test]
    fn test_sample_button_label() {
        assert_eq!(sample_button_label(ScenarioPhase::Idle), "Sample");
        assert_eq!(sample_button_label(ScenarioPhase::Error), "Sample");
        assert_eq!(sample_button_label(ScenarioPhase::Loading), "Sampling...");
    }
}
