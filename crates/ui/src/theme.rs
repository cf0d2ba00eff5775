use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

pub const ERROR_RED: egui::Color32 = egui::Color32::from_rgb(230, 90, 80);
pub const MUTED: egui::Color32 = egui::Color32::from_rgb(150, 160, 150);

/// egui color for a Bevy color, alpha dropped.
pub fn to_egui(color: Color) -> egui::Color32 {
    let srgba = color.to_srgba();
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgb(channel(srgba.red), channel(srgba.green), channel(srgba.blue))
}

pub fn apply_canopy_theme(mut contexts: EguiContexts) {
    let ctx = contexts.ctx_mut();
    let mut style = (*ctx.style()).clone();

    // Dark moss background
    let panel = egui::Color32::from_rgb(32, 38, 34);
    let inactive = egui::Color32::from_rgb(48, 58, 50);
    let hover = egui::Color32::from_rgb(66, 86, 68);
    let active = egui::Color32::from_rgb(110, 170, 100);

    style.visuals.widgets.noninteractive.bg_fill = panel;
    style.visuals.widgets.inactive.bg_fill = inactive;
    style.visuals.widgets.hovered.bg_fill = hover;
    style.visuals.widgets.active.bg_fill = active;
    style.visuals.widgets.inactive.weak_bg_fill = inactive;
    style.visuals.widgets.hovered.weak_bg_fill = hover;
    style.visuals.widgets.active.weak_bg_fill = active;

    style.visuals.window_fill = panel;
    style.visuals.panel_fill = panel;
    style.visuals.extreme_bg_color = egui::Color32::from_rgb(26, 30, 27);
    style.visuals.faint_bg_color = egui::Color32::from_rgb(38, 45, 40);

    style.visuals.selection.bg_fill = active;
    style.visuals.selection.stroke = egui::Stroke::new(1.0, active);

    // egui 0.31+ uses CornerRadius with u8 values
    let window_rounding = egui::CornerRadius::same(8);
    let widget_rounding = egui::CornerRadius::same(6);

    style.visuals.window_corner_radius = window_rounding;
    style.visuals.widgets.noninteractive.corner_radius = widget_rounding;
    style.visuals.widgets.inactive.corner_radius = widget_rounding;
    style.visuals.widgets.hovered.corner_radius = widget_rounding;
    style.visuals.widgets.active.corner_radius = widget_rounding;

    ctx.set_style(style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_egui_maps_channels() {
        assert_eq!(to_egui(Color::srgb(1.0, 0.0, 0.0)), egui::Color32::from_rgb(255, 0, 0));
        assert_eq!(to_egui(Color::srgb(0.5, 0.5, 0.5)), egui::Color32::from_rgb(128, 128, 128));
    }
}
