use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy::winit::{UpdateMode, WinitSettings};

use scenario::{ScenarioConfig, ScenarioPlugin};

fn main() {
    let config = ScenarioConfig::from_env();

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Canopy Flux".to_string(),
            resolution: (1280.0, 720.0).into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }))
    .insert_resource(WinitSettings {
        focused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(16)),
        unfocused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(100)),
    })
    // Read by the scene plugin for its RNG seed.
    .insert_resource(config.clone())
    .add_plugins((
        ScenarioPlugin::from_config(&config),
        rendering::RenderingPlugin,
        ui::UiPlugin,
    ));

    app.run();
}
