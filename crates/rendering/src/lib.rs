//! 3D rendering of the soil-vegetation-atmosphere column: procedural trees,
//! the stand around the column and the flux arrow glyphs.

use bevy::prelude::*;

pub mod camera;
pub mod color_ramps;
pub mod column;
pub mod egui_input_guard;
pub mod flux_glyphs;
pub mod scene_rng;
pub mod scene_sync;
pub mod shapes;
pub mod tree_gen;

pub use camera::OrbitCamera;
pub use flux_glyphs::{CategoryFilter, FluxCategory};
pub use scene_sync::{FluxGlyph, ScenePlugin, SceneSlot, SceneSummary};

use camera::CameraOrbitDrag;

/// Windowed rendering: camera, lights and the scene.
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(ScenePlugin)
            .init_resource::<CameraOrbitDrag>()
            .insert_resource(ClearColor(Color::srgb(0.62, 0.76, 0.88)))
            .add_systems(Startup, (camera::setup_camera, setup_lighting))
            .add_systems(
                Update,
                (
                    camera::camera_orbit_drag,
                    camera::camera_zoom,
                    camera::apply_orbit_camera,
                )
                    .chain(),
            );
    }
}

fn setup_lighting(mut commands: Commands) {
    // Ambient light for baseline illumination
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.9, 0.9, 1.0),
        brightness: 300.0,
    });

    // Sun angled from above
    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::XYZ,
            -std::f32::consts::FRAC_PI_4,
            std::f32::consts::FRAC_PI_6,
            0.0,
        )),
    ));
}
