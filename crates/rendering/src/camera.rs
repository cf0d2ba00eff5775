use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::egui_input_guard::egui_wants_pointer;

const ZOOM_SPEED: f32 = 0.15;
const MIN_DISTANCE: f32 = 8.0;
const MAX_DISTANCE: f32 = 250.0;
const MIN_PITCH: f32 = 2.0 * std::f32::consts::PI / 180.0; // just above the ground
const MAX_PITCH: f32 = 85.0 * std::f32::consts::PI / 180.0;
const ORBIT_SENSITIVITY: f32 = 0.005;

/// Orbital camera model: the camera orbits around a focus point inside the
/// column. The scene rebuild moves the focus to the canopy mid-height.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Point the camera looks at
    pub focus: Vec3,
    /// Horizontal rotation in radians
    pub yaw: f32,
    /// Elevation angle in radians (clamped between MIN_PITCH and MAX_PITCH)
    pub pitch: f32,
    /// Distance from focus point
    pub distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            focus: Vec3::new(0.0, 5.0, 0.0),
            yaw: 35.0_f32.to_radians(),
            pitch: 25.0_f32.to_radians(),
            distance: 60.0,
        }
    }
}

#[derive(Resource, Default)]
pub struct CameraOrbitDrag {
    pub dragging: bool,
    pub last_pos: Vec2,
}

pub fn setup_camera(mut commands: Commands, orbit: Res<OrbitCamera>) {
    let (pos, look_at) = orbit_to_transform(&orbit);
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(pos).looking_at(look_at, Vec3::Y),
    ));
}

pub fn orbit_to_transform(orbit: &OrbitCamera) -> (Vec3, Vec3) {
    // Spherical to cartesian offset from focus
    let x = orbit.distance * orbit.pitch.cos() * orbit.yaw.sin();
    let y = orbit.distance * orbit.pitch.sin();
    let z = orbit.distance * orbit.pitch.cos() * orbit.yaw.cos();
    (orbit.focus + Vec3::new(x, y, z), orbit.focus)
}

/// System: apply OrbitCamera state to the actual camera Transform.
pub fn apply_orbit_camera(
    orbit: Res<OrbitCamera>,
    mut query: Query<&mut Transform, With<Camera3d>>,
) {
    if !orbit.is_changed() {
        return;
    }
    let (pos, look_at) = orbit_to_transform(&orbit);
    let Ok(mut transform) = query.get_single_mut() else {
        return;
    };
    *transform = Transform::from_translation(pos).looking_at(look_at, Vec3::Y);
}

/// Left or right mouse drag: orbit (horizontal = yaw, vertical = pitch).
pub fn camera_orbit_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    mut contexts: EguiContexts,
    mut drag: ResMut<CameraOrbitDrag>,
    mut orbit: ResMut<OrbitCamera>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };

    let pressed = buttons.just_pressed(MouseButton::Left) || buttons.just_pressed(MouseButton::Right);
    if pressed && !egui_wants_pointer(&mut contexts) {
        if let Some(pos) = window.cursor_position() {
            drag.dragging = true;
            drag.last_pos = pos;
        }
    }

    if !buttons.pressed(MouseButton::Left) && !buttons.pressed(MouseButton::Right) {
        drag.dragging = false;
    }

    if drag.dragging {
        if let Some(pos) = window.cursor_position() {
            let delta = pos - drag.last_pos;
            if delta != Vec2::ZERO {
                orbit.yaw -= delta.x * ORBIT_SENSITIVITY;
                orbit.pitch =
                    (orbit.pitch + delta.y * ORBIT_SENSITIVITY).clamp(MIN_PITCH, MAX_PITCH);
            }
            drag.last_pos = pos;
        }
    }
}

/// Scroll wheel: zoom (change distance).
pub fn camera_zoom(
    mut scroll_evts: EventReader<MouseWheel>,
    mut contexts: EguiContexts,
    mut orbit: ResMut<OrbitCamera>,
) {
    if egui_wants_pointer(&mut contexts) {
        scroll_evts.clear();
        return;
    }
    for evt in scroll_evts.read() {
        let dy = match evt.unit {
            MouseScrollUnit::Line => evt.y,
            MouseScrollUnit::Pixel => evt.y / 100.0,
        };
        orbit.distance = zoomed_distance(orbit.distance, dy);
    }
}

fn zoomed_distance(distance: f32, scroll: f32) -> f32 {
    (distance * (1.0 - scroll * ZOOM_SPEED)).clamp(MIN_DISTANCE, MAX_DISTANCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_position_is_at_distance() {
        let orbit = OrbitCamera::default();
        let (pos, look_at) = orbit_to_transform(&orbit);
        assert_eq!(look_at, orbit.focus);
        assert!((pos.distance(look_at) - orbit.distance).abs() < 1e-3);
        assert!(pos.y > orbit.focus.y, "camera sits above the focus");
    }

    #[test]
    fn test_zoom_is_clamped() {
        assert_eq!(zoomed_distance(10.0, 100.0), MIN_DISTANCE);
        assert_eq!(zoomed_distance(200.0, -100.0), MAX_DISTANCE);
        assert!(zoomed_distance(60.0, 1.0) < 60.0);
    }
}
