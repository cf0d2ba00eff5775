//! Keeps pointer input over egui panels away from the camera.

use bevy_egui::EguiContexts;

/// Returns `true` when egui wants the pointer, i.e. the cursor is over a
/// panel or egui is handling a drag. Camera systems early-return on `true`.
#[inline]
pub fn egui_wants_pointer(contexts: &mut EguiContexts) -> bool {
    let ctx = contexts.ctx_mut();
    ctx.wants_pointer_input() || ctx.is_pointer_over_area()
}
