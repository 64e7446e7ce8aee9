use bevy::prelude::*;
use bevy::time::common_conditions::on_timer;
use crate::plugins::ViewerSet;
use crate::systems::{
    camera::{
        apply_viewport_commands, keyboard_shortcuts, mouse_pan_system, mouse_wheel_zoom,
        settle_zoom_recompute, sync_camera_to_viewport, touch_gesture_system,
    },
    debug::{debug_info, toggle_debug_mode},
};

/// Plugin for viewport pan/zoom input and the camera that follows it
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_systems(Update, (
                mouse_pan_system,
                mouse_wheel_zoom,
                touch_gesture_system,
                keyboard_shortcuts,
                toggle_debug_mode,
            ).in_set(ViewerSet::Input))
            .add_systems(Update, (
                apply_viewport_commands,
                settle_zoom_recompute,
            ).chain().after(keyboard_shortcuts).in_set(ViewerSet::Input))
            .add_systems(Update, sync_camera_to_viewport.in_set(ViewerSet::Present))
            .add_systems(Update, debug_info
                .run_if(on_timer(std::time::Duration::from_secs(5)))
                .in_set(ViewerSet::Present));
    }
}
