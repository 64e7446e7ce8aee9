use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow};

use crate::components::UiControl;
use crate::resources::constants::WHEEL_PIXELS_PER_STEP;
use crate::resources::{
    DebugSettings, Pinch, PointerRelease, TouchGestureState, ViewerConfig, ViewportState, ZoomSettle,
};
use crate::tile_system::minimap::MiniMapState;
use crate::tile_system::types::{PointerClick, RecomputeVisible, ViewportCommand};
use crate::utils::coordinate_conversion::layout_to_bevy;

fn pointer_over_ui(ui_controls: &Query<&Interaction, With<UiControl>>) -> bool {
    ui_controls.iter().any(|interaction| *interaction != Interaction::None)
}

/// Left mouse button pans the map; a press without movement is a click
pub fn mouse_pan_system(
    mouse: Res<ButtonInput<MouseButton>>,
    mut cursor_moved: EventReader<CursorMoved>,
    windows: Query<&Window, With<PrimaryWindow>>,
    ui_controls: Query<&Interaction, With<UiControl>>,
    mut viewport: ResMut<ViewportState>,
    mut clicks: EventWriter<PointerClick>,
    mut recompute: EventWriter<RecomputeVisible>,
) {
    let cursor = windows.get_single().ok().and_then(|w| w.cursor_position());

    if mouse.just_pressed(MouseButton::Left) {
        if let Some(cursor) = cursor {
            if !pointer_over_ui(&ui_controls) {
                viewport.begin_drag(cursor);
            }
        }
    }

    if viewport.is_dragging() {
        for moved in cursor_moved.read() {
            viewport.drag_to(moved.position);
        }
    } else {
        cursor_moved.clear();
    }

    if mouse.just_released(MouseButton::Left) {
        match viewport.end_drag() {
            Some(PointerRelease::Click) => {
                if let Some(position) = cursor {
                    clicks.send(PointerClick { position });
                }
            }
            Some(PointerRelease::Pan) => {
                recompute.send(RecomputeVisible);
            }
            None => {}
        }
    }
}

/// Zoom steps for one wheel event. Line units count notches, pixel units
/// (trackpads) are scaled down so a gesture zooms smoothly.
pub fn wheel_steps(unit: MouseScrollUnit, y: f32) -> f32 {
    match unit {
        MouseScrollUnit::Line => y,
        MouseScrollUnit::Pixel => y / WHEEL_PIXELS_PER_STEP,
    }
}

/// Wheel zooms around the viewport centre, at most one step per frame; the
/// tile recompute waits for the wheel to settle
pub fn mouse_wheel_zoom(
    mut wheel: EventReader<MouseWheel>,
    time: Res<Time>,
    mut viewport: ResMut<ViewportState>,
    mut settle: ResMut<ZoomSettle>,
) {
    let steps: f32 = wheel.read().map(|event| wheel_steps(event.unit, event.y)).sum();
    if steps == 0.0 {
        return;
    }
    viewport.zoom_by_steps(steps.clamp(-1.0, 1.0));
    settle.0.poke(time.elapsed());
}

/// One finger pans (and taps click), two fingers pinch-zoom around their midpoint
pub fn touch_gesture_system(
    touches: Res<Touches>,
    time: Res<Time>,
    windows: Query<&Window, With<PrimaryWindow>>,
    ui_controls: Query<&Interaction, With<UiControl>>,
    mut gestures: ResMut<TouchGestureState>,
    mut viewport: ResMut<ViewportState>,
    mut settle: ResMut<ZoomSettle>,
    mut clicks: EventWriter<PointerClick>,
    mut recompute: EventWriter<RecomputeVisible>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let active: Vec<_> = touches.iter().collect();

    match active.as_slice() {
        [first, second] => {
            let distance = first.position().distance(second.position());
            if gestures.pinch.is_none() {
                viewport.cancel_drag();
                gestures.primary = None;
                gestures.pinch = Some(Pinch {
                    start_distance: distance,
                    start_zoom: viewport.zoom,
                });
            } else if let Some(zoom) = gestures.pinch_zoom(distance) {
                let midpoint = (first.position() + second.position()) / 2.0;
                viewport.zoom_at(midpoint - window.size() / 2.0, zoom);
                settle.0.poke(time.elapsed());
            }
        }
        [touch] if gestures.pinch.is_none() => {
            if touches.just_pressed(touch.id()) {
                if !pointer_over_ui(&ui_controls) {
                    viewport.begin_drag(touch.position());
                    gestures.primary = Some(touch.id());
                }
            } else if gestures.primary == Some(touch.id()) && touch.delta() != Vec2::ZERO {
                viewport.drag_to(touch.position());
            }
        }
        _ => {}
    }

    for touch in touches.iter_just_released() {
        if gestures.primary != Some(touch.id()) {
            continue;
        }
        gestures.primary = None;
        match viewport.end_drag() {
            Some(PointerRelease::Click) => {
                clicks.send(PointerClick { position: touch.position() });
            }
            Some(PointerRelease::Pan) => {
                recompute.send(RecomputeVisible);
            }
            None => {}
        }
    }

    for touch in touches.iter_just_canceled() {
        if gestures.primary == Some(touch.id()) {
            gestures.primary = None;
            viewport.cancel_drag();
        }
    }

    if active.is_empty() && gestures.pinch.is_some() {
        gestures.pinch = None;
    }
}

/// Keyboard shortcuts for the viewport commands
pub fn keyboard_shortcuts(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut commands: EventWriter<ViewportCommand>,
) {
    if keyboard_input.just_pressed(KeyCode::Equal) || keyboard_input.just_pressed(KeyCode::NumpadAdd) {
        commands.send(ViewportCommand::ZoomIn);
    }
    if keyboard_input.just_pressed(KeyCode::Minus) || keyboard_input.just_pressed(KeyCode::NumpadSubtract) {
        commands.send(ViewportCommand::ZoomOut);
    }
    if keyboard_input.just_pressed(KeyCode::Digit0) {
        commands.send(ViewportCommand::Reset);
    }
    if keyboard_input.just_pressed(KeyCode::KeyG) {
        commands.send(ViewportCommand::ToggleDebugGrid);
    }
    if keyboard_input.just_pressed(KeyCode::KeyM) {
        commands.send(ViewportCommand::ToggleMiniMap);
    }
}

/// Apply host commands to the viewport and toggles
pub fn apply_viewport_commands(
    mut commands: EventReader<ViewportCommand>,
    config: Res<ViewerConfig>,
    mut viewport: ResMut<ViewportState>,
    mut debug_settings: ResMut<DebugSettings>,
    mut mini_map: ResMut<MiniMapState>,
    mut recompute: EventWriter<RecomputeVisible>,
) {
    for command in commands.read() {
        match *command {
            ViewportCommand::PanTo(cell) => {
                viewport.pan_to(config.projection().tile_center(cell));
                recompute.send(RecomputeVisible);
            }
            ViewportCommand::ZoomIn => {
                viewport.zoom_in();
                recompute.send(RecomputeVisible);
            }
            ViewportCommand::ZoomOut => {
                viewport.zoom_out();
                recompute.send(RecomputeVisible);
            }
            ViewportCommand::Reset => {
                viewport.reset();
                recompute.send(RecomputeVisible);
            }
            ViewportCommand::ToggleDebugGrid => {
                debug_settings.show_grid = !debug_settings.show_grid;
                info!("Debug grid: {}", if debug_settings.show_grid { "ON" } else { "OFF" });
            }
            ViewportCommand::ToggleMiniMap => {
                mini_map.visible = !mini_map.visible;
            }
        }
    }
}

/// Fire the deferred recompute once wheel/pinch input has settled
pub fn settle_zoom_recompute(
    time: Res<Time>,
    mut settle: ResMut<ZoomSettle>,
    mut recompute: EventWriter<RecomputeVisible>,
) {
    if !settle.0.is_pending() {
        return;
    }
    if settle.0.poll(time.elapsed()) {
        recompute.send(RecomputeVisible);
    }
}

/// Mirror the viewport onto the 2D camera
pub fn sync_camera_to_viewport(
    viewport: Res<ViewportState>,
    mut cameras: Query<(&mut Transform, &mut OrthographicProjection), With<Camera2d>>,
) {
    if !viewport.is_changed() {
        return;
    }
    let Ok((mut transform, mut projection)) = cameras.get_single_mut() else {
        return;
    };

    let look_at = layout_to_bevy(viewport.look_at());
    transform.translation.x = look_at.x;
    transform.translation.y = look_at.y;
    projection.scale = 1.0 / viewport.zoom;
}
