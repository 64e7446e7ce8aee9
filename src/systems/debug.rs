use bevy::prelude::*;
use crate::resources::{DebugSettings, SelectedTile, ViewerConfig, ViewportState};
use crate::tile_system::lifecycle::{visibility_center, TileLifecycle};
use crate::tile_system::loader::TileLoader;
use crate::tile_system::types::GridCell;
use crate::utils::coordinate_conversion::layout_to_bevy;

const GRID_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.25);
const LOADED_GRID_COLOR: Color = Color::srgba(0.3, 1.0, 0.5, 0.6);

/// System to toggle debug mode with F1
pub fn toggle_debug_mode(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut debug_settings: ResMut<DebugSettings>,
) {
    if keyboard_input.just_pressed(KeyCode::F1) {
        debug_settings.debug_mode = !debug_settings.debug_mode;
        info!("Debug mode: {}", if debug_settings.debug_mode { "ON" } else { "OFF" });
    }
}

/// Outline every cell footprint; loaded cells stand out
pub fn draw_debug_grid(
    mut gizmos: Gizmos,
    debug_settings: Res<DebugSettings>,
    config: Res<ViewerConfig>,
    lifecycle: Res<TileLifecycle>,
) {
    if !debug_settings.show_grid {
        return;
    }

    let projection = config.projection();
    for x in 0..config.grid_size {
        for y in 0..config.grid_size {
            let cell = GridCell::new(x, y);
            let [top, right, bottom, left] = projection.tile_footprint(cell).map(layout_to_bevy);
            let color = if lifecycle.contains(cell) { LOADED_GRID_COLOR } else { GRID_COLOR };
            gizmos.linestrip_2d([top, right, bottom, left, top], color);
        }
    }
}

/// Debug system to print information about the viewport and tiles
pub fn debug_info(
    debug_settings: Res<DebugSettings>,
    config: Res<ViewerConfig>,
    viewport: Res<ViewportState>,
    lifecycle: Res<TileLifecycle>,
    loader: Res<TileLoader>,
    selected: Res<SelectedTile>,
) {
    // Skip if debug mode is disabled
    if !debug_settings.debug_mode {
        return;
    }

    let center = visibility_center(&config, &viewport);
    info!(
        "Zoom: {:.2} | Offset: ({:.0}, {:.0}) | Centre cell: ({:.2}, {:.2}) | Tiles: {} loaded, {} downloading | Selected: {}",
        viewport.zoom,
        viewport.offset.x,
        viewport.offset.y,
        center.x,
        center.y,
        lifecycle.len(),
        loader.pending_count(),
        selected.get().map(|cell| cell.key()).unwrap_or_else(|| "none".to_string()),
    );
}
