use bevy::prelude::*;

pub mod hit_test;
pub mod lifecycle;
pub mod loader;
pub mod minimap;
pub mod rendering;
pub mod source;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

use lifecycle::TileLifecycle;
use types::RecomputeVisible;
use crate::plugins::ViewerSet;
use rendering::{
    apply_loaded_tiles, highlight_selected_tile, recompute_visible_tiles, setup_tile_placeholder,
    sync_tile_stacking,
};

/// Main plugin for the tile system. Expects `TileLoader` to be inserted by the
/// core plugin, since it needs the runtime and the backend.
pub struct TileSystemPlugin;

impl Plugin for TileSystemPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TileLifecycle>()
            .add_event::<RecomputeVisible>()
            .add_systems(Startup, (setup_tile_placeholder, request_initial_tiles))
            .add_systems(
                Update,
                (
                    recompute_visible_tiles,
                    sync_tile_stacking,
                    apply_loaded_tiles,
                )
                    .chain()
                    .in_set(ViewerSet::Tiles),
            )
            .add_systems(Update, highlight_selected_tile.in_set(ViewerSet::Present));
    }
}

fn request_initial_tiles(mut recompute: EventWriter<RecomputeVisible>) {
    recompute.send(RecomputeVisible);
}
