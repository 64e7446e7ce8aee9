use bevy::prelude::*;
use crate::plugins::ViewerSet;
use crate::systems::debug::draw_debug_grid;
use crate::tile_system::TileSystemPlugin;

/// Plugin for the isometric tile layer
pub struct TilesPlugin;

impl Plugin for TilesPlugin {
    fn build(&self, app: &mut App) {
        // TileSystemPlugin registers the lifecycle, download and sprite systems
        app.add_plugins(TileSystemPlugin)
            .add_systems(Update, draw_debug_grid.in_set(ViewerSet::Present));
    }
}
