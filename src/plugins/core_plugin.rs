use bevy::prelude::*;
use crate::systems::setup::{init_resources, setup};
use crate::resources::{
    DebugSettings, RedrawRequests, SelectedTile, TerrainInfoState, TouchGestureState, ViewportState,
    ZoomSettle,
};
use crate::tile_system::minimap::MiniMapState;
use crate::tile_system::types::{PointerClick, RedrawTile, TileClicked, ViewportCommand};

/// Frame phases, run in this order every update
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewerSet {
    /// Pointer, touch, keyboard and button input
    Input,
    /// Visible set, downloads, sprite images
    Tiles,
    /// Click resolution, selection, backend requests
    Interaction,
    /// Camera, highlight, UI text, mini-map
    Present,
}

/// Core plugin that handles the basic app setup
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        // Initialize resources
        let resources = init_resources().expect("Failed to initialize viewer resources");
        let viewport = ViewportState::from_config(&resources.config);

        app
            .insert_resource(resources.config)
            .insert_resource(resources.runtime)
            .insert_resource(resources.loader)
            .insert_resource(viewport)
            .insert_resource(DebugSettings::from_features())
            .init_resource::<ZoomSettle>()
            .init_resource::<TouchGestureState>()
            .init_resource::<SelectedTile>()
            .init_resource::<TerrainInfoState>()
            .init_resource::<RedrawRequests>()
            .init_resource::<MiniMapState>()
            .add_event::<PointerClick>()
            .add_event::<TileClicked>()
            .add_event::<ViewportCommand>()
            .add_event::<RedrawTile>()
            .configure_sets(
                Update,
                (
                    ViewerSet::Input,
                    ViewerSet::Tiles,
                    ViewerSet::Interaction,
                    ViewerSet::Present,
                )
                    .chain(),
            )
            .add_systems(Startup, setup);
    }
}
