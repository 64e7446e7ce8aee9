use bevy::prelude::*;
use crate::plugins::ViewerSet;
use crate::systems::camera::apply_viewport_commands;
use crate::systems::interaction::{
    handle_viewer_buttons, poll_redraws, poll_terrain_info, redraw_shortcut, resolve_tile_clicks,
    select_clicked_tile, start_redraws,
};

/// Plugin for tile selection, terrain info and redraw requests
pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_systems(Update, (
                handle_viewer_buttons.before(apply_viewport_commands),
                redraw_shortcut,
            ).in_set(ViewerSet::Input))
            .add_systems(Update, (
                resolve_tile_clicks,
                select_clicked_tile,
                poll_terrain_info,
                start_redraws,
                poll_redraws,
            ).chain().in_set(ViewerSet::Interaction));
    }
}
