use bevy::prelude::*;
use bevy::time::common_conditions::on_timer;
use crate::plugins::ViewerSet;
use crate::systems::ui::{
    setup_ui, update_info_panel, update_mini_map_indicator, update_mini_map_tiles,
    update_zoom_level_text,
};

/// Plugin for the zoom readout, terrain panel, buttons and mini-map
pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_systems(Startup, setup_ui)
            .add_systems(Update, (
                // 4 Hz is plenty for a text readout
                update_zoom_level_text.run_if(on_timer(std::time::Duration::from_millis(250))),
                update_info_panel,
                update_mini_map_tiles,
                update_mini_map_indicator,
            ).in_set(ViewerSet::Present));
    }
}
