mod tiles_plugin;
mod camera_plugin;
mod interaction_plugin;
mod ui_plugin;
mod core_plugin;

use bevy::prelude::*;
use bevy::app::PluginGroupBuilder;
use tiles_plugin::TilesPlugin;
use camera_plugin::CameraPlugin;
use interaction_plugin::InteractionPlugin;
use ui_plugin::UIPlugin;
use core_plugin::CorePlugin;

pub use core_plugin::ViewerSet;

/// Consolidated plugin struct that groups all application plugins
pub struct AppPlugins;

impl PluginGroup for AppPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(CorePlugin)
            .add(CameraPlugin)
            .add(TilesPlugin)
            .add(InteractionPlugin)
            .add(UIPlugin)
    }
}
