use bevy::prelude::*;

mod components;
mod resources;
mod systems;
mod plugins;
mod tile_system;
mod utils;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Isometric settlement viewer".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(plugins::AppPlugins)
        .run();
}
