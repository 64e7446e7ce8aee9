use std::sync::Arc;
use bevy::prelude::*;

use crate::resources::{TokioRuntime, ViewerConfig, ViewportState};
use crate::tile_system::loader::TileLoader;
use crate::tile_system::source::HttpTileSource;

/// Resources that have to exist before any system runs
pub struct ViewerResources {
    pub config: ViewerConfig,
    pub runtime: TokioRuntime,
    pub loader: TileLoader,
}

/// Initialize resources for the application
pub fn init_resources() -> anyhow::Result<ViewerResources> {
    let config = ViewerConfig::from_env();
    let runtime = TokioRuntime::new()?;
    let source = HttpTileSource::new(config.server_url.clone())?;
    let loader = TileLoader::new(Arc::new(source), runtime.handle());

    info!(
        "Tile backend: {} ({}x{} grid, visibility {:?})",
        config.server_url, config.grid_size, config.grid_size, config.visibility_anchor
    );

    Ok(ViewerResources { config, runtime, loader })
}

/// Setup the scene with the 2D camera looking at the grid centre
pub fn setup(mut commands: Commands, viewport: Res<ViewportState>) {
    commands.spawn((
        Camera2d,
        OrthographicProjection {
            scale: 1.0 / viewport.zoom,
            ..OrthographicProjection::default_2d()
        },
    ));
}
