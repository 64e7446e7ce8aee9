use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use futures_lite::future;

use crate::components::ViewerButton;
use crate::resources::{
    RedrawRequests, SelectedTile, TerrainInfoState, TerrainPanel, ViewerConfig, ViewportState,
};
use crate::tile_system::hit_test::{resolve_click, HitCandidate};
use crate::tile_system::lifecycle::{TileImage, TileLifecycle};
use crate::tile_system::loader::TileLoader;
use crate::tile_system::rendering::TilePlaceholder;
use crate::tile_system::types::{
    PointerClick, RecomputeVisible, RedrawTile, TileClicked, ViewportCommand,
};

/// Resolve clicks to tiles, looking through transparent sprite pixels
pub fn resolve_tile_clicks(
    mut clicks: EventReader<PointerClick>,
    windows: Query<&Window, With<PrimaryWindow>>,
    config: Res<ViewerConfig>,
    viewport: Res<ViewportState>,
    lifecycle: Res<TileLifecycle>,
    placeholder: Res<TilePlaceholder>,
    mut tile_clicked: EventWriter<TileClicked>,
) {
    if clicks.is_empty() {
        return;
    }
    let Ok(window) = windows.get_single() else {
        clicks.clear();
        return;
    };

    let viewport_size = window.size();
    let projection = config.projection();
    let stack: Vec<HitCandidate> = lifecycle
        .iter_stacked()
        .map(|(cell, tile)| {
            let (pixels, ready) = match &tile.image {
                TileImage::Ready(pixels) => (pixels.as_ref(), true),
                TileImage::Placeholder => (placeholder.pixels.as_ref(), false),
            };
            HitCandidate {
                cell,
                rect: viewport.rect_to_screen(projection.tile_rect(cell), viewport_size),
                pixels,
                ready,
            }
        })
        .collect();

    for click in clicks.read() {
        match resolve_click(&stack, click.position) {
            Some(cell) => {
                tile_clicked.send(TileClicked { cell });
            }
            None => debug!("Click at {:?} hit no tile", click.position),
        }
    }
}

/// Select the clicked tile and ask the backend about it
pub fn select_clicked_tile(
    mut clicked: EventReader<TileClicked>,
    mut selected: ResMut<SelectedTile>,
    mut terrain: ResMut<TerrainInfoState>,
    loader: Res<TileLoader>,
) {
    // Only the last click of the frame matters
    let Some(cell) = clicked.read().last().map(|c| c.cell) else {
        return;
    };

    if let Some(previous) = selected.select(cell) {
        if previous != cell {
            debug!("Deselected tile {}", previous);
        }
    }
    info!("Selected tile {}", cell);

    if let Some((_, pending)) = terrain.pending.take() {
        pending.abort();
    }
    let source = loader.source();
    let task = loader.runtime().spawn(async move { source.fetch_info(cell).await });
    terrain.pending = Some((cell, task));
    terrain.panel = TerrainPanel::Loading(cell);
}

/// Move a finished terrain info request into the panel
pub fn poll_terrain_info(mut terrain: ResMut<TerrainInfoState>) {
    if terrain.pending.is_none() {
        return;
    }

    let Some((cell, task)) = terrain.pending.as_mut() else {
        return;
    };
    let cell = *cell;
    let Some(result) = future::block_on(future::poll_once(task)) else {
        return;
    };

    terrain.pending = None;
    terrain.panel = match result {
        Ok(Ok(info)) => TerrainPanel::Ready(cell, info),
        Ok(Err(e)) => {
            warn!("Terrain info for {} failed: {}", cell, e);
            TerrainPanel::Failed(cell, e.to_string())
        }
        Err(e) => TerrainPanel::Failed(cell, format!("request aborted: {}", e)),
    };
}

/// `R` redraws the selected tile
pub fn redraw_shortcut(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    selected: Res<SelectedTile>,
    mut redraw: EventWriter<RedrawTile>,
) {
    if !keyboard_input.just_pressed(KeyCode::KeyR) {
        return;
    }
    match selected.get() {
        Some(cell) => {
            redraw.send(RedrawTile { cell });
        }
        None => info!("Select a tile before redrawing"),
    }
}

/// Turn on-screen button presses into commands
pub fn handle_viewer_buttons(
    buttons: Query<(&Interaction, &ViewerButton), Changed<Interaction>>,
    selected: Res<SelectedTile>,
    mut commands: EventWriter<ViewportCommand>,
    mut redraw: EventWriter<RedrawTile>,
) {
    for (interaction, button) in buttons.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match *button {
            ViewerButton::Command(command) => {
                commands.send(command);
            }
            ViewerButton::RedrawSelected => {
                if let Some(cell) = selected.get() {
                    redraw.send(RedrawTile { cell });
                }
            }
        }
    }
}

/// Send redraw requests to the backend
pub fn start_redraws(
    mut requests: EventReader<RedrawTile>,
    loader: Res<TileLoader>,
    mut redraws: ResMut<RedrawRequests>,
) {
    for request in requests.read() {
        let cell = request.cell;
        if redraws.pending.iter().any(|(pending, _)| *pending == cell) {
            continue;
        }
        info!("Requesting redraw of tile {}", cell);
        let source = loader.source();
        let task = loader.runtime().spawn(async move { source.redraw(cell).await });
        redraws.pending.push((cell, task));
    }
}

/// Re-fetch imagery for cells whose redraw finished
pub fn poll_redraws(
    mut redraws: ResMut<RedrawRequests>,
    mut loader: ResMut<TileLoader>,
    mut lifecycle: ResMut<TileLifecycle>,
    mut recompute: EventWriter<RecomputeVisible>,
) {
    if redraws.pending.is_empty() {
        return;
    }

    redraws.pending.retain_mut(|(cell, task)| {
        let Some(result) = future::block_on(future::poll_once(task)) else {
            return true;
        };
        match result {
            Ok(Ok(())) => {
                if lifecycle.clear_missing(*cell) {
                    // Previously empty; let the next plan spawn it
                    recompute.send(RecomputeVisible);
                } else if lifecycle.contains(*cell) {
                    loader.reload(*cell);
                }
            }
            Ok(Err(e)) => warn!("Redraw of tile {} failed: {}", cell, e),
            Err(e) => warn!("Redraw of tile {} aborted: {}", cell, e),
        }
        false
    });
}
