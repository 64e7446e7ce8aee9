use std::sync::Arc;
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use image::{Rgba, RgbaImage};

use crate::components::TileSprite;
use crate::debug_log;
use crate::resources::{DebugSettings, SelectedTile, ViewerConfig, ViewportState};
use crate::tile_system::lifecycle::{visibility_center, visible_cells, LoadedTile, TileImage, TileLifecycle};
use crate::tile_system::loader::TileLoader;
use crate::tile_system::types::{RecomputeVisible, TileError};
use crate::utils::coordinate_conversion::layout_to_bevy;

/// Depth between neighbouring ranks in the tile stack
const TILE_Z_STEP: f32 = 0.01;
const PLACEHOLDER_SIZE: u32 = 64;
const SELECTED_TINT: Color = Color::srgb(1.0, 0.9, 0.45);

/// Image shown while a tile's own image is on its way
#[derive(Resource)]
pub struct TilePlaceholder {
    pub handle: Handle<Image>,
    /// Same pixels, for hit-testing
    pub pixels: Arc<RgbaImage>,
}

/// Translucent diamond occupying the top face of a tile sprite
pub fn placeholder_pixels(size: u32) -> RgbaImage {
    let half = size as f32 / 2.0;
    RgbaImage::from_fn(size, size, |x, y| {
        let dx = (x as f32 + 0.5 - half).abs() / half;
        let dy = (y as f32 + 0.5 - half).abs() / (half / 2.0);
        if dx + dy <= 1.0 {
            Rgba([120, 130, 110, 160])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// Wrap decoded RGBA pixels in a Bevy image
pub fn image_from_rgba(pixels: &RgbaImage) -> Image {
    Image::new(
        Extent3d {
            width: pixels.width(),
            height: pixels.height(),
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        pixels.as_raw().clone(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    )
}

pub fn decode_tile(bytes: &[u8]) -> Result<RgbaImage, TileError> {
    image::load_from_memory(bytes)
        .map(|image| image.to_rgba8())
        .map_err(|e| TileError::Decode(e.to_string()))
}

/// Startup system creating the placeholder texture
pub fn setup_tile_placeholder(mut commands: Commands, mut images: ResMut<Assets<Image>>) {
    let pixels = placeholder_pixels(PLACEHOLDER_SIZE);
    let handle = images.add(image_from_rgba(&pixels));
    commands.insert_resource(TilePlaceholder {
        handle,
        pixels: Arc::new(pixels),
    });
}

/// Bring the loaded tiles in line with the visible set
pub fn recompute_visible_tiles(
    mut commands: Commands,
    mut requests: EventReader<RecomputeVisible>,
    config: Res<ViewerConfig>,
    viewport: Res<ViewportState>,
    placeholder: Res<TilePlaceholder>,
    debug_settings: Res<DebugSettings>,
    mut lifecycle: ResMut<TileLifecycle>,
    mut loader: ResMut<TileLoader>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    let center = visibility_center(&config, &viewport);
    let visible = visible_cells(config.grid_size, center, config.visibility_distance());
    let plan = lifecycle.plan(&visible);
    if plan.is_empty() {
        return;
    }

    debug_log!(
        debug_settings,
        "Visible set around ({:.2}, {:.2}): loading {}, evicting {}",
        center.x,
        center.y,
        plan.load.len(),
        plan.evict.len()
    );

    for cell in &plan.evict {
        loader.cancel(*cell);
        if let Some(tile) = lifecycle.remove(*cell) {
            commands.entity(tile.entity).despawn_recursive();
        }
    }

    let projection = config.projection();
    for cell in &plan.load {
        let position = layout_to_bevy(projection.tile_center(*cell));
        // New tiles go on top of the stack
        let z = lifecycle.len() as f32 * TILE_Z_STEP;
        let entity = commands
            .spawn((
                Sprite {
                    image: placeholder.handle.clone(),
                    custom_size: Some(projection.tile_size()),
                    ..default()
                },
                Transform::from_xyz(position.x, position.y, z),
                TileSprite { cell: *cell },
            ))
            .id();
        lifecycle.insert(*cell, LoadedTile::new(entity));
        loader.request(*cell);
    }
}

/// Keep sprite depth equal to insertion rank after evictions compact the stack
pub fn sync_tile_stacking(
    lifecycle: Res<TileLifecycle>,
    mut sprites: Query<&mut Transform, With<TileSprite>>,
) {
    if !lifecycle.is_changed() {
        return;
    }
    for (rank, (_, tile)) in lifecycle.iter_stacked().enumerate() {
        if let Ok(mut transform) = sprites.get_mut(tile.entity) {
            let z = rank as f32 * TILE_Z_STEP;
            if transform.translation.z != z {
                transform.translation.z = z;
            }
        }
    }
}

/// Swap finished downloads into their sprites
pub fn apply_loaded_tiles(
    mut commands: Commands,
    mut loader: ResMut<TileLoader>,
    mut lifecycle: ResMut<TileLifecycle>,
    mut images: ResMut<Assets<Image>>,
    mut sprites: Query<&mut Sprite, With<TileSprite>>,
    debug_settings: Res<DebugSettings>,
) {
    for event in loader.drain_completed() {
        let cell = event.cell;
        if !lifecycle.contains(cell) {
            continue;
        }

        match event.data.and_then(|bytes| decode_tile(&bytes)) {
            Ok(pixels) => {
                let handle = images.add(image_from_rgba(&pixels));
                if let Some(tile) = lifecycle.get_mut(cell) {
                    if let Ok(mut sprite) = sprites.get_mut(tile.entity) {
                        sprite.image = handle;
                    }
                    tile.image = TileImage::Ready(Arc::new(pixels));
                }
                debug_log!(debug_settings, "Tile {} loaded", cell);
            }
            Err(TileError::NotFound) => {
                debug_log!(debug_settings, "No tile at {}, discarding", cell);
                if let Some(tile) = lifecycle.mark_missing(cell) {
                    commands.entity(tile.entity).despawn_recursive();
                }
            }
            Err(e) => warn!("Failed to load tile {}: {}", cell, e),
        }
    }
}

/// Tint the selected tile, clear the tint on everything else
pub fn highlight_selected_tile(
    selected: Res<SelectedTile>,
    lifecycle: Res<TileLifecycle>,
    mut sprites: Query<(&TileSprite, &mut Sprite)>,
) {
    if !selected.is_changed() && !lifecycle.is_changed() {
        return;
    }
    for (tile, mut sprite) in sprites.iter_mut() {
        let color = if selected.get() == Some(tile.cell) {
            SELECTED_TINT
        } else {
            Color::WHITE
        };
        if sprite.color != color {
            sprite.color = color;
        }
    }
}
