use bevy::prelude::*;
use crate::tile_system::types::GridCell;

/// Sprite drawing one grid cell
#[derive(Component, Debug, Clone, Copy)]
pub struct TileSprite {
    pub cell: GridCell,
}
