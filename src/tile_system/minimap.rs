use bevy::prelude::*;

use crate::resources::settings::ViewerConfig;
use crate::resources::viewport::ViewportState;
use crate::tile_system::types::GridCell;
use crate::utils::coordinate_conversion::IsoProjection;

/// Whether the mini-map is shown; everything else about it is derived
#[derive(Resource, Debug)]
pub struct MiniMapState {
    pub visible: bool,
}

impl Default for MiniMapState {
    fn default() -> Self {
        Self { visible: true }
    }
}

/// Maps grid and viewport state onto the mini-map square
#[derive(Debug, Clone, Copy)]
pub struct MiniMapProjector {
    projection: IsoProjection,
    size: f32,
    unit_tile_size: f32,
}

impl MiniMapProjector {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            projection: config.projection(),
            size: config.mini_map_size,
            unit_tile_size: config.mini_map_unit_tile_size,
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn scale(&self) -> f32 {
        self.size / (self.projection.grid_size as f32 * self.unit_tile_size)
    }

    /// Mini-map footprint of one grid unit
    fn step(&self) -> f32 {
        self.unit_tile_size * self.scale()
    }

    /// Mini-map position of a fractional grid point; the grid centre lands in
    /// the middle of the map
    pub fn project(&self, grid: Vec2) -> Vec2 {
        let d = grid - self.projection.grid_center().as_vec2();
        let s = self.step();
        Vec2::splat(self.size / 2.0) + Vec2::new((d.x - d.y) * s / 2.0, (d.x + d.y) * s / 4.0)
    }

    pub fn project_cell(&self, cell: GridCell) -> Vec2 {
        self.project(cell.as_vec2())
    }

    /// Mini-map rectangle covering what the window currently shows
    pub fn viewport_indicator(&self, viewport: &ViewportState, viewport_size: Vec2) -> Rect {
        let center = self.project(self.projection.world_to_grid(viewport.look_at()));

        // Layout pixels per grid unit along each screen axis, matched with the
        // mini-map's own per-unit spacing
        let world_span = viewport_size / viewport.zoom;
        let s = self.step();
        let per_world = Vec2::new(
            (s / 2.0) / (self.projection.tile_width * 0.8),
            (s / 4.0) / (self.projection.tile_height * 0.25),
        );

        Rect::from_center_size(center, world_span * per_world)
    }
}
