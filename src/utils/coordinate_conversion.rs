use bevy::prelude::*;
use crate::tile_system::types::GridCell;

/// Horizontal spacing factor between neighbouring cells, relative to tile width
const WIDTH_FACTOR: f32 = 0.8;
/// Vertical spacing factor between neighbouring cells, relative to tile height
const HEIGHT_FACTOR: f32 = 0.25;

/// Isometric projection between grid space and screen space.
///
/// Screen space here is the unzoomed, unpanned layout plane: pixels, y grows
/// downward. Zoom and pan are applied on top of it by the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoProjection {
    pub tile_width: f32,
    pub tile_height: f32,
    pub grid_size: u32,
}

impl IsoProjection {
    pub fn new(tile_width: f32, tile_height: f32, grid_size: u32) -> Self {
        Self { tile_width, tile_height, grid_size }
    }

    fn width_step(&self) -> f32 {
        self.tile_width * WIDTH_FACTOR
    }

    fn height_step(&self) -> f32 {
        self.tile_height * HEIGHT_FACTOR
    }

    /// Project a (possibly fractional) grid position to screen space
    pub fn grid_to_screen(&self, grid: Vec2) -> Vec2 {
        Vec2::new(
            (grid.x - grid.y) * self.width_step(),
            (grid.x + grid.y) * self.height_step(),
        )
    }

    /// Inverse of `grid_to_screen`. The result is not rounded.
    pub fn screen_to_grid(&self, screen: Vec2) -> Vec2 {
        let u = screen.x / self.width_step();
        let v = screen.y / self.height_step();
        Vec2::new((v + u) / 2.0, (v - u) / 2.0)
    }

    /// The cell the layout is centred on
    pub fn grid_center(&self) -> GridCell {
        GridCell::new(self.grid_size / 2, self.grid_size / 2)
    }

    /// Centre of a cell's sprite in world space (screen space shifted so the
    /// grid centre sits at the origin)
    pub fn tile_center(&self, cell: GridCell) -> Vec2 {
        self.grid_to_screen(cell.as_vec2()) - self.grid_to_screen(self.grid_center().as_vec2())
    }

    /// World-space rectangle covered by a cell's sprite
    pub fn tile_rect(&self, cell: GridCell) -> Rect {
        Rect::from_center_size(self.tile_center(cell), self.tile_size())
    }

    pub fn tile_size(&self) -> Vec2 {
        Vec2::new(self.tile_width, self.tile_height)
    }

    /// Fractional grid position under a world-space point
    pub fn world_to_grid(&self, world: Vec2) -> Vec2 {
        self.screen_to_grid(world + self.grid_to_screen(self.grid_center().as_vec2()))
    }

    /// Footprint diamond of a cell in world space, clockwise from the top corner
    pub fn tile_footprint(&self, cell: GridCell) -> [Vec2; 4] {
        let center = self.tile_center(cell);
        let half_w = self.width_step();
        let half_h = self.height_step();
        [
            center + Vec2::new(0.0, -half_h),
            center + Vec2::new(half_w, 0.0),
            center + Vec2::new(0.0, half_h),
            center + Vec2::new(-half_w, 0.0),
        ]
    }
}

/// Layout space is y-down, Bevy's world is y-up
pub fn layout_to_bevy(point: Vec2) -> Vec2 {
    Vec2::new(point.x, -point.y)
}
