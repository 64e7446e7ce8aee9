use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use bevy::prelude::*;
use image::RgbaImage;

use crate::resources::settings::{ViewerConfig, VisibilityAnchor};
use crate::resources::viewport::ViewportState;
use crate::tile_system::types::GridCell;

/// Pixels currently shown by a tile
#[derive(Debug, Clone)]
pub enum TileImage {
    /// Fetch still running, or it failed and the placeholder stayed
    Placeholder,
    /// Decoded tile image, kept for hit-testing
    Ready(Arc<RgbaImage>),
}

impl TileImage {
    pub fn is_ready(&self) -> bool {
        matches!(self, TileImage::Ready(_))
    }
}

/// A cell that is on screen, with the sprite entity that draws it
#[derive(Debug, Clone)]
pub struct LoadedTile {
    pub entity: Entity,
    pub image: TileImage,
}

impl LoadedTile {
    pub fn new(entity: Entity) -> Self {
        Self { entity, image: TileImage::Placeholder }
    }
}

/// Loads and evictions needed to match the visible set
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VisibilityPlan {
    pub load: Vec<GridCell>,
    pub evict: Vec<GridCell>,
}

impl VisibilityPlan {
    pub fn is_empty(&self) -> bool {
        self.load.is_empty() && self.evict.is_empty()
    }
}

/// Every cell of a `grid_size`² grid within `max_distance` of `center`
pub fn visible_cells(grid_size: u32, center: Vec2, max_distance: f32) -> HashSet<GridCell> {
    let mut visible = HashSet::new();
    for x in 0..grid_size {
        for y in 0..grid_size {
            let cell = GridCell::new(x, y);
            if cell.distance_to(center) <= max_distance {
                visible.insert(cell);
            }
        }
    }
    visible
}

/// Grid point the visible set is measured from
pub fn visibility_center(config: &ViewerConfig, viewport: &ViewportState) -> Vec2 {
    let projection = config.projection();
    match config.visibility_anchor {
        VisibilityAnchor::GridCenter => projection.grid_center().as_vec2(),
        VisibilityAnchor::ViewportCenter => projection.world_to_grid(viewport.look_at()),
    }
}

/// Owner of every loaded tile, keyed by cell.
///
/// `order` keeps cells in insertion order; a tile's index in it is its
/// stacking rank (later means drawn on top). `missing` holds cells the
/// backend answered 404 for; they are not planned again until a redraw
/// clears them.
#[derive(Resource, Default)]
pub struct TileLifecycle {
    loaded: HashMap<GridCell, LoadedTile>,
    order: Vec<GridCell>,
    missing: HashSet<GridCell>,
}

impl TileLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff the loaded tiles against `visible`. Loads come out row-major so
    /// the stacking order is deterministic.
    pub fn plan(&self, visible: &HashSet<GridCell>) -> VisibilityPlan {
        let mut load: Vec<GridCell> = visible
            .iter()
            .filter(|cell| !self.loaded.contains_key(cell) && !self.missing.contains(cell))
            .copied()
            .collect();
        load.sort();

        let evict = self
            .order
            .iter()
            .filter(|cell| !visible.contains(cell))
            .copied()
            .collect();

        VisibilityPlan { load, evict }
    }

    /// Register a tile on top of the stack. Replaces (and returns) any tile
    /// already registered for the cell.
    pub fn insert(&mut self, cell: GridCell, tile: LoadedTile) -> Option<LoadedTile> {
        let previous = self.remove(cell);
        self.order.push(cell);
        self.loaded.insert(cell, tile);
        previous
    }

    pub fn remove(&mut self, cell: GridCell) -> Option<LoadedTile> {
        let tile = self.loaded.remove(&cell)?;
        self.order.retain(|c| *c != cell);
        Some(tile)
    }

    /// Drop a cell the backend has nothing for and keep it out of later plans
    pub fn mark_missing(&mut self, cell: GridCell) -> Option<LoadedTile> {
        self.missing.insert(cell);
        self.remove(cell)
    }

    /// Make a missing cell plannable again. Returns whether it was missing.
    pub fn clear_missing(&mut self, cell: GridCell) -> bool {
        self.missing.remove(&cell)
    }

    pub fn get(&self, cell: GridCell) -> Option<&LoadedTile> {
        self.loaded.get(&cell)
    }

    pub fn get_mut(&mut self, cell: GridCell) -> Option<&mut LoadedTile> {
        self.loaded.get_mut(&cell)
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        self.loaded.contains_key(&cell)
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    /// Loaded tiles bottom to top
    pub fn iter_stacked(&self) -> impl Iterator<Item = (GridCell, &LoadedTile)> + '_ {
        self.order
            .iter()
            .filter_map(move |cell| self.loaded.get(cell).map(|tile| (*cell, tile)))
    }

    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.order.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(lifecycle: &mut TileLifecycle, plan: &VisibilityPlan) {
        for cell in &plan.evict {
            lifecycle.remove(*cell);
        }
        for (i, cell) in plan.load.iter().enumerate() {
            lifecycle.insert(*cell, LoadedTile::new(Entity::from_raw(i as u32)));
        }
    }

    #[test]
    fn visible_set_uses_euclidean_radius() {
        let visible = visible_cells(16, Vec2::new(8.0, 8.0), 1.5);
        let mut cells: Vec<_> = visible.into_iter().collect();
        cells.sort();
        assert_eq!(
            cells,
            vec![
                GridCell::new(7, 7),
                GridCell::new(7, 8),
                GridCell::new(7, 9),
                GridCell::new(8, 7),
                GridCell::new(8, 8),
                GridCell::new(8, 9),
                GridCell::new(9, 7),
                GridCell::new(9, 8),
                GridCell::new(9, 9),
            ]
        );
    }

    #[test]
    fn visible_set_is_clipped_to_grid() {
        let visible = visible_cells(16, Vec2::new(0.0, 0.0), 1.0);
        assert_eq!(visible.len(), 3);
        assert!(visible.contains(&GridCell::new(0, 0)));
    }

    #[test]
    fn second_recompute_plans_nothing() {
        let mut lifecycle = TileLifecycle::new();
        let visible = visible_cells(16, Vec2::new(8.0, 8.0), 9.0);

        let first = lifecycle.plan(&visible);
        assert_eq!(first.load.len(), visible.len());
        apply(&mut lifecycle, &first);

        let second = lifecycle.plan(&visible);
        assert!(second.is_empty());
        assert_eq!(lifecycle.len(), visible.len());
    }

    #[test]
    fn moving_centre_evicts_cells_that_left() {
        let mut lifecycle = TileLifecycle::new();
        let before = visible_cells(16, Vec2::new(4.0, 4.0), 3.0);
        let initial = lifecycle.plan(&before);
        apply(&mut lifecycle, &initial);

        let after = visible_cells(16, Vec2::new(11.0, 11.0), 3.0);
        let plan = lifecycle.plan(&after);
        apply(&mut lifecycle, &plan);

        for cell in before.difference(&after) {
            assert!(!lifecycle.contains(*cell), "{} should have been evicted", cell);
        }
        for cell in &after {
            assert!(lifecycle.contains(*cell), "{} should be loaded", cell);
        }
        assert_eq!(lifecycle.len(), after.len());
    }

    #[test]
    fn missing_cell_is_not_planned_again() {
        let mut lifecycle = TileLifecycle::new();
        let visible = visible_cells(16, Vec2::new(8.0, 8.0), 9.0);
        let initial = lifecycle.plan(&visible);
        apply(&mut lifecycle, &initial);

        let empty = GridCell::new(8, 8);
        assert!(lifecycle.mark_missing(empty).is_some());
        assert!(!lifecycle.contains(empty));
        assert!(lifecycle.plan(&visible).is_empty());

        // A redraw makes the cell loadable again
        assert!(lifecycle.clear_missing(empty));
        assert_eq!(lifecycle.plan(&visible).load, vec![empty]);
        assert!(!lifecycle.clear_missing(empty));
    }

    #[test]
    fn loads_are_planned_row_major() {
        let lifecycle = TileLifecycle::new();
        let plan = lifecycle.plan(&visible_cells(4, Vec2::new(1.5, 1.5), 10.0));
        let mut sorted = plan.load.clone();
        sorted.sort();
        assert_eq!(plan.load, sorted);
        assert_eq!(plan.load.first(), Some(&GridCell::new(0, 0)));
    }

    #[test]
    fn stacking_follows_insertion_and_survives_removal() {
        let mut lifecycle = TileLifecycle::new();
        let a = GridCell::new(1, 1);
        let b = GridCell::new(1, 2);
        let c = GridCell::new(2, 1);
        lifecycle.insert(a, LoadedTile::new(Entity::from_raw(1)));
        lifecycle.insert(b, LoadedTile::new(Entity::from_raw(2)));
        lifecycle.insert(c, LoadedTile::new(Entity::from_raw(3)));

        lifecycle.remove(b);
        let order: Vec<_> = lifecycle.cells().collect();
        assert_eq!(order, vec![a, c]);

        // Re-inserting puts the cell back on top
        lifecycle.insert(b, LoadedTile::new(Entity::from_raw(4)));
        let order: Vec<_> = lifecycle.iter_stacked().map(|(cell, _)| cell).collect();
        assert_eq!(order, vec![a, c, b]);
    }

    #[test]
    fn grid_anchor_ignores_panning() {
        let mut config = ViewerConfig::default();
        config.visibility_anchor = VisibilityAnchor::GridCenter;
        let mut viewport = ViewportState::from_config(&config);
        viewport.offset = Vec2::new(900.0, -300.0);

        assert_eq!(visibility_center(&config, &viewport), Vec2::new(8.0, 8.0));
    }

    #[test]
    fn viewport_anchor_follows_look_at_point() {
        let config = ViewerConfig::default();
        let projection = config.projection();
        let mut viewport = ViewportState::from_config(&config);
        assert!((visibility_center(&config, &viewport) - Vec2::new(8.0, 8.0)).length() < 1e-4);

        let target = GridCell::new(3, 12);
        viewport.pan_to(projection.tile_center(target));
        let center = visibility_center(&config, &viewport);
        assert!((center - target.as_vec2()).length() < 1e-3);
    }
}
