use bevy::prelude::*;
use std::str::FromStr;
use crate::resources::constants::*;
use crate::utils::coordinate_conversion::IsoProjection;

/// Which point the visible set is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityAnchor {
    /// Fixed grid midpoint, regardless of panning
    GridCenter,
    /// Grid point currently under the centre of the screen
    #[default]
    ViewportCenter,
}

impl FromStr for VisibilityAnchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" | "grid_center" => Ok(Self::GridCenter),
            "viewport" | "viewport_center" => Ok(Self::ViewportCenter),
            other => Err(format!("unknown visibility anchor '{}'", other)),
        }
    }
}

/// Tunables for the viewer, built from the constants and overridable from the environment
#[derive(Resource, Debug, Clone)]
pub struct ViewerConfig {
    pub server_url: String,
    pub grid_size: u32,
    pub tile_width: f32,
    pub tile_height: f32,
    pub visible_radius: f32,
    pub visibility_anchor: VisibilityAnchor,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub initial_zoom: f32,
    pub zoom_step: f32,
    pub mini_map_size: f32,
    pub mini_map_unit_tile_size: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            grid_size: GRID_SIZE,
            tile_width: TILE_WIDTH,
            tile_height: TILE_HEIGHT,
            visible_radius: VISIBLE_RADIUS,
            visibility_anchor: VisibilityAnchor::default(),
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            initial_zoom: DEFAULT_ZOOM,
            zoom_step: ZOOM_STEP,
            mini_map_size: MINI_MAP_SIZE,
            mini_map_unit_tile_size: MINI_MAP_UNIT_TILE_SIZE,
        }
    }
}

impl ViewerConfig {
    /// Defaults with `ISOVIEWER_SERVER_URL` and `ISOVIEWER_VISIBILITY` applied
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("ISOVIEWER_SERVER_URL") {
            config.server_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(anchor) = std::env::var("ISOVIEWER_VISIBILITY") {
            match anchor.parse() {
                Ok(anchor) => config.visibility_anchor = anchor,
                Err(e) => warn!("Ignoring ISOVIEWER_VISIBILITY: {}", e),
            }
        }

        config
    }

    pub fn projection(&self) -> IsoProjection {
        IsoProjection::new(self.tile_width, self.tile_height, self.grid_size)
    }

    /// Distance cut-off for the visible set, in grid units
    pub fn visibility_distance(&self) -> f32 {
        self.visible_radius * VISIBLE_RADIUS_FACTOR
    }
}

/// Runtime debug toggles
#[derive(Resource, Debug, Clone, Default)]
pub struct DebugSettings {
    /// Chatty logging through `debug_log!`
    pub debug_mode: bool,
    /// Draw cell footprints over the map
    pub show_grid: bool,
}

impl DebugSettings {
    pub fn from_features() -> Self {
        Self {
            debug_mode: false,
            show_grid: cfg!(feature = "tile_debug"),
        }
    }
}
