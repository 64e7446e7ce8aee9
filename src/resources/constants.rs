use std::time::Duration;

/// Constants for the isometric tile grid
pub const GRID_SIZE: u32 = 16;
pub const TILE_WIDTH: f32 = 128.0;
pub const TILE_HEIGHT: f32 = 128.0;

/// Cells within `VISIBLE_RADIUS * VISIBLE_RADIUS_FACTOR` grid units of the
/// visibility centre get loaded
pub const VISIBLE_RADIUS: f32 = 6.0;
pub const VISIBLE_RADIUS_FACTOR: f32 = 1.5;

pub const MIN_ZOOM: f32 = 0.3; // Furthest zoom out
pub const MAX_ZOOM: f32 = 2.0; // Closest zoom in
pub const DEFAULT_ZOOM: f32 = 1.0;
pub const ZOOM_STEP: f32 = 0.1;
/// Trackpad scroll distance worth one zoom step
pub const WHEEL_PIXELS_PER_STEP: f32 = 100.0;

/// Pointer travel (px, either axis) after which a press becomes a pan
pub const DRAG_THRESHOLD: f32 = 5.0;

/// Quiet period after the last wheel or pinch event before tiles are recomputed
pub const ZOOM_SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Alpha values below this count as transparent when hit-testing
pub const ALPHA_THRESHOLD: u8 = 10;

pub const MINI_MAP_SIZE: f32 = 180.0;
pub const MINI_MAP_UNIT_TILE_SIZE: f32 = 10.0;
pub const MINI_MAP_DOT_SIZE: f32 = 6.0;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(15);
