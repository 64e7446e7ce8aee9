use bevy::prelude::*;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// One addressable terrain slot in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    pub x: u32,
    pub y: u32,
}

impl GridCell {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Identity key in the `x_y` form used by the backend and the UI
    pub fn key(&self) -> String {
        self.to_string()
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// Euclidean distance in grid units to a fractional grid point
    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.as_vec2().distance(point)
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.x, self.y)
    }
}

impl FromStr for GridCell {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once('_')
            .ok_or_else(|| format!("invalid cell key '{}'", s))?;
        let x = x.parse().map_err(|_| format!("invalid x in cell key '{}'", s))?;
        let y = y.parse().map_err(|_| format!("invalid y in cell key '{}'", s))?;
        Ok(Self { x, y })
    }
}

/// Error type for tile image fetches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileError {
    /// The backend has no tile for this cell (404)
    NotFound,
    /// Network or non-404 HTTP failure
    DownloadFailed(String),
    /// The bytes could not be decoded as an image
    Decode(String),
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileError::NotFound => write!(f, "tile not found"),
            TileError::DownloadFailed(reason) => write!(f, "download failed: {}", reason),
            TileError::Decode(reason) => write!(f, "decode failed: {}", reason),
        }
    }
}

impl std::error::Error for TileError {}

/// Terrain description returned by `GET /tiles/{x}/{y}/info`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainInfo {
    pub exists: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub terrain_code: Option<String>,
}

/// Ask the lifecycle to recompute the visible set
#[derive(Debug, Clone, Copy, Default, Event)]
pub struct RecomputeVisible;

/// Emitted after a click resolves to a tile and was not a drag
#[derive(Debug, Clone, Copy, Event)]
pub struct TileClicked {
    pub cell: GridCell,
}

/// A press/release in window coordinates that did not turn into a pan
#[derive(Debug, Clone, Copy, Event)]
pub struct PointerClick {
    pub position: Vec2,
}

/// Ask the backend to regenerate a cell and show the new image
#[derive(Debug, Clone, Copy, Event)]
pub struct RedrawTile {
    pub cell: GridCell,
}

/// Imperative operations the host can request from the viewer
#[derive(Debug, Clone, Copy, PartialEq, Event)]
pub enum ViewportCommand {
    PanTo(GridCell),
    ZoomIn,
    ZoomOut,
    Reset,
    ToggleDebugGrid,
    ToggleMiniMap,
}
