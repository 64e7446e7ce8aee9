use bevy::prelude::*;
use tokio::task::JoinHandle;
use crate::tile_system::types::{GridCell, TerrainInfo};

/// The single selected cell, if any. Looked up by key, so it survives the
/// tile being evicted and reloaded.
#[derive(Resource, Debug, Default)]
pub struct SelectedTile(pub Option<GridCell>);

impl SelectedTile {
    /// Select `cell`, returning the previously selected one
    pub fn select(&mut self, cell: GridCell) -> Option<GridCell> {
        self.0.replace(cell)
    }

    pub fn get(&self) -> Option<GridCell> {
        self.0
    }
}

/// What the info panel is showing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TerrainPanel {
    #[default]
    Empty,
    Loading(GridCell),
    Ready(GridCell, TerrainInfo),
    Failed(GridCell, String),
}

impl TerrainPanel {
    pub fn text(&self) -> String {
        match self {
            TerrainPanel::Empty => "Click a tile to inspect it".to_string(),
            TerrainPanel::Loading(cell) => format!("Tile {}\nLoading...", cell),
            TerrainPanel::Ready(cell, info) if !info.exists => {
                format!("Tile {}\nNothing has been generated here yet", cell)
            }
            TerrainPanel::Ready(cell, info) => format!(
                "Tile {} [{}]\n{}",
                cell,
                info.terrain_code.as_deref().unwrap_or("?"),
                info.description.as_deref().unwrap_or("No description"),
            ),
            TerrainPanel::Failed(cell, error) => format!("Tile {}\nError: {}", cell, error),
        }
    }
}

/// In-flight terrain info request and the panel state it feeds
#[derive(Resource, Default)]
pub struct TerrainInfoState {
    pub panel: TerrainPanel,
    pub pending: Option<(GridCell, JoinHandle<anyhow::Result<TerrainInfo>>)>,
}

/// In-flight redraw requests
#[derive(Resource, Default)]
pub struct RedrawRequests {
    pub pending: Vec<(GridCell, JoinHandle<anyhow::Result<()>>)>,
}
