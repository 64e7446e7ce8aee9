use std::time::Duration;
use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use parking_lot::Mutex;

use crate::tile_system::source::TileSource;
use crate::tile_system::types::{GridCell, TerrainInfo, TileError};

/// In-memory `TileSource` whose image answers come from a plain function
pub struct ScriptedSource {
    pub requests: Mutex<Vec<GridCell>>,
    delay: Option<Duration>,
    respond: fn(GridCell) -> Result<Vec<u8>, TileError>,
}

impl ScriptedSource {
    pub fn new(respond: fn(GridCell) -> Result<Vec<u8>, TileError>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            delay: None,
            respond,
        }
    }

    /// Stall every image fetch for `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

/// Two marker bytes per cell, 404 on the diagonal
pub fn bytes_or_404_on_diagonal(cell: GridCell) -> Result<Vec<u8>, TileError> {
    if cell.x == cell.y {
        return Err(TileError::NotFound);
    }
    Ok(vec![cell.x as u8, cell.y as u8])
}

/// A small opaque PNG
pub fn png_bytes() -> Vec<u8> {
    let pixels = RgbaImage::from_pixel(4, 4, Rgba([80, 120, 60, 255]));
    let mut bytes = std::io::Cursor::new(Vec::new());
    pixels
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("png encoding");
    bytes.into_inner()
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self::new(bytes_or_404_on_diagonal)
    }
}

#[async_trait]
impl TileSource for ScriptedSource {
    async fn fetch_image(&self, cell: GridCell) -> Result<Vec<u8>, TileError> {
        self.requests.lock().push(cell);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.respond)(cell)
    }

    async fn fetch_info(&self, _cell: GridCell) -> anyhow::Result<TerrainInfo> {
        Ok(TerrainInfo { exists: false, description: None, terrain_code: None })
    }

    async fn redraw(&self, _cell: GridCell) -> anyhow::Result<()> {
        Ok(())
    }
}

pub fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("test runtime")
}
