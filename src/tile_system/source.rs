use async_trait::async_trait;
use bevy::prelude::*;
use parking_lot::RwLock;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::resources::constants::HTTP_TIMEOUT;
use crate::tile_system::types::{GridCell, TerrainInfo, TileError};

/// Backend that produces tile imagery and terrain descriptions
#[async_trait]
pub trait TileSource: Send + Sync + 'static {
    /// Raw image bytes for a cell, or `TileError::NotFound` if nothing exists there yet
    async fn fetch_image(&self, cell: GridCell) -> Result<Vec<u8>, TileError>;

    async fn fetch_info(&self, cell: GridCell) -> anyhow::Result<TerrainInfo>;

    /// Ask the backend to regenerate a cell's imagery
    async fn redraw(&self, cell: GridCell) -> anyhow::Result<()>;
}

/// `TileSource` over the settlement HTTP API
pub struct HttpTileSource {
    client: Client,
    base_url: String,
    /// Cache-busting token per cell, set after a successful redraw
    revisions: RwLock<HashMap<GridCell, u128>>,
}

impl HttpTileSource {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("isoviewer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            revisions: RwLock::new(HashMap::new()),
        })
    }

    fn tile_url(&self, cell: GridCell) -> String {
        format!("{}/tiles/{}/{}", self.base_url, cell.x, cell.y)
    }

    /// Image URL, with `?v=` appended once the cell has been redrawn
    pub fn image_url(&self, cell: GridCell) -> String {
        match self.revisions.read().get(&cell) {
            Some(revision) => format!("{}?v={}", self.tile_url(cell), revision),
            None => self.tile_url(cell),
        }
    }

    pub fn info_url(&self, cell: GridCell) -> String {
        format!("{}/info", self.tile_url(cell))
    }

    pub fn redraw_url(&self, cell: GridCell) -> String {
        format!("{}/redraw", self.tile_url(cell))
    }

    fn bump_revision(&self, cell: GridCell) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let mut revisions = self.revisions.write();
        // Two redraws within the same millisecond still need distinct URLs
        let next = match revisions.get(&cell) {
            Some(&previous) if previous >= now => previous + 1,
            _ => now,
        };
        revisions.insert(cell, next);
    }
}

#[async_trait]
impl TileSource for HttpTileSource {
    async fn fetch_image(&self, cell: GridCell) -> Result<Vec<u8>, TileError> {
        let url = self.image_url(cell);
        debug!("Requesting tile image: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TileError::DownloadFailed(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(TileError::NotFound),
            status if status.is_success() => response
                .bytes()
                .await
                .map(|bytes| bytes.to_vec())
                .map_err(|e| TileError::DownloadFailed(e.to_string())),
            status => Err(TileError::DownloadFailed(format!("HTTP error: {}", status))),
        }
    }

    async fn fetch_info(&self, cell: GridCell) -> anyhow::Result<TerrainInfo> {
        let response = self.client.get(self.info_url(cell)).send().await?;
        if !response.status().is_success() {
            return Err(anyhow::anyhow!("HTTP error: {}", response.status()));
        }
        let info = response.json::<TerrainInfo>().await?;
        Ok(info)
    }

    async fn redraw(&self, cell: GridCell) -> anyhow::Result<()> {
        let response = self.client.post(self.redraw_url(cell)).send().await?;
        if !response.status().is_success() {
            return Err(anyhow::anyhow!("HTTP error: {}", response.status()));
        }
        self.bump_revision(cell);
        info!("Tile {} redrawn", cell);
        Ok(())
    }
}
