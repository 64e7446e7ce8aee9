use std::collections::HashMap;
use std::sync::Arc;
use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::tile_system::source::TileSource;
use crate::tile_system::types::{GridCell, TileError};

/// Result of a tile image fetch (successful or not)
#[derive(Debug)]
pub struct TileLoadedEvent {
    /// The cell that was fetched
    pub cell: GridCell,
    /// Image bytes, or the reason there are none
    pub data: Result<Vec<u8>, TileError>,
    generation: u64,
}

struct InFlight {
    generation: u64,
    task: JoinHandle<()>,
}

/// Issues tile image fetches on the Tokio runtime and collects their results.
///
/// Every fetch gets a generation number. Cancelling or re-requesting a cell
/// forgets the old generation, so a late result from an aborted task is
/// discarded when drained instead of being applied to a stale tile.
#[derive(Resource)]
pub struct TileLoader {
    source: Arc<dyn TileSource>,
    runtime: Handle,
    in_flight: HashMap<GridCell, InFlight>,
    next_generation: u64,
    sender: Sender<TileLoadedEvent>,
    receiver: Receiver<TileLoadedEvent>,
}

impl TileLoader {
    pub fn new(source: Arc<dyn TileSource>, runtime: Handle) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            source,
            runtime,
            in_flight: HashMap::new(),
            next_generation: 0,
            sender,
            receiver,
        }
    }

    pub fn source(&self) -> Arc<dyn TileSource> {
        self.source.clone()
    }

    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    /// Start fetching a cell unless a fetch for it is already running
    pub fn request(&mut self, cell: GridCell) {
        if self.in_flight.contains_key(&cell) {
            return;
        }

        let generation = self.next_generation;
        self.next_generation += 1;

        let source = self.source.clone();
        let sender = self.sender.clone();
        let task = self.runtime.spawn(async move {
            let data = source.fetch_image(cell).await;
            // The receiver only goes away with the loader itself
            let _ = sender.send(TileLoadedEvent { cell, data, generation });
        });

        self.in_flight.insert(cell, InFlight { generation, task });
    }

    /// Abort the fetch for a cell, if any
    pub fn cancel(&mut self, cell: GridCell) {
        if let Some(in_flight) = self.in_flight.remove(&cell) {
            in_flight.task.abort();
        }
    }

    /// Fetch a cell again, superseding any running fetch
    pub fn reload(&mut self, cell: GridCell) {
        self.cancel(cell);
        self.request(cell);
    }

    pub fn is_pending(&self, cell: &GridCell) -> bool {
        self.in_flight.contains_key(cell)
    }

    pub fn pending_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Take every finished fetch whose cell is still wanted
    pub fn drain_completed(&mut self) -> Vec<TileLoadedEvent> {
        let mut completed = Vec::new();

        for event in self.receiver.try_iter() {
            match self.in_flight.get(&event.cell) {
                Some(in_flight) if in_flight.generation == event.generation => {
                    self.in_flight.remove(&event.cell);
                    completed.push(event);
                }
                _ => debug!("Dropping stale fetch result for tile {}", event.cell),
            }
        }

        completed
    }

    /// Block until at least one result arrives or `timeout` passes
    #[cfg(test)]
    fn wait_completed(&mut self, timeout: std::time::Duration) -> Vec<TileLoadedEvent> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let completed = self.drain_completed();
            if !completed.is_empty() || std::time::Instant::now() >= deadline {
                return completed;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
    }
}

impl Drop for TileLoader {
    fn drop(&mut self) {
        for (_, in_flight) in self.in_flight.drain() {
            in_flight.task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::tile_system::testing::{runtime, ScriptedSource};

    #[test]
    fn fetch_result_is_delivered_once() {
        let rt = runtime();
        let source = Arc::new(ScriptedSource::default());
        let mut loader = TileLoader::new(source.clone(), rt.handle().clone());

        let cell = GridCell::new(3, 1);
        loader.request(cell);
        let completed = loader.wait_completed(Duration::from_secs(2));

        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].cell, cell);
        assert_eq!(completed[0].data, Ok(vec![3, 1]));
        assert!(!loader.is_pending(&cell));
        assert!(loader.drain_completed().is_empty());
    }

    #[test]
    fn duplicate_requests_fetch_once() {
        let rt = runtime();
        let source = Arc::new(ScriptedSource::default().with_delay(Duration::from_millis(50)));
        let mut loader = TileLoader::new(source.clone(), rt.handle().clone());

        let cell = GridCell::new(0, 5);
        loader.request(cell);
        loader.request(cell);
        assert_eq!(loader.pending_count(), 1);

        let completed = loader.wait_completed(Duration::from_secs(2));
        assert_eq!(completed.len(), 1);
        assert_eq!(source.request_count(), 1);
    }

    #[test]
    fn not_found_is_forwarded() {
        let rt = runtime();
        let mut loader = TileLoader::new(Arc::new(ScriptedSource::default()), rt.handle().clone());

        loader.request(GridCell::new(7, 7));
        let completed = loader.wait_completed(Duration::from_secs(2));

        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].data, Err(TileError::NotFound));
    }

    #[test]
    fn cancelled_fetch_never_surfaces() {
        let rt = runtime();
        let source = Arc::new(ScriptedSource::default().with_delay(Duration::from_millis(30)));
        let mut loader = TileLoader::new(source, rt.handle().clone());

        let cancelled = GridCell::new(1, 0);
        let kept = GridCell::new(2, 0);
        loader.request(cancelled);
        loader.request(kept);
        loader.cancel(cancelled);

        std::thread::sleep(Duration::from_millis(150));
        let completed = loader.drain_completed();

        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].cell, kept);
    }

    #[test]
    fn reload_supersedes_running_fetch() {
        let rt = runtime();
        let source = Arc::new(ScriptedSource::default().with_delay(Duration::from_millis(30)));
        let mut loader = TileLoader::new(source.clone(), rt.handle().clone());

        let cell = GridCell::new(4, 2);
        loader.request(cell);
        loader.reload(cell);

        std::thread::sleep(Duration::from_millis(150));
        let completed = loader.drain_completed();

        assert_eq!(completed.len(), 1);
        assert!(!loader.is_pending(&cell));
    }
}
