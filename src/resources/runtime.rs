use bevy::prelude::*;
use tokio::runtime::Runtime;

/// Tokio runtime that drives all network I/O
#[derive(Resource)]
pub struct TokioRuntime(pub Runtime);

impl TokioRuntime {
    pub fn new() -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("isoviewer-net")
            .enable_all()
            .build()?;
        Ok(Self(runtime))
    }

    pub fn handle(&self) -> tokio::runtime::Handle {
        self.0.handle().clone()
    }
}
