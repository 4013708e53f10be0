use anyhow::Context;
use camwatch_codecs::camera::CameraRecord;
use std::{path::Path, sync::Arc};
use tokio::sync::watch;

/// The loaded camera list, shared read-only by every session.
pub type Cameras = Arc<Vec<CameraRecord>>;

pub fn parse(json: &str) -> anyhow::Result<Vec<CameraRecord>> {
    serde_json::from_str(json).context("Camera dataset is not a JSON array of camera records")
}

pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Vec<CameraRecord>> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read camera dataset {}", path.display()))?;
    parse(&json)
}

/// Loads the dataset once and publishes it. On failure the published list stays empty.
pub async fn publish(path: impl AsRef<Path>, cameras: watch::Sender<Cameras>) {
    let path = path.as_ref();
    match load(path).await {
        Ok(records) => {
            tracing::info!("Loaded {} cameras from {}", records.len(), path.display());
            if cameras.send(Arc::new(records)).is_err() {
                tracing::debug!("No session is waiting for cameras");
            }
        }
        Err(e) => tracing::error!("Error loading cameras: {e:#}"),
    }
}
