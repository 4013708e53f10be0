use camwatch_codecs::server::BannerId;
use std::time::Duration;
use tokio::sync::mpsc;

/// Reports `id` back to its session once the banner has been shown for `dur`.
pub async fn dismiss_after(id: BannerId, dur: Duration, sender: mpsc::Sender<BannerId>) {
    tokio::time::sleep(dur).await;
    tracing::trace!("Dismissing banner {id}");
    if sender.send(id).await.is_err() {
        tracing::debug!("Banner {id} outlived its session");
    }
}
