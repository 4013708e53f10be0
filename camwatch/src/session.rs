use crate::{
    banner,
    dataset::Cameras,
    proximity,
    settings::Settings,
    speed::{self, SpeedDisplay},
    tracker::{Frame, MarkerUpdate, Tracker},
};
use camwatch_codecs::{
    client::{self, LocationError},
    position::{LocationEvent, PositionSample},
    server::{self, BannerId},
};
use futures::{Sink, SinkExt, Stream, StreamExt};
use std::sync::Arc;
use tokio::{
    sync::{mpsc, watch},
    time::Instant,
};

/// One user's view: consumes platform events, emits render messages.
#[derive(Debug)]
pub struct Session {
    settings: Arc<Settings>,
    cameras: watch::Receiver<Cameras>,
    tracker: Tracker,
    next_banner: BannerId,
}

impl Session {
    pub fn new(settings: Arc<Settings>, cameras: watch::Receiver<Cameras>) -> Self {
        let tracker = Tracker::new(&settings);
        Self {
            settings,
            cameras,
            tracker,
            next_banner: 0,
        }
    }

    pub async fn run<R, W>(mut self, mut reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: Stream<Item = Result<client::Message, anyhow::Error>> + Unpin,
        W: Sink<server::Message, Error = anyhow::Error> + Unpin,
    {
        let (dismiss_tx, mut dismiss_rx) = mpsc::channel(64);

        for msg in self.greeting() {
            writer.send(msg).await?;
        }
        let cameras = self.cameras.borrow_and_update().clone();
        self.render_cameras(&cameras, &mut writer).await?;

        loop {
            tokio::select! {
                msg = reader.next() => match msg {
                    Some(Ok(msg)) => {
                        tracing::debug!("Received {msg:?}");
                        self.handle_client_message(msg, &mut writer, &dismiss_tx).await?;
                    }
                    Some(Err(e)) => {
                        tracing::warn!("Failed to read platform event: {e:#}");
                        break;
                    }
                    None => break,
                },
                Some(id) = dismiss_rx.recv() => {
                    writer.send(server::Message::BannerDismissed { id }).await?;
                }
                Ok(()) = self.cameras.changed() => {
                    let cameras = self.cameras.borrow_and_update().clone();
                    tracing::info!("Camera list replaced, {} cameras", cameras.len());
                    self.tracker.cameras_replaced();
                    self.render_cameras(&cameras, &mut writer).await?;
                }
            }
        }
        tracing::info!("Platform event stream ended");
        Ok(())
    }

    fn greeting(&self) -> Vec<server::Message> {
        let mut messages = vec![
            server::Message::SetView {
                center: self.settings.initial_view.center,
                zoom: self.settings.initial_view.zoom,
            },
            server::Message::Limit {
                text: speed::limit_text(self.tracker.limit()),
            },
        ];
        if self.settings.follow_button {
            messages.push(server::Message::FollowButton(self.tracker.follow().button()));
        }
        messages
    }

    async fn render_cameras<W>(&self, cameras: &Cameras, writer: &mut W) -> anyhow::Result<()>
    where
        W: Sink<server::Message, Error = anyhow::Error> + Unpin,
    {
        for camera in cameras.iter() {
            writer
                .send(server::Message::CameraMarker {
                    position: camera.position(),
                    label: camera.label(),
                })
                .await?;
        }
        Ok(())
    }

    async fn handle_client_message<W>(
        &mut self,
        msg: client::Message,
        writer: &mut W,
        dismiss_tx: &mpsc::Sender<BannerId>,
    ) -> anyhow::Result<()>
    where
        W: Sink<server::Message, Error = anyhow::Error> + Unpin,
    {
        match msg {
            client::Message::Location(event) => self.locate(event, writer, dismiss_tx).await,
            client::Message::LocationError(error) => self.location_lost(&error, writer).await,
            client::Message::ToggleFollow => {
                if self.settings.follow_button {
                    let button = self.tracker.toggle_follow().button();
                    tracing::info!("{}", button.label);
                    writer.send(server::Message::FollowButton(button)).await
                } else {
                    tracing::warn!("Ignoring follow toggle, the follow button is disabled");
                    writer
                        .send(server::Message::Error {
                            message: "Follow mode cannot be toggled".to_string(),
                        })
                        .await
                }
            }
        }
    }

    async fn locate<W>(
        &mut self,
        event: LocationEvent,
        writer: &mut W,
        dismiss_tx: &mpsc::Sender<BannerId>,
    ) -> anyhow::Result<()>
    where
        W: Sink<server::Message, Error = anyhow::Error> + Unpin,
    {
        let sample = match PositionSample::try_from(event) {
            Ok(sample) => sample,
            Err(e) => {
                tracing::warn!("Ignoring location event: {e:#}");
                return Ok(());
            }
        };
        let cameras = self.cameras.borrow().clone();
        let frame = self.tracker.locate(&sample, &cameras, Instant::now());
        self.render(frame, writer, dismiss_tx).await
    }

    async fn render<W>(
        &mut self,
        Frame {
            marker,
            view,
            speed: reading,
            limit,
            alerts,
        }: Frame,
        writer: &mut W,
        dismiss_tx: &mpsc::Sender<BannerId>,
    ) -> anyhow::Result<()>
    where
        W: Sink<server::Message, Error = anyhow::Error> + Unpin,
    {
        let marker = match marker {
            MarkerUpdate::Created(position) => server::Message::PositionMarker {
                position,
                created: true,
            },
            MarkerUpdate::Moved(position) => server::Message::PositionMarker {
                position,
                created: false,
            },
        };
        writer.send(marker).await?;

        if let Some(view) = view {
            writer
                .send(server::Message::SetView {
                    center: view.center,
                    zoom: view.zoom,
                })
                .await?;
        }

        if let Some(limit) = limit {
            writer
                .send(server::Message::Limit {
                    text: speed::limit_text(limit),
                })
                .await?;
        }

        writer
            .send(server::Message::Speed {
                text: reading.text(),
                over_limit: reading.over_limit,
            })
            .await?;

        for camera in alerts {
            let id = self.next_banner;
            self.next_banner += 1;
            let text = proximity::alert_text(&camera);
            tracing::info!("Banner {id}: {text}");
            writer.send(server::Message::Banner { id, text }).await?;
            tokio::spawn(banner::dismiss_after(
                id,
                self.settings.banner_duration,
                dismiss_tx.clone(),
            ));
        }
        Ok(())
    }

    async fn location_lost<W>(&mut self, error: &LocationError, writer: &mut W) -> anyhow::Result<()>
    where
        W: Sink<server::Message, Error = anyhow::Error> + Unpin,
    {
        let reason = error.reason();
        tracing::warn!("Location unavailable: {reason}");
        writer
            .send(server::Message::LocationUnavailable { reason })
            .await?;
        writer
            .send(server::Message::Speed {
                text: SpeedDisplay::UNAVAILABLE.text(),
                over_limit: false,
            })
            .await
    }
}
