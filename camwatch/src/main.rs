use anyhow::Context;
use arguments::Arguments;
use camwatch::{
    dataset::{self, Cameras},
    session::Session,
    settings::Settings,
    speed,
};
use camwatch_codecs::{client, server};
use clap::Parser;
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::watch};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing_subscriber::EnvFilter;

mod arguments;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Arguments::parse();
    let settings = Arc::new(load_settings(&args)?);
    tracing::debug!("{settings:?}");

    let (cameras_tx, cameras_rx) = watch::channel(Cameras::default());
    tokio::spawn(dataset::publish(settings.dataset.clone(), cameras_tx));

    match args.listen {
        Some(addr) => serve(addr, settings, cameras_rx).await,
        None => {
            let reader = FramedRead::new(
                tokio::io::stdin(),
                client::decoder::MessageDecoder::default(),
            );
            let writer = FramedWrite::new(
                tokio::io::stdout(),
                server::encoder::MessageEncoder::default(),
            );
            Session::new(settings, cameras_rx).run(reader, writer).await
        }
    }
}

fn load_settings(args: &Arguments) -> anyhow::Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    if let Some(dataset) = &args.dataset {
        settings.dataset = dataset.clone();
    }
    if let Some(limit) = &args.limit {
        let posted = speed::parse_posted_limit(limit)
            .with_context(|| format!("No speed limit in {limit:?}"))?;
        settings.limit.posted = Some(posted);
    }
    Ok(settings)
}

async fn serve(
    addr: SocketAddr,
    settings: Arc<Settings>,
    cameras: watch::Receiver<Cameras>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on {addr}");

    loop {
        let (inbound, peer) = listener.accept().await?;
        tracing::info!("Accepted connection from {peer}");
        let (reader, writer) = inbound.into_split();
        let reader = FramedRead::new(reader, client::decoder::MessageDecoder::default());
        let writer = FramedWrite::new(writer, server::encoder::MessageEncoder::default());
        let session = Session::new(settings.clone(), cameras.clone());
        tokio::spawn(async move {
            if let Err(e) = session.run(reader, writer).await {
                tracing::warn!("Session with {peer} failed: {e:#}");
            }
            tracing::info!("Closed connection from {peer}");
        });
    }
}
