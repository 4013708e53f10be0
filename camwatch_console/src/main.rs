use arguments::Arguments;
use camwatch_codecs::{
    client::{self, encoder::MessageEncoder as Encoder},
    server::decoder::MessageDecoder as Decoder,
};
use clap::Parser;
use futures::{SinkExt, StreamExt};
use rustyline::error::ReadlineError;
use std::time::Duration;
use tokio::{net::TcpStream, sync::mpsc, time::Interval};
use tokio_util::codec::{FramedRead, FramedWrite};

mod arguments;
mod command;

async fn tick(resend: &mut Option<Interval>) {
    match resend {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Arguments::parse();

    let client = TcpStream::connect(args.address).await?;
    let (reader, writer) = client.into_split();

    let mut reader = FramedRead::new(reader, Decoder::default());
    let mut writer = FramedWrite::new(writer, Encoder::default());

    tokio::spawn(async move {
        loop {
            match reader.next().await {
                Some(Ok(next)) => println!("{next:?}"),
                Some(Err(e)) => println!("{e:?}"),
                None => {
                    println!("Server closed the connection");
                    break;
                }
            }
        }
    });

    let (tx, mut rx) = mpsc::channel::<client::Message>(16);
    let interval: Duration = args.interval.into();
    let sender = tokio::spawn(async move {
        let mut last_location = None;
        let mut resend = (!interval.is_zero()).then(|| tokio::time::interval(interval));
        loop {
            let msg = tokio::select! {
                msg = rx.recv() => match msg {
                    Some(msg) => msg,
                    None => break,
                },
                () = tick(&mut resend) => {
                    match last_location.clone() {
                        Some(msg) => msg,
                        None => continue,
                    }
                }
            };
            if let client::Message::Location(_) = msg {
                last_location = Some(msg.clone());
            }
            writer.send(msg).await?;
        }
        anyhow::Ok(())
    });

    println!("{}", command::HELP);
    let mut rl = rustyline::DefaultEditor::new()?;
    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                rl.add_history_entry(line.as_str());
                match command::parse(&line) {
                    Ok(Some(message)) => tx.send(message).await?,
                    Ok(None) => {}
                    Err(e) => println!("{e}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL+C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL+D");
                break;
            }
            Err(e) => {
                anyhow::bail!("{e:?}");
            }
        }
    }
    drop(tx);
    sender.await??;
    Ok(())
}
