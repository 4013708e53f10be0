use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf};

#[derive(Debug, Parser)]
#[command(author, version)]
pub struct Arguments {
    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Debug, Subcommand)]
pub enum Mode {
    Generate {
        /// Route description - start, heading, speed, sampling, dropouts, ...
        #[arg(short, long, default_value = "route.toml")]
        input: PathBuf,

        /// Generator output
        #[arg(short, long, default_value = "trip.ron")]
        output: PathBuf,
    },
    Replay {
        /// camwatch TCP socket to connect to
        #[arg(short, long, default_value = "127.0.0.1:8000")]
        server: SocketAddr,

        /// Trip file
        #[arg(short, long, default_value = "trip.ron")]
        trip: PathBuf,
    },
}
