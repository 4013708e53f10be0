use clap::Parser;
use std::{net::SocketAddr, time::Duration};

#[derive(Debug, Parser)]
#[command(author, version)]
pub struct Arguments {
    /// Address of the camwatch server
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    pub address: SocketAddr,

    /// Re-send the last position at this interval, like a parked device (off by default)
    #[arg(short, long, default_value_t = Duration::ZERO.into())]
    pub interval: humantime::Duration,
}
