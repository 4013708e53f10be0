use clap::Parser;
use std::{net::SocketAddr, path::PathBuf};

#[derive(Debug, Parser)]
#[command(author, version, about = "Speed camera proximity and speed-limit monitor")]
pub struct Arguments {
    /// Settings file (toml), defaults apply without one
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Camera dataset (JSON array), overrides the settings file
    #[arg(short, long)]
    pub dataset: Option<PathBuf>,

    /// Posted speed limit, e.g. `30` or "30 mph", overrides the settings file
    #[arg(short, long)]
    pub limit: Option<String>,

    /// Serve one session per TCP connection instead of using stdin/stdout
    #[arg(short = 'L', long)]
    pub listen: Option<SocketAddr>,
}
