use anyhow::Context;
use arguments::{Arguments, Mode};
use clap::Parser;
use route::Route;
use trip::Trip;

mod arguments;
mod route;
mod trip;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Arguments::parse();

    match args.mode {
        Mode::Generate { input, output } => {
            let route = Route::from_file(input)?;
            let trip = Trip::new(&route, &mut rand::thread_rng());
            std::fs::write(
                output,
                ron::to_string(&trip).context("Failed to serialize trip to ron string")?,
            )
            .context("Failed to write trip file")?;
        }
        Mode::Replay { server, trip } => {
            let input = std::fs::read_to_string(trip)?;
            let trip: Trip = ron::from_str(&input)?;
            trip.run(server).await.context("Failed to replay trip")?;
        }
    }

    Ok(())
}
