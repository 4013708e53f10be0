use crate::route::Route;
use camwatch_codecs::{
    client::{self, LocationError},
    position::LocationEvent,
    server,
};
use futures::{Sink, SinkExt, StreamExt};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};
use tokio::{io::AsyncWriteExt, net::TcpStream, task::JoinHandle};
use tokio_util::codec::{FramedRead, FramedWrite};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Wait(Duration),
    Locate(LocationEvent),
    LoseLocation(LocationError),
    ToggleFollow,
    Disconnect,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub actions: Vec<Action>,
}

impl Trip {
    pub fn new(route: &Route, rng: &mut impl Rng) -> Self {
        let mut actions = Vec::new();
        let mut position = route.start;
        let step = route.speed * route.interval.as_secs_f64();

        log::info!("Driving {} samples from {:?}", route.samples, route.start);
        for sample in 1..=route.samples {
            if rng.gen::<f64>() < route.location_loss {
                actions.push(Action::LoseLocation(LocationError {
                    code: LocationError::POSITION_UNAVAILABLE,
                    message: "Fix lost".to_string(),
                }));
            } else {
                let speed = if rng.gen::<f64>() < route.speed_dropout {
                    None
                } else {
                    let jitter = rng.gen_range(-route.speed_jitter..=route.speed_jitter);
                    Some((route.speed + jitter).max(0.0))
                };
                let event = if rng.gen::<f64>() < route.nested_likelihood {
                    LocationEvent::nested(position, speed)
                } else {
                    LocationEvent::flat(position, speed)
                };
                actions.push(Action::Locate(event));
            }
            if route
                .toggle_follow_every
                .is_some_and(|every| sample % every == 0)
            {
                actions.push(Action::ToggleFollow);
            }
            actions.push(Action::Wait(route.interval));
            position = position.offset(route.heading, step);
        }
        actions.push(Action::Disconnect);

        Self { actions }
    }

    /// Sends the trip's messages, honouring waits, until the trip ends or disconnects.
    pub async fn play<W>(&self, writer: &mut W) -> anyhow::Result<()>
    where
        W: Sink<client::Message, Error = anyhow::Error> + Unpin,
    {
        for action in &self.actions {
            match action {
                Action::Wait(duration) => tokio::time::sleep(*duration).await,
                Action::Locate(event) => writer.send(client::Message::Location(*event)).await?,
                Action::LoseLocation(error) => {
                    writer
                        .send(client::Message::LocationError(error.clone()))
                        .await?
                }
                Action::ToggleFollow => writer.send(client::Message::ToggleFollow).await?,
                Action::Disconnect => break,
            }
        }
        Ok(())
    }

    pub async fn run(&self, addr: SocketAddr) -> anyhow::Result<()> {
        log::info!("Connecting to {addr:?}");
        let stream = TcpStream::connect(addr).await?;
        let (reader, writer) = stream.into_split();
        let reader = FramedRead::new(reader, server::decoder::MessageDecoder::default());
        let mut writer = FramedWrite::new(writer, client::encoder::MessageEncoder::default());

        let monitor: JoinHandle<()> = tokio::spawn(reader.for_each(|msg| async move {
            match msg {
                Ok(msg) => log::info!("{msg:?}"),
                Err(e) => log::error!("{e:?}"),
            }
        }));

        self.play(&mut writer).await?;

        let mut writer = writer.into_inner();
        writer.shutdown().await?;
        monitor.await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use camwatch_codecs::position::{LatLng, PositionSample};
    use futures::channel::mpsc;
    use rand::{rngs::StdRng, SeedableRng};

    fn route() -> Route {
        Route {
            start: LatLng::new(53.545, -1.480),
            heading: 0.0,
            speed: 15.0,
            speed_jitter: 0.0,
            samples: 6,
            interval: Duration::from_secs(2),
            speed_dropout: 0.0,
            nested_likelihood: 0.0,
            location_loss: 0.0,
            toggle_follow_every: Some(3),
        }
    }

    fn samples(trip: &Trip) -> Vec<PositionSample> {
        trip.actions
            .iter()
            .filter_map(|a| match a {
                Action::Locate(event) => PositionSample::try_from(*event).ok(),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn steady_drive_north() {
        let trip = Trip::new(&route(), &mut StdRng::seed_from_u64(1));
        let samples = samples(&trip);
        assert_eq!(6, samples.len());
        for pair in samples.windows(2) {
            let d = pair[0].position.distance_to(&pair[1].position);
            assert!((d - 30.0).abs() < 1e-6, "{d}");
            assert!(pair[1].position.lat > pair[0].position.lat);
        }
        assert!(samples.iter().all(|s| s.speed == Some(15.0)));
        let toggles = trip
            .actions
            .iter()
            .filter(|a| matches!(a, Action::ToggleFollow))
            .count();
        assert_eq!(2, toggles);
        assert_eq!(Some(&Action::Disconnect), trip.actions.last());
    }

    #[test]
    fn dropouts_and_shapes() {
        let route = Route {
            speed_dropout: 1.0,
            nested_likelihood: 1.0,
            ..route()
        };
        let trip = Trip::new(&route, &mut StdRng::seed_from_u64(7));
        for action in &trip.actions {
            if let Action::Locate(event) = action {
                assert!(event.latlng.is_none());
                assert!(event.coords.unwrap().speed.is_none());
            }
        }
    }

    #[test]
    fn lost_fixes_replace_samples() {
        let route = Route {
            location_loss: 1.0,
            ..route()
        };
        let trip = Trip::new(&route, &mut StdRng::seed_from_u64(3));
        assert!(samples(&trip).is_empty());
        let lost = trip
            .actions
            .iter()
            .filter(|a| matches!(a, Action::LoseLocation(_)))
            .count();
        assert_eq!(6, lost);
    }

    #[test]
    fn survives_ron() {
        let trip = Trip::new(&route(), &mut StdRng::seed_from_u64(1));
        let text = ron::to_string(&trip).unwrap();
        assert_eq!(trip, ron::from_str::<Trip>(&text).unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn plays_until_disconnect() {
        let trip = Trip {
            actions: vec![
                Action::ToggleFollow,
                Action::Wait(Duration::from_secs(60)),
                Action::Disconnect,
                Action::ToggleFollow,
            ],
        };
        let (tx, rx) = mpsc::unbounded();
        let mut writer = tx.sink_map_err(anyhow::Error::from);
        let start = tokio::time::Instant::now();
        trip.play(&mut writer).await.unwrap();
        drop(writer);

        assert!(start.elapsed() >= Duration::from_secs(60));
        let sent: Vec<_> = rx.collect().await;
        assert_eq!(vec![client::Message::ToggleFollow], sent);
    }
}
