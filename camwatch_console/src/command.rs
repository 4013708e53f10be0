use anyhow::Context;
use camwatch_codecs::{
    client::{self, LocationError},
    position::{LatLng, LocationEvent},
};
use itertools::Itertools;

pub const HELP: &str = "\
at LAT LNG [SPEED]      report a position (flat shape), speed in m/s
nested LAT LNG [SPEED]  report a position (nested coords shape)
follow                  toggle follow mode
lost [REASON]           the platform lost the fix
denied                  the user denied location access";

fn number(token: Option<&str>, what: &str) -> anyhow::Result<f64> {
    let token = token.with_context(|| format!("Missing {what}"))?;
    token
        .parse()
        .with_context(|| format!("Invalid {what} {token:?}"))
}

fn position(tokens: &[&str]) -> anyhow::Result<(LatLng, Option<f64>)> {
    anyhow::ensure!(tokens.len() <= 3, "Too many arguments: {tokens:?}");
    let lat = number(tokens.first().copied(), "latitude")?;
    let lng = number(tokens.get(1).copied(), "longitude")?;
    let speed = match tokens.get(2) {
        Some(speed) => Some(number(Some(speed), "speed")?),
        None => None,
    };
    Ok((LatLng::new(lat, lng), speed))
}

/// Parses one REPL line. Blank lines parse to nothing.
pub fn parse(line: &str) -> anyhow::Result<Option<client::Message>> {
    let tokens = line.split_whitespace().collect_vec();
    let Some((command, args)) = tokens.split_first() else {
        return Ok(None);
    };
    let message = match *command {
        "at" => {
            let (position, speed) = position(args)?;
            client::Message::Location(LocationEvent::flat(position, speed))
        }
        "nested" => {
            let (position, speed) = position(args)?;
            client::Message::Location(LocationEvent::nested(position, speed))
        }
        "follow" => client::Message::ToggleFollow,
        "lost" => client::Message::LocationError(LocationError {
            code: LocationError::POSITION_UNAVAILABLE,
            message: args.iter().join(" "),
        }),
        "denied" => client::Message::LocationError(LocationError {
            code: LocationError::PERMISSION_DENIED,
            message: String::new(),
        }),
        other => anyhow::bail!("Unknown command {other:?}\n{HELP}"),
    };
    Ok(Some(message))
}
