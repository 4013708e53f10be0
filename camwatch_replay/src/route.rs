use anyhow::Context;
use camwatch_codecs::position::LatLng;
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Route {
    pub start: LatLng,
    /// Degrees clockwise from north
    pub heading: f64,
    /// Metres per second
    pub speed: f64,
    pub speed_jitter: f64,
    pub samples: u16,
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    /// Likelihood of a sample without speed
    pub speed_dropout: f64,
    /// Likelihood of a sample in the nested `coords` shape
    pub nested_likelihood: f64,
    /// Likelihood of the platform losing the fix instead of reporting a sample
    pub location_loss: f64,
    pub toggle_follow_every: Option<u16>,
}

impl Route {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let route = std::fs::read_to_string(path)?;
        let route: Self = toml::from_str(&route).context("Failed to read route toml file")?;
        route.validate()?;
        Ok(route)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.speed >= 0.0, "Negative speed {}", self.speed);
        anyhow::ensure!(
            self.speed_jitter >= 0.0,
            "Negative speed jitter {}",
            self.speed_jitter
        );
        for (name, likelihood) in [
            ("speed_dropout", self.speed_dropout),
            ("nested_likelihood", self.nested_likelihood),
            ("location_loss", self.location_loss),
        ] {
            anyhow::ensure!(
                (0.0..=1.0).contains(&likelihood),
                "{name} must be within 0..=1, got {likelihood}"
            );
        }
        anyhow::ensure!(self.toggle_follow_every != Some(0), "Cannot toggle every 0 samples");
        Ok(())
    }
}
