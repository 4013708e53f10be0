use crate::{proximity::AlertPolicy, speed::parse_posted_limit};
use anyhow::Context;
use camwatch_codecs::{position::LatLng, Limit};
use serde::{Deserialize, Deserializer};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Camera dataset, a JSON array of camera records
    pub dataset: PathBuf,
    /// Radius in metres inside which a camera raises a banner
    pub proximity_threshold: f64,
    #[serde(with = "humantime_serde")]
    pub banner_duration: Duration,
    pub follow_zoom: u8,
    /// Render the follow toggle; without it the map always follows
    pub follow_button: bool,
    pub alert_policy: AlertPolicy,
    pub initial_view: View,
    pub limit: LimitSettings,
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct View {
    pub center: LatLng,
    pub zoom: u8,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitSettings {
    /// Posted limit, as a number or as readout text like `"30 mph"`
    #[serde(deserialize_with = "posted_limit")]
    pub posted: Option<Limit>,
    /// Prefer the limit of the nearest camera in range over the posted one
    pub nearest_camera: bool,
}

pub const DEFAULT_POSTED_LIMIT: Limit = 30;

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            posted: Some(DEFAULT_POSTED_LIMIT),
            nearest_camera: false,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("data/cameras.json"),
            proximity_threshold: crate::proximity::DEFAULT_THRESHOLD_METERS,
            banner_duration: Duration::from_secs(5),
            follow_zoom: 16,
            follow_button: true,
            alert_policy: AlertPolicy::default(),
            initial_view: View {
                center: LatLng::new(53.553, -1.482),
                zoom: 12,
            },
            limit: LimitSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let settings = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: Self = toml::from_str(&settings).context("Failed to parse settings toml file")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.proximity_threshold.is_finite() && self.proximity_threshold > 0.0,
            "Proximity threshold must be a positive distance, got {}",
            self.proximity_threshold
        );
        anyhow::ensure!(
            !self.banner_duration.is_zero(),
            "Banner duration must not be zero"
        );
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PostedLimit {
    Number(Limit),
    Text(String),
}

fn posted_limit<'de, D>(deserializer: D) -> Result<Option<Limit>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<PostedLimit>::deserialize(deserializer)? {
        Some(PostedLimit::Number(limit)) => Some(limit),
        Some(PostedLimit::Text(text)) => {
            let limit = parse_posted_limit(&text);
            if limit.is_none() {
                tracing::warn!("No speed limit in {text:?}, over-limit checks are off");
            }
            limit
        }
        None => None,
    })
}
