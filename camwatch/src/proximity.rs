use camwatch_codecs::{camera::CameraRecord, position::LatLng};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_THRESHOLD_METERS: f64 = 500.0;

/// Cameras strictly closer than `threshold` metres, in dataset order, with their distance.
pub fn in_range<'a>(
    position: &LatLng,
    cameras: &'a [CameraRecord],
    threshold: f64,
) -> impl Iterator<Item = (usize, &'a CameraRecord, f64)> + 'a {
    let position = *position;
    cameras
        .iter()
        .enumerate()
        .map(move |(index, camera)| (index, camera, position.distance_to(&camera.position())))
        .filter(move |(_, _, distance)| *distance < threshold)
}

pub fn alert_text(camera: &CameraRecord) -> String {
    format!("⚠️ Speed camera ahead on {} ({})!", camera.road, camera.kind)
}

/// When a camera that stays within range is announced again.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AlertPolicy {
    /// Every sample inside the radius raises a banner.
    #[default]
    EverySample,
    /// Only the first sample after entering the radius raises a banner.
    OnEntry,
    /// At most one banner per camera per period.
    Cooldown {
        #[serde(with = "humantime_serde")]
        period: Duration,
    },
}

/// Per-camera memory needed to apply an [`AlertPolicy`], keyed by dataset index.
#[derive(Debug, Clone, Default)]
pub struct AlertGate {
    policy: AlertPolicy,
    inside: Vec<bool>,
    last_alert: Vec<Option<Instant>>,
}

impl AlertGate {
    pub fn new(policy: AlertPolicy) -> Self {
        Self {
            policy,
            inside: Vec::new(),
            last_alert: Vec::new(),
        }
    }

    /// Forgets everything, e.g. after the camera list was replaced.
    pub fn reset(&mut self) {
        self.inside.clear();
        self.last_alert.clear();
    }

    /// Filters the in-range cameras of one sample down to those that should alert.
    pub fn admit<'a>(
        &mut self,
        camera_count: usize,
        in_range: impl IntoIterator<Item = (usize, &'a CameraRecord)>,
        now: Instant,
    ) -> Vec<&'a CameraRecord> {
        if self.inside.len() != camera_count {
            self.inside.resize(camera_count, false);
            self.last_alert.resize(camera_count, None);
        }
        let mut inside_now = vec![false; camera_count];
        let mut admitted = Vec::new();
        for (index, camera) in in_range {
            let Some(slot) = inside_now.get_mut(index) else {
                continue;
            };
            *slot = true;
            let admit = match self.policy {
                AlertPolicy::EverySample => true,
                AlertPolicy::OnEntry => !self.inside[index],
                AlertPolicy::Cooldown { period } => self.last_alert[index]
                    .map_or(true, |last| now.duration_since(last) >= period),
            };
            if admit {
                self.last_alert[index] = Some(now);
                admitted.push(camera);
            }
        }
        self.inside = inside_now;
        admitted
    }
}
