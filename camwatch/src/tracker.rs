use crate::{
    follow::FollowMode,
    proximity::{self, AlertGate},
    settings::{LimitSettings, Settings, View},
    speed::{self, SpeedDisplay},
};
use camwatch_codecs::{
    camera::CameraRecord,
    position::{LatLng, PositionSample},
    Limit,
};
use tokio::time::Instant;

/// The outcome of one sample, before any policy or rendering is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment<'a> {
    pub speed: SpeedDisplay,
    /// Limit the speed was compared against
    pub limit: Option<Limit>,
    /// Cameras in range, in dataset order, with their dataset index and distance
    pub in_range: Vec<(usize, &'a CameraRecord, f64)>,
}

impl<'a> Assessment<'a> {
    pub fn cameras(&self) -> impl Iterator<Item = &'a CameraRecord> + '_ {
        self.in_range.iter().map(|(_, camera, _)| *camera)
    }
}

/// Speed against the effective limit and cameras in range for a single sample.
pub fn evaluate<'a>(
    sample: &PositionSample,
    cameras: &'a [CameraRecord],
    limits: &LimitSettings,
    threshold: f64,
) -> Assessment<'a> {
    let in_range: Vec<_> = proximity::in_range(&sample.position, cameras, threshold).collect();
    let limit = effective_limit(limits, &in_range);
    Assessment {
        speed: speed::assess(sample.speed, limit),
        limit,
        in_range,
    }
}

fn effective_limit(limits: &LimitSettings, in_range: &[(usize, &CameraRecord, f64)]) -> Option<Limit> {
    if limits.nearest_camera {
        let nearest = in_range
            .iter()
            .min_by(|(_, _, a), (_, _, b)| a.total_cmp(b))
            .map(|(_, camera, _)| camera.limit);
        if nearest.is_some() {
            return nearest;
        }
    }
    limits.posted
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MarkerUpdate {
    Created(LatLng),
    Moved(LatLng),
}

/// Everything that changes on screen because of one position sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub marker: MarkerUpdate,
    pub view: Option<View>,
    pub speed: SpeedDisplay,
    /// Set when the effective limit differs from the previous sample's
    pub limit: Option<Option<Limit>>,
    pub alerts: Vec<CameraRecord>,
}

/// Session-owned UI state: the position marker, follow mode, limit and alert memory.
#[derive(Debug)]
pub struct Tracker {
    marker: Option<LatLng>,
    follow: FollowMode,
    limits: LimitSettings,
    limit: Option<Limit>,
    gate: AlertGate,
    threshold: f64,
    follow_zoom: u8,
}

impl Tracker {
    pub fn new(settings: &Settings) -> Self {
        Self {
            marker: None,
            follow: FollowMode::default(),
            limits: settings.limit,
            limit: settings.limit.posted,
            gate: AlertGate::new(settings.alert_policy),
            threshold: settings.proximity_threshold,
            follow_zoom: settings.follow_zoom,
        }
    }

    pub fn follow(&self) -> &FollowMode {
        &self.follow
    }

    pub fn toggle_follow(&mut self) -> &FollowMode {
        self.follow.toggle();
        &self.follow
    }

    pub fn limit(&self) -> Option<Limit> {
        self.limit
    }

    pub fn cameras_replaced(&mut self) {
        self.gate.reset();
    }

    pub fn locate(&mut self, sample: &PositionSample, cameras: &[CameraRecord], now: Instant) -> Frame {
        let marker = match self.marker.replace(sample.position) {
            Some(_) => MarkerUpdate::Moved(sample.position),
            None => MarkerUpdate::Created(sample.position),
        };

        let view = self.follow.is_on().then_some(View {
            center: sample.position,
            zoom: self.follow_zoom,
        });

        let assessment = evaluate(sample, cameras, &self.limits, self.threshold);
        let limit_changed = (assessment.limit != self.limit).then_some(assessment.limit);
        self.limit = assessment.limit;

        let alerts = self
            .gate
            .admit(
                cameras.len(),
                assessment.in_range.iter().map(|(index, camera, _)| (*index, *camera)),
                now,
            )
            .into_iter()
            .cloned()
            .collect();

        Frame {
            marker,
            view,
            speed: assessment.speed,
            limit: limit_changed,
            alerts,
        }
    }
}
