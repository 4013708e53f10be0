use crate::position::LatLng;
use serde::{Deserialize, Serialize};

pub mod decoder;
pub mod encoder;

pub type BannerId = u64;

/// Render instructions flowing from a session to whatever draws the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    SetView { center: LatLng, zoom: u8 },
    CameraMarker { position: LatLng, label: String },
    PositionMarker { position: LatLng, created: bool },
    Speed { text: String, over_limit: bool },
    Limit { text: String },
    Banner { id: BannerId, text: String },
    BannerDismissed { id: BannerId },
    FollowButton(FollowButton),
    LocationUnavailable { reason: String },
    Error { message: String },
}

/// Visual state of the follow-mode toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowButton {
    pub label: String,
    pub color: String,
}
