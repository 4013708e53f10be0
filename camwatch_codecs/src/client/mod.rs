use crate::position::LocationEvent;
use serde::{Deserialize, Serialize};

pub mod decoder;
pub mod encoder;

/// Messages flowing from the platform (or the user) into a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    Location(LocationEvent),
    LocationError(LocationError),
    ToggleFollow,
}

/// Why the platform could not produce a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationError {
    pub code: u16,
    #[serde(default)]
    pub message: String,
}

impl LocationError {
    pub const PERMISSION_DENIED: u16 = 1;
    pub const POSITION_UNAVAILABLE: u16 = 2;
    pub const TIMEOUT: u16 = 3;

    pub fn reason(&self) -> String {
        let kind = match self.code {
            Self::PERMISSION_DENIED => "permission denied",
            Self::POSITION_UNAVAILABLE => "position unavailable",
            Self::TIMEOUT => "timed out",
            _ => "unknown error",
        };
        if self.message.is_empty() {
            kind.to_string()
        } else {
            format!("{kind}: {}", self.message)
        }
    }
}
