use camwatch_codecs::Limit;

pub const MPH_PER_METER_PER_SECOND: f64 = 2.23694;

/// What the speed readout shows for one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedDisplay {
    pub mph: Option<u32>,
    pub over_limit: bool,
}

impl SpeedDisplay {
    pub const UNAVAILABLE: Self = Self {
        mph: None,
        over_limit: false,
    };

    pub fn text(&self) -> String {
        match self.mph {
            Some(mph) => format!("Speed: {mph} mph"),
            None => "Speed: unavailable".to_string(),
        }
    }
}

/// Converts a reported speed to whole miles per hour. Zero reads as no speed.
pub fn to_mph(meters_per_second: f64) -> Option<u32> {
    if !meters_per_second.is_finite() || meters_per_second <= 0.0 {
        return None;
    }
    Some((meters_per_second * MPH_PER_METER_PER_SECOND).round() as u32)
}

/// Compares the sample's speed against the current limit.
///
/// Without a limit the comparison is skipped and the flag stays clear.
pub fn assess(meters_per_second: Option<f64>, limit: Option<Limit>) -> SpeedDisplay {
    let Some(mph) = meters_per_second.and_then(to_mph) else {
        return SpeedDisplay::UNAVAILABLE;
    };
    SpeedDisplay {
        mph: Some(mph),
        over_limit: limit.is_some_and(|limit| mph > u32::from(limit)),
    }
}

/// Reads a limit out of display text such as `"30 mph"` by keeping only its digits.
pub fn parse_posted_limit(text: &str) -> Option<Limit> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

pub fn limit_text(limit: Option<Limit>) -> String {
    match limit {
        Some(limit) => format!("Limit: {limit} mph"),
        None => "Limit: unknown".to_string(),
    }
}
