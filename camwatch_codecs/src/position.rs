use serde::{Deserialize, Serialize};

/// Mean earth radius, as used for great-circle distances.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Haversine distance in metres.
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lat = lat2 - lat1;
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_METERS * c
    }

    /// Destination after travelling `meters` along the initial `bearing` (degrees from north).
    pub fn offset(&self, bearing: f64, meters: f64) -> LatLng {
        let delta = meters / EARTH_RADIUS_METERS;
        let theta = bearing.to_radians();
        let lat1 = self.lat.to_radians();
        let lng1 = self.lng.to_radians();
        let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
        let lng2 = lng1
            + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());
        LatLng {
            lat: lat2.to_degrees(),
            lng: (lng2.to_degrees() + 540.0) % 360.0 - 180.0,
        }
    }
}

/// Coordinates as delivered nested inside a platform location event.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

/// A location event in either shape the platform produces: flat (`latlng` +
/// `speed`) or nested (`coords`). Both may be present at once.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latlng: Option<LatLng>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coords: Option<Coords>,
}

impl LocationEvent {
    pub fn flat(position: LatLng, speed: Option<f64>) -> Self {
        Self {
            latlng: Some(position),
            speed,
            coords: None,
        }
    }

    pub fn nested(position: LatLng, speed: Option<f64>) -> Self {
        Self {
            latlng: None,
            speed: None,
            coords: Some(Coords {
                latitude: position.lat,
                longitude: position.lng,
                speed,
            }),
        }
    }
}

/// A normalized position fix, speed in metres per second.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PositionSample {
    pub position: LatLng,
    pub speed: Option<f64>,
}

/// A stationary device reports zero, which counts as no speed at all.
fn usable(speed: Option<f64>) -> Option<f64> {
    speed.filter(|s| s.is_finite() && *s > 0.0)
}

impl TryFrom<LocationEvent> for PositionSample {
    type Error = anyhow::Error;

    fn try_from(event: LocationEvent) -> Result<Self, Self::Error> {
        let position = match (event.latlng, event.coords) {
            (Some(latlng), _) => latlng,
            (None, Some(coords)) => LatLng::new(coords.latitude, coords.longitude),
            (None, None) => anyhow::bail!("Location event carries no coordinates"),
        };
        anyhow::ensure!(
            position.lat.is_finite() && position.lng.is_finite(),
            "Location event carries non-finite coordinates {position:?}"
        );
        let speed = usable(event.speed).or_else(|| usable(event.coords.and_then(|c| c.speed)));
        Ok(Self { position, speed })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn distance_between_sheffield_and_barnsley() {
        let sheffield = LatLng::new(53.3811, -1.4701);
        let barnsley = LatLng::new(53.5526, -1.4797);
        let d = sheffield.distance_to(&barnsley);
        assert!((d - 19_090.0).abs() < 100.0, "{d}");
        assert_eq!(d, barnsley.distance_to(&sheffield));
        assert_eq!(0.0, sheffield.distance_to(&sheffield));
    }

    #[test]
    fn offset_travels_requested_distance() {
        let start = LatLng::new(53.55, -1.48);
        for bearing in [0.0, 45.0, 90.0, 200.0] {
            let end = start.offset(bearing, 500.0);
            assert!((start.distance_to(&end) - 500.0).abs() < 1e-6);
        }
        let north = start.offset(0.0, 1000.0);
        assert!(north.lat > start.lat);
        assert!((north.lng - start.lng).abs() < 1e-9);
    }

    #[test]
    fn flat_shape_wins_over_nested() {
        let event = LocationEvent {
            latlng: Some(LatLng::new(1.0, 2.0)),
            speed: Some(4.0),
            coords: Some(Coords {
                latitude: 3.0,
                longitude: 4.0,
                speed: Some(9.0),
            }),
        };
        let sample = PositionSample::try_from(event).unwrap();
        assert_eq!(sample.position, LatLng::new(1.0, 2.0));
        assert_eq!(sample.speed, Some(4.0));
    }

    #[test]
    fn nested_shape_is_normalized() {
        let sample = PositionSample::try_from(LocationEvent::nested(LatLng::new(3.0, 4.0), Some(9.0)))
            .unwrap();
        assert_eq!(sample.position, LatLng::new(3.0, 4.0));
        assert_eq!(sample.speed, Some(9.0));
    }

    #[test]
    fn falls_back_to_nested_speed() {
        let event = LocationEvent {
            latlng: Some(LatLng::new(1.0, 2.0)),
            speed: Some(-1.0),
            coords: Some(Coords {
                latitude: 1.0,
                longitude: 2.0,
                speed: Some(7.5),
            }),
        };
        assert_eq!(PositionSample::try_from(event).unwrap().speed, Some(7.5));
    }

    #[test]
    fn zero_speed_falls_back_to_nested_speed() {
        let event = LocationEvent {
            latlng: Some(LatLng::new(1.0, 2.0)),
            speed: Some(0.0),
            coords: Some(Coords {
                latitude: 1.0,
                longitude: 2.0,
                speed: Some(7.5),
            }),
        };
        assert_eq!(PositionSample::try_from(event).unwrap().speed, Some(7.5));

        let stationary = LocationEvent {
            coords: Some(Coords {
                latitude: 1.0,
                longitude: 2.0,
                speed: Some(0.0),
            }),
            ..event
        };
        assert_eq!(PositionSample::try_from(stationary).unwrap().speed, None);
    }

    #[test]
    fn unusable_speed_is_dropped() {
        for speed in [None, Some(f64::NAN), Some(-1.0), Some(0.0)] {
            let sample =
                PositionSample::try_from(LocationEvent::flat(LatLng::new(1.0, 2.0), speed)).unwrap();
            assert_eq!(sample.speed, None);
        }
    }

    #[test]
    fn event_without_coordinates_is_rejected() {
        let event = LocationEvent {
            speed: Some(3.0),
            ..Default::default()
        };
        assert!(PositionSample::try_from(event).is_err());
    }
}
