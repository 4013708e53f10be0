use crate::{position::LatLng, Limit};
use serde::{Deserialize, Serialize};

/// A fixed speed-enforcement site as listed in a camera dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraRecord {
    pub lat: f64,
    pub lng: f64,
    pub road: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub limit: Limit,
}

impl CameraRecord {
    pub fn position(&self) -> LatLng {
        LatLng {
            lat: self.lat,
            lng: self.lng,
        }
    }

    pub fn label(&self) -> String {
        format!(
            "Camera: {} | Road: {} | Limit: {} mph",
            self.kind, self.road, self.limit
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reads_dataset_entry() {
        let json = r#"{"lat": 53.55, "lng": -1.48, "road": "High St", "type": "fixed", "limit": 30}"#;
        let camera: CameraRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            camera,
            CameraRecord {
                lat: 53.55,
                lng: -1.48,
                road: "High St".to_string(),
                kind: "fixed".to_string(),
                limit: 30,
            }
        );
        assert_eq!(camera.label(), "Camera: fixed | Road: High St | Limit: 30 mph");
    }

    #[test]
    fn rejects_entry_without_limit() {
        let json = r#"{"lat": 53.55, "lng": -1.48, "road": "High St", "type": "fixed"}"#;
        assert!(serde_json::from_str::<CameraRecord>(json).is_err());
    }
}
