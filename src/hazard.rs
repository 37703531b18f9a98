use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::preview::Preview;
use crate::resolver::Coordinate;

/// One hazard on the map. Location, description and preview are fixed at
/// creation; only `reports` and `verified` change as corroboration arrives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub description: String,
    pub reports: u32,
    pub verified: bool,
    #[serde(rename = "imagePreview")]
    pub image_preview: Preview,
}

impl Hazard {
    pub fn new(position: Coordinate, description: &str, preview: Preview) -> Hazard {
        Hazard {
            id: Uuid::new_v4().to_string(),
            lat: position.lat,
            lng: position.lng,
            description: description.to_string(),
            reports: 1,
            verified: false,
            image_preview: preview,
        }
    }

    pub fn position(&self) -> Coordinate {
        Coordinate {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_hazard_starts_unverified_with_one_report() {
        let hazard = Hazard::new(
            Coordinate { lat: 37.0, lng: -122.0 },
            "pothole",
            Preview::render(b"img"),
        );
        assert_eq!(hazard.reports, 1);
        assert!(!hazard.verified);
        assert_eq!(hazard.position(), Coordinate { lat: 37.0, lng: -122.0 });
    }

    #[test]
    fn serializes_preview_under_client_field_name() {
        let hazard = Hazard::new(
            Coordinate { lat: 1.0, lng: 2.0 },
            "",
            Preview::render(b"img"),
        );
        let json = serde_json::to_value(&hazard).unwrap();
        assert!(json.get("imagePreview").is_some());
        assert_eq!(json["reports"], 1);
        assert_eq!(json["verified"], false);
    }
}
