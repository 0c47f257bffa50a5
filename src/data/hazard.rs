use crate::core::geo::Point;
use crate::spatial::clustering::Located;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of road hazard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardType {
    Pothole,
    Debris,
    #[serde(rename = "Stalled Vehicle")]
    StalledVehicle,
    #[serde(rename = "Speed Breaker")]
    SpeedBreaker,
    Flooding,
}

impl HazardType {
    pub const ALL: [HazardType; 5] = [
        HazardType::Pothole,
        HazardType::Debris,
        HazardType::StalledVehicle,
        HazardType::SpeedBreaker,
        HazardType::Flooding,
    ];

    pub fn label(self) -> &'static str {
        match self {
            HazardType::Pothole => "Pothole",
            HazardType::Debris => "Debris",
            HazardType::StalledVehicle => "Stalled Vehicle",
            HazardType::SpeedBreaker => "Speed Breaker",
            HazardType::Flooding => "Flooding",
        }
    }

    /// Placeholder photo used for generated hazards of this kind
    pub fn sample_image_url(self) -> String {
        let seed = match self {
            HazardType::Pothole => "pothole",
            HazardType::Debris => "debris",
            HazardType::StalledVehicle => "stalled",
            HazardType::SpeedBreaker => "speedbreaker",
            HazardType::Flooding => "flooding",
        };
        format!("https://picsum.photos/seed/{}/300/200", seed)
    }
}

impl fmt::Display for HazardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Severity, ordered `Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        };
        f.write_str(label)
    }
}

/// A reported road hazard.
///
/// `location` is in map units; on the wire it is `{ "lat": y, "lng": x }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hazard {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: HazardType,
    pub severity: Severity,
    #[serde(with = "lat_lng")]
    pub location: Point,
    pub timestamp: DateTime<Utc>,
    /// Detection confidence in percent
    pub confidence: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Hazard {
    pub fn new(
        id: impl Into<String>,
        kind: HazardType,
        severity: Severity,
        location: Point,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            severity,
            location,
            timestamp,
            confidence: 100,
            image_url: None,
        }
    }

    pub fn with_confidence(mut self, confidence: u8) -> Self {
        self.confidence = confidence.min(100);
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

impl Located for Hazard {
    fn id(&self) -> &str {
        &self.id
    }

    fn position(&self) -> Point {
        self.location
    }
}

mod lat_lng {
    use crate::core::geo::Point;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct LatLng {
        lat: f64,
        lng: f64,
    }

    pub fn serialize<S: Serializer>(point: &Point, serializer: S) -> Result<S::Ok, S::Error> {
        LatLng {
            lat: point.y,
            lng: point.x,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Point, D::Error> {
        let LatLng { lat, lng } = LatLng::deserialize(deserializer)?;
        Ok(Point::new(lng, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pothole() -> Hazard {
        Hazard::new(
            "haz-1",
            HazardType::Pothole,
            Severity::High,
            Point::new(12.5, 40.0),
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap(),
        )
        .with_confidence(87)
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(HazardType::StalledVehicle.to_string(), "Stalled Vehicle");
        assert_eq!(HazardType::SpeedBreaker.to_string(), "Speed Breaker");
        assert_eq!(Severity::Medium.to_string(), "Medium");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert_eq!(Severity::ALL.iter().max(), Some(&Severity::High));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(pothole()).unwrap();
        assert_eq!(json["type"], "Pothole");
        assert_eq!(json["severity"], "High");
        assert_eq!(json["location"]["lat"], 40.0);
        assert_eq!(json["location"]["lng"], 12.5);
        assert_eq!(json["confidence"], 87);
        assert!(json.get("imageUrl").is_none());
    }

    #[test]
    fn test_parse_from_json() {
        let json = r#"{
            "id": "haz-7",
            "type": "Speed Breaker",
            "severity": "Low",
            "location": { "lat": 20.0, "lng": 70.0 },
            "timestamp": "2024-03-01T08:30:00Z",
            "confidence": 91,
            "imageUrl": "https://picsum.photos/seed/speedbreaker/300/200"
        }"#;
        let hazard: Hazard = serde_json::from_str(json).unwrap();
        assert_eq!(hazard.kind, HazardType::SpeedBreaker);
        assert_eq!(hazard.position(), Point::new(70.0, 20.0));
        assert_eq!(hazard.image_url.as_deref(), Some(HazardType::SpeedBreaker.sample_image_url().as_str()));
    }

    #[test]
    fn test_confidence_capped() {
        assert_eq!(pothole().with_confidence(250).confidence, 100);
    }
}
