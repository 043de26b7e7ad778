//! Weather payloads crossing the data-service boundary.
//!
//! Everything here is validated before it reaches a store; a payload that
//! fails validation is reported as a decode error instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

/// Geographic location (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Coordinates {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationErrors> {
        let c = Self { latitude, longitude };
        c.validate()?;
        Ok(c)
    }
}

impl Default for Coordinates {
    /// Stockholm
    fn default() -> Self {
        Self {
            latitude: 59.3293,
            longitude: 18.0686,
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WeatherPayload {
    #[validate(nested)]
    pub location: Coordinates,
    pub observed_at: DateTime<Utc>,
    #[validate(nested)]
    pub current: WeatherConditions,
    #[serde(default)]
    #[validate(nested)]
    pub forecast: Vec<WeatherConditions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WeatherConditions {
    pub timestamp: DateTime<Utc>,
    #[validate(range(min = -100.0, max = 70.0))]
    pub temperature_c: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity_percent: f64,
    #[validate(range(min = 0.0, max = 150.0))]
    pub wind_speed_ms: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub cloud_cover_percent: f64,
    #[validate(range(min = 0.0))]
    pub precipitation_mm: f64,
    #[validate(range(min = 0.0, max = 1500.0))]
    pub solar_irradiance_wm2: f64,
}

impl WeatherPayload {
    /// Decode and validate a raw JSON payload.
    pub fn from_json(raw: &str) -> Result<Self, crate::error::FetchError> {
        let payload: WeatherPayload = serde_json::from_str(raw)?;
        payload.validate()?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions(humidity: f64) -> serde_json::Value {
        serde_json::json!({
            "timestamp": "2024-06-01T12:00:00Z",
            "temperatureC": 18.5,
            "humidityPercent": humidity,
            "windSpeedMs": 4.2,
            "cloudCoverPercent": 30.0,
            "precipitationMm": 0.0,
            "solarIrradianceWm2": 640.0
        })
    }

    fn payload(humidity: f64) -> String {
        serde_json::json!({
            "location": { "latitude": 59.33, "longitude": 18.07 },
            "observedAt": "2024-06-01T12:00:00Z",
            "current": conditions(humidity),
            "forecast": [conditions(55.0)]
        })
        .to_string()
    }

    #[test]
    fn test_valid_payload_decodes() {
        let p = WeatherPayload::from_json(&payload(60.0)).unwrap();
        assert_eq!(p.forecast.len(), 1);
        assert_eq!(p.current.humidity_percent, 60.0);
    }

    #[test]
    fn test_out_of_range_payload_rejected() {
        let err = WeatherPayload::from_json(&payload(140.0)).unwrap_err();
        assert!(matches!(err, crate::error::FetchError::Decode(_)));
    }

    #[test]
    fn test_wrong_shape_rejected() {
        let err = WeatherPayload::from_json(r#"{"temperature": "warm"}"#).unwrap_err();
        assert!(matches!(err, crate::error::FetchError::Decode(_)));
    }

    #[test]
    fn test_coordinates_bounds() {
        assert!(Coordinates::new(45.0, 90.0).is_ok());
        assert!(Coordinates::new(91.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, -181.0).is_err());
    }
}
