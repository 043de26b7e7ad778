use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateDataset {
    pub global: ClimateTotals,
    pub regions: Vec<ClimateRegion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateTotals {
    /// °C relative to the 1951-1980 baseline.
    pub temperature_anomaly: f64,
    pub co2_ppm: f64,
    pub sea_level_rise_mm: f64,
    pub renewable_adoption_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateRegion {
    pub id: String,
    pub name: String,
    pub temperature_c: f64,
    pub temperature_anomaly: f64,
    pub precipitation_mm: f64,
    pub risk_level: RiskLevel,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Severe,
}

/// Fast-cadence climate signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateIndicators {
    pub air_quality_index: u32,
    pub heat_index_c: f64,
    #[serde(default)]
    pub active_events: Vec<String>,
    #[serde(default)]
    pub alerts: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateDatasetPatch {
    pub global: Option<ClimateTotals>,
    pub regions: Option<Vec<ClimateRegion>>,
}

impl ClimateDataset {
    pub fn apply(&mut self, patch: ClimateDatasetPatch) {
        if let Some(global) = patch.global {
            self.global = global;
        }
        if let Some(regions) = patch.regions {
            self.regions = regions;
        }
    }

    pub fn region(&self, id: &str) -> Option<&ClimateRegion> {
        self.regions.iter().find(|r| r.id == id)
    }
}
