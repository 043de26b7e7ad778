//! Derived grid and climate metrics.
//!
//! Every calculator takes the current dataset as an `Option` and returns a
//! neutral value (0, empty map, empty list) when nothing is loaded. Nothing is
//! cached; callers always compute from the latest snapshot.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::{
    ClimateDataset, EnergyDataset, GridStability, NodeStatus, RiskLevel, SourceKind,
};

const WEIGHT_RELIABILITY: f64 = 0.30;
const WEIGHT_EFFICIENCY: f64 = 0.25;
const WEIGHT_STABILITY: f64 = 0.25;
const WEIGHT_RENEWABLE: f64 = 0.20;

/// Renewable share is scaled up before capping so that a 80% renewable mix scores full marks.
const RENEWABLE_SCALE: f64 = 1.25;

/// Delivered share of generation after distribution losses, in percent.
///
/// `consumption / generation * (100 - losses) / 100 * 100`, clamped to [0, 100].
pub fn system_efficiency(data: Option<&EnergyDataset>) -> f64 {
    let Some(data) = data else { return 0.0 };
    let totals = &data.totals;
    if !(totals.total_generation > 0.0) {
        return 0.0;
    }
    let efficiency = (totals.total_consumption / totals.total_generation)
        * (100.0 - totals.distribution_losses)
        / 100.0
        * 100.0;
    if efficiency.is_finite() {
        efficiency.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

pub fn stability_score(stability: GridStability) -> f64 {
    match stability {
        GridStability::Stable => 100.0,
        GridStability::Moderate => 70.0,
        GridStability::Unstable => 40.0,
        GridStability::Critical => 10.0,
    }
}

/// Weighted 0-100 health score, rounded to the nearest integer.
pub fn grid_health_score(data: Option<&EnergyDataset>) -> u32 {
    let Some(dataset) = data else { return 0 };
    let totals = &dataset.totals;
    let reliability = totals.reliability_index.clamp(0.0, 100.0);
    let efficiency = system_efficiency(data);
    let stability = stability_score(totals.grid_stability);
    let renewable = (totals.renewable_percentage * RENEWABLE_SCALE).clamp(0.0, 100.0);

    let score = reliability * WEIGHT_RELIABILITY
        + efficiency * WEIGHT_EFFICIENCY
        + stability * WEIGHT_STABILITY
        + renewable * WEIGHT_RENEWABLE;
    if score.is_finite() {
        score.round().clamp(0.0, 100.0) as u32
    } else {
        0
    }
}

pub fn node_count_by_status(data: Option<&EnergyDataset>) -> BTreeMap<NodeStatus, usize> {
    let mut counts = BTreeMap::new();
    if let Some(data) = data {
        for node in &data.nodes {
            *counts.entry(node.status).or_insert(0) += 1;
        }
    }
    counts
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceShare {
    pub source_id: String,
    pub kind: SourceKind,
    pub output: f64,
    /// Percent of total output.
    pub share: f64,
}

/// Output share per generation source, largest first.
pub fn source_share(data: Option<&EnergyDataset>) -> Vec<SourceShare> {
    let Some(data) = data else { return Vec::new() };
    let total: f64 = data.sources.iter().map(|s| s.output.max(0.0)).sum();
    if !(total > 0.0) {
        return Vec::new();
    }
    let mut shares: Vec<SourceShare> = data
        .sources
        .iter()
        .map(|s| SourceShare {
            source_id: s.id.clone(),
            kind: s.kind,
            output: s.output.max(0.0),
            share: s.output.max(0.0) / total * 100.0,
        })
        .collect();
    shares.sort_by(|a, b| b.share.total_cmp(&a.share));
    shares
}

/// Everything a dashboard panel needs, computed in one pass over a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyMetrics {
    pub system_efficiency: f64,
    pub grid_health_score: u32,
    pub nodes_by_status: BTreeMap<NodeStatus, usize>,
    pub source_share: Vec<SourceShare>,
}

impl EnergyMetrics {
    pub fn from_dataset(data: Option<&EnergyDataset>) -> Self {
        Self {
            system_efficiency: system_efficiency(data),
            grid_health_score: grid_health_score(data),
            nodes_by_status: node_count_by_status(data),
            source_share: source_share(data),
        }
    }
}

pub fn average_temperature_anomaly(data: Option<&ClimateDataset>) -> f64 {
    let Some(data) = data else { return 0.0 };
    if data.regions.is_empty() {
        return 0.0;
    }
    data.regions.iter().map(|r| r.temperature_anomaly).sum::<f64>() / data.regions.len() as f64
}

/// Identities of regions at or above `threshold`.
pub fn regions_at_risk(data: Option<&ClimateDataset>, threshold: RiskLevel) -> Vec<String> {
    data.map(|d| {
        d.regions
            .iter()
            .filter(|r| r.risk_level >= threshold)
            .map(|r| r.id.clone())
            .collect()
    })
    .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateMetrics {
    pub average_temperature_anomaly: f64,
    pub high_risk_regions: Vec<String>,
}

impl ClimateMetrics {
    pub fn from_dataset(data: Option<&ClimateDataset>) -> Self {
        Self {
            average_temperature_anomaly: average_temperature_anomaly(data),
            high_risk_regions: regions_at_risk(data, RiskLevel::High),
        }
    }
}
