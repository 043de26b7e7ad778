use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Fraction of the remaining efficiency headroom recovered per optimization pass.
const EFFICIENCY_GAIN: f64 = 0.05;
/// Fraction of node load shed per optimization pass.
const LOAD_REDUCTION: f64 = 0.05;
/// Fraction of the remaining reliability headroom recovered per optimization pass.
const RELIABILITY_GAIN: f64 = 0.10;

/// Aggregated grid figures plus the per-region, per-node and per-source breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyDataset {
    pub totals: EnergyTotals,
    pub regions: Vec<RegionMetrics>,
    pub nodes: Vec<DistributionNode>,
    pub sources: Vec<GenerationSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyTotals {
    /// MW
    pub total_generation: f64,
    /// MW
    pub total_consumption: f64,
    pub renewable_percentage: f64,
    /// Percent of generated energy lost in distribution.
    pub distribution_losses: f64,
    /// 0-100
    pub reliability_index: f64,
    pub grid_stability: GridStability,
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
pub enum GridStability {
    Stable,
    Moderate,
    Unstable,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionMetrics {
    pub id: String,
    pub name: String,
    pub generation: f64,
    pub consumption: f64,
    pub renewable_percentage: f64,
    pub peak_demand: f64,
    pub carbon_intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionNode {
    pub id: String,
    pub name: String,
    pub region_id: Option<String>,
    /// MW
    pub load: f64,
    /// MW
    pub capacity: f64,
    /// 0-100
    pub efficiency: f64,
    pub status: NodeStatus,
}

impl DistributionNode {
    /// One optimization pass: efficiency climbs towards 100, load decays towards 0.
    pub fn optimized(&self) -> Self {
        let efficiency = self.efficiency.clamp(0.0, 100.0);
        Self {
            efficiency: (efficiency + (100.0 - efficiency) * EFFICIENCY_GAIN).min(100.0),
            load: (self.load * (1.0 - LOAD_REDUCTION)).max(0.0),
            ..self.clone()
        }
    }
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
pub enum NodeStatus {
    Online,
    Degraded,
    Maintenance,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSource {
    pub id: String,
    pub kind: SourceKind,
    /// MW
    pub output: f64,
    /// MW
    pub capacity: f64,
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
pub enum SourceKind {
    Solar,
    Wind,
    Hydro,
    Nuclear,
    Gas,
    Coal,
    Biomass,
}

impl SourceKind {
    pub fn is_renewable(&self) -> bool {
        matches!(
            self,
            SourceKind::Solar | SourceKind::Wind | SourceKind::Hydro | SourceKind::Biomass
        )
    }
}

/// Fast-cadence grid status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLiveStatus {
    pub status: OperationalStatus,
    /// MW
    pub load: f64,
    /// MW
    pub generation: f64,
    /// Hz
    pub frequency: f64,
    /// kV
    pub voltage: f64,
    #[serde(default)]
    pub alerts: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OperationalStatus {
    Normal,
    Warning,
    Critical,
    Offline,
}

/// Shallow partial update of an [`EnergyDataset`]; present fields replace the current ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyDatasetPatch {
    pub totals: Option<EnergyTotals>,
    pub regions: Option<Vec<RegionMetrics>>,
    pub nodes: Option<Vec<DistributionNode>>,
    pub sources: Option<Vec<GenerationSource>>,
}

impl EnergyDataset {
    pub fn apply(&mut self, patch: EnergyDatasetPatch) {
        if let Some(totals) = patch.totals {
            self.totals = totals;
        }
        if let Some(regions) = patch.regions {
            self.regions = regions;
        }
        if let Some(nodes) = patch.nodes {
            self.nodes = nodes;
        }
        if let Some(sources) = patch.sources {
            self.sources = sources;
        }
    }

    /// The patch an optimization pass would apply to this dataset.
    pub fn optimization_patch(&self) -> EnergyDatasetPatch {
        let reliability = self.totals.reliability_index.clamp(0.0, 100.0);
        let totals = EnergyTotals {
            reliability_index: (reliability + (100.0 - reliability) * RELIABILITY_GAIN).min(100.0),
            ..self.totals.clone()
        };
        EnergyDatasetPatch {
            totals: Some(totals),
            nodes: Some(self.nodes.iter().map(DistributionNode::optimized).collect()),
            ..Default::default()
        }
    }

    pub fn region(&self, id: &str) -> Option<&RegionMetrics> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut DistributionNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }
}

/// Field-level update of a single node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePatch {
    pub name: Option<String>,
    pub region_id: Option<String>,
    pub load: Option<f64>,
    pub capacity: Option<f64>,
    pub efficiency: Option<f64>,
    pub status: Option<NodeStatus>,
}

impl DistributionNode {
    pub fn apply(&mut self, patch: NodePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(region_id) = patch.region_id {
            self.region_id = Some(region_id);
        }
        if let Some(load) = patch.load {
            self.load = load;
        }
        if let Some(capacity) = patch.capacity {
            self.capacity = capacity;
        }
        if let Some(efficiency) = patch.efficiency {
            self.efficiency = efficiency;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// A node as submitted by a caller, before the store assigns its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNode {
    pub name: String,
    pub region_id: Option<String>,
    pub load: f64,
    pub capacity: f64,
    pub efficiency: f64,
    pub status: NodeStatus,
}

impl NewNode {
    pub fn with_id(self, id: String) -> DistributionNode {
        DistributionNode {
            id,
            name: self.name,
            region_id: self.region_id,
            load: self.load,
            capacity: self.capacity,
            efficiency: self.efficiency,
            status: self.status,
        }
    }
}
