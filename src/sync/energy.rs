use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::store::{Domain, DomainStore};
use crate::domain::{
    DistributionNode, EnergyDataset, EnergyDatasetPatch, GridLiveStatus, NewNode, NodePatch,
    RegionMetrics,
};
use crate::error::{FetchError, StoreError};
use crate::metrics::{self, EnergyMetrics};
use crate::service::DataService;

/// Energy grid domain: grid dataset, live grid status, weather.
#[derive(Debug, Clone, Copy, Default)]
pub struct Energy;

impl Domain for Energy {
    const NAME: &'static str = "energy";
    const DATASET_KEY: &'static str = "energyData";
    const LIVE_STATUS_KEY: &'static str = "gridStatus";

    type Dataset = EnergyDataset;
    type Patch = EnergyDatasetPatch;
    type LiveStatus = GridLiveStatus;

    fn fetch_dataset(
        service: Arc<dyn DataService>,
        region: Option<String>,
    ) -> BoxFuture<'static, Result<EnergyDataset, FetchError>> {
        Box::pin(async move { service.get_energy_data(region.as_deref()).await })
    }

    fn fetch_live_status(
        service: Arc<dyn DataService>,
    ) -> BoxFuture<'static, Result<GridLiveStatus, FetchError>> {
        Box::pin(async move { service.get_grid_status().await })
    }

    fn apply_patch(dataset: &mut EnergyDataset, patch: EnergyDatasetPatch) {
        dataset.apply(patch);
    }
}

pub type EnergyStore = DomainStore<Energy>;

impl DomainStore<Energy> {
    /// Nudge every node and the reliability index towards their ceilings.
    ///
    /// Repeated calls converge: efficiency and reliability never exceed 100 and
    /// load never drops below 0. The pass is derived from and applied to the
    /// same dataset in one commit.
    pub fn optimize(&self) -> Result<(), StoreError> {
        self.mutate_dataset("optimize", |data| {
            let patch = data.optimization_patch();
            data.apply(patch);
            Some(())
        })?;
        info!(domain = Energy::NAME, "grid optimized");
        Ok(())
    }

    /// `Ok(false)` when the node is unknown.
    pub fn update_node(&self, id: &str, patch: NodePatch) -> Result<bool, StoreError> {
        let updated = self.mutate_dataset("update node", |data| {
            let node = data.node_mut(id)?;
            node.apply(patch);
            Some(())
        })?;
        Ok(updated.is_some())
    }

    /// Append a node under a freshly generated identity and return it.
    pub fn add_node(&self, node: NewNode) -> Result<String, StoreError> {
        let id = format!("node-{}", Uuid::new_v4());
        self.mutate_dataset("add node", |data| {
            data.nodes.push(node.with_id(id.clone()));
            Some(())
        })?;
        debug!(domain = Energy::NAME, node_id = %id, "node added");
        Ok(id)
    }

    /// Returns the removed node, or `None` for an unknown id.
    pub fn remove_node(&self, id: &str) -> Result<Option<DistributionNode>, StoreError> {
        self.mutate_dataset("remove node", |data| {
            let index = data.nodes.iter().position(|n| n.id == id)?;
            Some(data.nodes.remove(index))
        })
    }

    pub fn calculate_efficiency(&self) -> f64 {
        self.read(|s| metrics::system_efficiency(s.data.as_ref()))
    }

    pub fn get_region_metrics(&self, id: &str) -> Option<RegionMetrics> {
        self.read(|s| s.data.as_ref().and_then(|d| d.region(id)).cloned())
    }

    pub fn metrics(&self) -> EnergyMetrics {
        self.read(|s| EnergyMetrics::from_dataset(s.data.as_ref()))
    }
}
