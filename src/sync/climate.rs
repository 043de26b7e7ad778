use futures::future::BoxFuture;
use std::sync::Arc;

use super::store::{Domain, DomainStore};
use crate::domain::{ClimateDataset, ClimateDatasetPatch, ClimateIndicators, ClimateRegion};
use crate::error::FetchError;
use crate::metrics::ClimateMetrics;
use crate::service::DataService;

/// Climate domain: regional climate dataset, live indicators, weather.
#[derive(Debug, Clone, Copy, Default)]
pub struct Climate;

impl Domain for Climate {
    const NAME: &'static str = "climate";
    const DATASET_KEY: &'static str = "climateData";
    const LIVE_STATUS_KEY: &'static str = "climateIndicators";

    type Dataset = ClimateDataset;
    type Patch = ClimateDatasetPatch;
    type LiveStatus = ClimateIndicators;

    fn fetch_dataset(
        service: Arc<dyn DataService>,
        region: Option<String>,
    ) -> BoxFuture<'static, Result<ClimateDataset, FetchError>> {
        Box::pin(async move { service.get_climate_data(region.as_deref()).await })
    }

    fn fetch_live_status(
        service: Arc<dyn DataService>,
    ) -> BoxFuture<'static, Result<ClimateIndicators, FetchError>> {
        Box::pin(async move { service.get_climate_indicators().await })
    }

    fn apply_patch(dataset: &mut ClimateDataset, patch: ClimateDatasetPatch) {
        dataset.apply(patch);
    }
}

pub type ClimateStore = DomainStore<Climate>;

impl DomainStore<Climate> {
    pub fn get_region_metrics(&self, id: &str) -> Option<ClimateRegion> {
        self.read(|s| s.data.as_ref().and_then(|d| d.region(id)).cloned())
    }

    pub fn metrics(&self) -> ClimateMetrics {
        self.read(|s| ClimateMetrics::from_dataset(s.data.as_ref()))
    }
}
