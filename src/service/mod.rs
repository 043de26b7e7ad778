//! Remote data access consumed by the stores.

pub mod export;
pub mod http;
#[cfg(feature = "sim")]
pub mod sim;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{Config, Provider};
use crate::domain::{
    ClimateDataset, ClimateIndicators, Coordinates, EnergyDataset, GridLiveStatus, WeatherPayload,
};
use crate::error::{ExportError, FetchError};

pub use export::{render_export, ExportFormat};
pub use http::HttpDataService;
#[cfg(feature = "sim")]
pub use sim::SimulatedDataService;

#[async_trait]
pub trait DataService: Send + Sync {
    async fn get_energy_data(&self, region: Option<&str>) -> Result<EnergyDataset, FetchError>;

    async fn get_grid_status(&self) -> Result<GridLiveStatus, FetchError>;

    async fn get_weather_data(&self, coordinates: Coordinates)
        -> Result<WeatherPayload, FetchError>;

    async fn get_climate_data(&self, region: Option<&str>) -> Result<ClimateDataset, FetchError>;

    async fn get_climate_indicators(&self) -> Result<ClimateIndicators, FetchError>;

    /// Encode `payload` as a downloadable file.
    async fn export_data(
        &self,
        domain: &str,
        format: ExportFormat,
        payload: serde_json::Value,
    ) -> Result<Vec<u8>, ExportError>;
}

/// Build the data service selected by `data_service.provider`.
pub fn from_config(cfg: &Config) -> anyhow::Result<Arc<dyn DataService>> {
    match cfg.data_service.provider {
        Provider::Http => Ok(Arc::new(HttpDataService::new(&cfg.data_service)?)),
        #[cfg(feature = "sim")]
        Provider::Sim => Ok(Arc::new(SimulatedDataService::from_config(cfg)?)),
        #[cfg(not(feature = "sim"))]
        Provider::Sim => anyhow::bail!("the sim provider requires the `sim` feature"),
    }
}
