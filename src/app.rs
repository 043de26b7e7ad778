use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::scene::SceneStore;
use crate::service::DataService;
use crate::sync::{ClimateStore, EnergyStore, RefreshPolicy, StoreSettings};

/// Every store the dashboard runs with, shared by the API handlers.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub energy: EnergyStore,
    pub climate: ClimateStore,
    pub scene: SceneStore,
}

impl AppState {
    pub fn new(cfg: Config, service: Arc<dyn DataService>) -> Result<Self> {
        let settings = |policy: RefreshPolicy| -> Result<StoreSettings> {
            Ok(StoreSettings {
                policy,
                fetch_timeout: cfg.data_service.fetch_timeout(),
                default_location: cfg.default_coordinates()?,
                regions: cfg.region_directory()?,
            })
        };

        let energy = EnergyStore::new(service.clone(), settings(RefreshPolicy::from(&cfg.energy))?);
        let climate = ClimateStore::new(service, settings(RefreshPolicy::from(&cfg.climate))?);

        Ok(Self {
            cfg,
            energy,
            climate,
            scene: SceneStore::default(),
        })
    }

    /// Bring every domain store up concurrently. Each store isolates its own
    /// failures, so one domain being down never holds back the others.
    pub async fn initialize(&self) {
        tokio::join!(self.energy.initialize(), self.climate.initialize());
        info!(
            energy_loaded = self.energy.read(|s| s.data.is_some()),
            climate_loaded = self.climate.read(|s| s.data.is_some()),
            "stores initialized"
        );
    }

    pub fn shutdown(&self) {
        self.energy.shutdown();
        self.climate.shutdown();
    }
}
