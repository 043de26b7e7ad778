//! Scripted data service shared by the integration tests.
//!
//! Each endpoint replays queued replies in order and falls back to a fixed
//! reply once its queue is empty. Replies may carry a delay so tests running
//! on paused time can interleave requests deterministically.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use grid_dashboard::domain::*;
use grid_dashboard::error::{ExportError, FetchError};
use grid_dashboard::service::{render_export, DataService, ExportFormat};
use grid_dashboard::sync::{RefreshPolicy, StoreSettings};

pub type Reply<T> = (Duration, Result<T, FetchError>);

pub struct Script<T> {
    queue: Mutex<VecDeque<Reply<T>>>,
    fallback: Mutex<Result<T, FetchError>>,
    calls: AtomicUsize,
}

impl<T: Clone> Script<T> {
    pub fn new(fallback: T) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(Ok(fallback)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push(&self, delay: Duration, reply: Result<T, FetchError>) {
        self.queue.lock().push_back((delay, reply));
    }

    pub fn push_ok(&self, value: T) {
        self.push(Duration::ZERO, Ok(value));
    }

    pub fn push_err(&self, error: FetchError) {
        self.push(Duration::ZERO, Err(error));
    }

    pub fn set_fallback(&self, reply: Result<T, FetchError>) {
        *self.fallback.lock() = reply;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn next(&self) -> Result<T, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let queued = self.queue.lock().pop_front();
        let (delay, reply) =
            queued.unwrap_or_else(|| (Duration::ZERO, self.fallback.lock().clone()));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply
    }
}

pub struct ScriptedService {
    pub energy: Script<EnergyDataset>,
    pub grid: Script<GridLiveStatus>,
    pub weather: Script<WeatherPayload>,
    pub climate: Script<ClimateDataset>,
    pub indicators: Script<ClimateIndicators>,
    pub export_delay: Mutex<Duration>,
    pub requested_regions: Mutex<Vec<Option<String>>>,
    pub weather_locations: Mutex<Vec<Coordinates>>,
}

impl ScriptedService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            energy: Script::new(energy_dataset()),
            grid: Script::new(grid_status()),
            weather: Script::new(weather_payload(Coordinates::default())),
            climate: Script::new(climate_dataset()),
            indicators: Script::new(climate_indicators()),
            export_delay: Mutex::new(Duration::ZERO),
            requested_regions: Mutex::new(Vec::new()),
            weather_locations: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl DataService for ScriptedService {
    async fn get_energy_data(&self, region: Option<&str>) -> Result<EnergyDataset, FetchError> {
        self.requested_regions.lock().push(region.map(str::to_string));
        self.energy.next().await
    }

    async fn get_grid_status(&self) -> Result<GridLiveStatus, FetchError> {
        self.grid.next().await
    }

    async fn get_weather_data(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherPayload, FetchError> {
        self.weather_locations.lock().push(coordinates);
        self.weather.next().await
    }

    async fn get_climate_data(&self, region: Option<&str>) -> Result<ClimateDataset, FetchError> {
        self.requested_regions.lock().push(region.map(str::to_string));
        self.climate.next().await
    }

    async fn get_climate_indicators(&self) -> Result<ClimateIndicators, FetchError> {
        self.indicators.next().await
    }

    async fn export_data(
        &self,
        _domain: &str,
        format: ExportFormat,
        payload: serde_json::Value,
    ) -> Result<Vec<u8>, ExportError> {
        let delay = *self.export_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        render_export(format, &payload)
    }
}

/// Settings with every timer off, so tests drive fetches explicitly.
pub fn manual_settings() -> StoreSettings {
    StoreSettings {
        policy: RefreshPolicy {
            auto_refresh: false,
            real_time_monitoring: false,
            ..RefreshPolicy::default()
        },
        fetch_timeout: Duration::from_secs(5),
        ..StoreSettings::default()
    }
}

pub fn outage() -> FetchError {
    FetchError::Status {
        status: 503,
        message: "upstream unavailable".to_string(),
    }
}

pub fn node(id: &str, region: &str, status: NodeStatus) -> DistributionNode {
    DistributionNode {
        id: id.to_string(),
        name: format!("Substation {id}"),
        region_id: Some(region.to_string()),
        load: 120.0,
        capacity: 200.0,
        efficiency: 90.0,
        status,
    }
}

/// Generation 1000, consumption 800, losses 10%: system efficiency is exactly 72.
pub fn energy_dataset() -> EnergyDataset {
    EnergyDataset {
        totals: EnergyTotals {
            total_generation: 1000.0,
            total_consumption: 800.0,
            renewable_percentage: 40.0,
            distribution_losses: 10.0,
            reliability_index: 96.0,
            grid_stability: GridStability::Stable,
        },
        regions: vec![
            RegionMetrics {
                id: "north".to_string(),
                name: "Northern Grid".to_string(),
                generation: 600.0,
                consumption: 450.0,
                renewable_percentage: 55.0,
                peak_demand: 700.0,
                carbon_intensity: 80.0,
            },
            RegionMetrics {
                id: "south".to_string(),
                name: "Southern Grid".to_string(),
                generation: 400.0,
                consumption: 350.0,
                renewable_percentage: 20.0,
                peak_demand: 420.0,
                carbon_intensity: 240.0,
            },
        ],
        nodes: vec![
            node("north-1", "north", NodeStatus::Online),
            node("south-1", "south", NodeStatus::Degraded),
        ],
        sources: vec![
            GenerationSource {
                id: "wind".to_string(),
                kind: SourceKind::Wind,
                output: 400.0,
                capacity: 600.0,
            },
            GenerationSource {
                id: "gas".to_string(),
                kind: SourceKind::Gas,
                output: 600.0,
                capacity: 800.0,
            },
        ],
    }
}

pub fn grid_status() -> GridLiveStatus {
    GridLiveStatus {
        status: OperationalStatus::Normal,
        load: 800.0,
        generation: 1000.0,
        frequency: 50.0,
        voltage: 400.0,
        alerts: Vec::new(),
        timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    }
}

pub fn weather_payload(location: Coordinates) -> WeatherPayload {
    let conditions = WeatherConditions {
        timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        temperature_c: 18.0,
        humidity_percent: 60.0,
        wind_speed_ms: 5.0,
        cloud_cover_percent: 20.0,
        precipitation_mm: 0.0,
        solar_irradiance_wm2: 550.0,
    };
    WeatherPayload {
        location,
        observed_at: conditions.timestamp,
        current: conditions.clone(),
        forecast: vec![conditions],
    }
}

pub fn climate_dataset() -> ClimateDataset {
    ClimateDataset {
        global: ClimateTotals {
            temperature_anomaly: 1.2,
            co2_ppm: 420.0,
            sea_level_rise_mm: 101.0,
            renewable_adoption_percent: 31.0,
        },
        regions: vec![
            ClimateRegion {
                id: "north".to_string(),
                name: "Northern Grid".to_string(),
                temperature_c: 4.0,
                temperature_anomaly: 2.0,
                precipitation_mm: 50.0,
                risk_level: RiskLevel::High,
            },
            ClimateRegion {
                id: "south".to_string(),
                name: "Southern Grid".to_string(),
                temperature_c: 10.0,
                temperature_anomaly: 1.0,
                precipitation_mm: 70.0,
                risk_level: RiskLevel::Low,
            },
        ],
    }
}

pub fn climate_indicators() -> ClimateIndicators {
    ClimateIndicators {
        air_quality_index: 42,
        heat_index_c: 21.0,
        active_events: Vec::new(),
        alerts: Vec::new(),
        timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    }
}
