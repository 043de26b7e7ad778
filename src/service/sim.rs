//! Synthetic data service for demos and local development.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::debug;

use super::{render_export, DataService, ExportFormat};
use crate::config::Config;
use crate::domain::{
    ClimateDataset, ClimateIndicators, ClimateRegion, ClimateTotals, Coordinates,
    DistributionNode, EnergyDataset, EnergyTotals, GenerationSource, GridLiveStatus,
    GridStability, NodeStatus, OperationalStatus, Region, RegionDirectory, RegionMetrics,
    RiskLevel, SourceKind, WeatherConditions, WeatherPayload,
};
use crate::error::{ExportError, FetchError};

const NODES_PER_REGION: usize = 3;

pub struct SimulatedDataService {
    rng: Mutex<StdRng>,
    regions: RegionDirectory,
    latency: Duration,
    failure_rate: f64,
}

impl SimulatedDataService {
    pub fn new(
        regions: RegionDirectory,
        latency: Duration,
        failure_rate: f64,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
            regions,
            latency,
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }

    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            cfg.region_directory()?,
            Duration::from_millis(cfg.data_service.sim_latency_ms),
            cfg.data_service.sim_failure_rate,
            cfg.data_service.sim_seed,
        ))
    }

    /// Simulated network round trip, failing with the configured probability.
    async fn round_trip(&self, endpoint: &str) -> Result<(), FetchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let failed = self.rng.lock().gen_bool(self.failure_rate);
        if failed {
            debug!(endpoint, "injecting simulated failure");
            return Err(FetchError::Status {
                status: 503,
                message: format!("simulated outage on {endpoint}"),
            });
        }
        Ok(())
    }

    fn selected_regions(&self, filter: Option<&str>) -> Vec<&Region> {
        self.regions
            .iter()
            .filter(|r| filter.map_or(true, |f| r.id.eq_ignore_ascii_case(f)))
            .collect()
    }

    fn energy_dataset(&self, filter: Option<&str>) -> EnergyDataset {
        let regions = self.selected_regions(filter);
        let mut rng = self.rng.lock();

        let region_metrics: Vec<RegionMetrics> = regions
            .iter()
            .map(|r| {
                let generation = rng.gen_range(800.0..2500.0);
                RegionMetrics {
                    id: r.id.clone(),
                    name: r.name.clone(),
                    generation,
                    consumption: generation * rng.gen_range(0.75..1.05),
                    renewable_percentage: rng.gen_range(20.0..85.0),
                    peak_demand: generation * rng.gen_range(1.0..1.3),
                    carbon_intensity: rng.gen_range(20.0..400.0),
                }
            })
            .collect();

        let nodes = regions
            .iter()
            .flat_map(|r| (0..NODES_PER_REGION).map(move |i| (r, i)))
            .map(|(r, i)| {
                let capacity = rng.gen_range(100.0..400.0);
                DistributionNode {
                    id: format!("{}-node-{}", r.id, i + 1),
                    name: format!("{} Substation {}", r.name, i + 1),
                    region_id: Some(r.id.clone()),
                    load: capacity * rng.gen_range(0.3..0.95),
                    capacity,
                    efficiency: rng.gen_range(85.0..99.0),
                    status: match rng.gen_range(0..20) {
                        0 => NodeStatus::Offline,
                        1 => NodeStatus::Maintenance,
                        2 | 3 => NodeStatus::Degraded,
                        _ => NodeStatus::Online,
                    },
                }
            })
            .collect();

        let scale = regions.len().max(1) as f64;
        let sources = [
            SourceKind::Solar,
            SourceKind::Wind,
            SourceKind::Hydro,
            SourceKind::Nuclear,
            SourceKind::Gas,
        ]
        .into_iter()
        .map(|kind| {
            let capacity = rng.gen_range(200.0..900.0) * scale;
            GenerationSource {
                id: kind.to_string(),
                kind,
                output: capacity * rng.gen_range(0.2..0.9),
                capacity,
            }
        })
        .collect::<Vec<_>>();

        let total_generation: f64 = region_metrics.iter().map(|r| r.generation).sum();
        let total_consumption: f64 = region_metrics.iter().map(|r| r.consumption).sum();
        let total_output: f64 = sources.iter().map(|s| s.output).sum();
        let renewable_output: f64 = sources
            .iter()
            .filter(|s| s.kind.is_renewable())
            .map(|s| s.output)
            .sum();

        EnergyDataset {
            totals: EnergyTotals {
                total_generation,
                total_consumption,
                renewable_percentage: if total_output > 0.0 {
                    renewable_output / total_output * 100.0
                } else {
                    0.0
                },
                distribution_losses: rng.gen_range(4.0..9.0),
                reliability_index: rng.gen_range(88.0..99.5),
                grid_stability: match rng.gen_range(0..10) {
                    0 => GridStability::Unstable,
                    1 | 2 => GridStability::Moderate,
                    _ => GridStability::Stable,
                },
            },
            regions: region_metrics,
            nodes,
            sources,
        }
    }

    fn grid_status(&self) -> GridLiveStatus {
        let mut rng = self.rng.lock();
        let frequency = 50.0 + rng.gen_range(-0.15..0.15);
        let load = rng.gen_range(3000.0..7000.0);
        let generation = load * rng.gen_range(0.97..1.08);
        let mut alerts = Vec::new();
        if (frequency - 50.0f64).abs() > 0.1 {
            alerts.push(format!("Frequency deviation: {frequency:.3} Hz"));
        }
        if generation < load {
            alerts.push("Generation below demand".to_string());
        }
        GridLiveStatus {
            status: match alerts.len() {
                0 => OperationalStatus::Normal,
                1 => OperationalStatus::Warning,
                _ => OperationalStatus::Critical,
            },
            load,
            generation,
            frequency,
            voltage: 400.0 + rng.gen_range(-8.0..8.0),
            alerts,
            timestamp: Utc::now(),
        }
    }

    fn weather(&self, location: Coordinates) -> WeatherPayload {
        let mut rng = self.rng.lock();
        let now = Utc::now();
        let base_temp = 25.0 - location.latitude.abs() * 0.3;
        let mut conditions = |hours_ahead: i64| WeatherConditions {
            timestamp: now + ChronoDuration::hours(hours_ahead),
            temperature_c: base_temp + rng.gen_range(-4.0..4.0),
            humidity_percent: rng.gen_range(35.0..95.0),
            wind_speed_ms: rng.gen_range(0.0..14.0),
            cloud_cover_percent: rng.gen_range(0.0..100.0),
            precipitation_mm: rng.gen_range(0.0..3.0),
            solar_irradiance_wm2: rng.gen_range(0.0..900.0),
        };
        let current = conditions(0);
        let forecast = (1..=24).step_by(3).map(conditions).collect();
        WeatherPayload {
            location,
            observed_at: now,
            current,
            forecast,
        }
    }

    fn climate_dataset(&self, filter: Option<&str>) -> ClimateDataset {
        let regions = self.selected_regions(filter);
        let mut rng = self.rng.lock();
        let regions = regions
            .iter()
            .map(|r| {
                let anomaly: f64 = rng.gen_range(-0.5..3.0);
                ClimateRegion {
                    id: r.id.clone(),
                    name: r.name.clone(),
                    temperature_c: 22.0 - r.coordinates.latitude.abs() * 0.25 + anomaly,
                    temperature_anomaly: anomaly,
                    precipitation_mm: rng.gen_range(10.0..120.0),
                    risk_level: match anomaly {
                        a if a >= 2.5 => RiskLevel::Severe,
                        a if a >= 1.8 => RiskLevel::High,
                        a if a >= 1.0 => RiskLevel::Moderate,
                        _ => RiskLevel::Low,
                    },
                }
            })
            .collect();
        ClimateDataset {
            global: ClimateTotals {
                temperature_anomaly: rng.gen_range(1.0..1.5),
                co2_ppm: rng.gen_range(415.0..425.0),
                sea_level_rise_mm: rng.gen_range(95.0..110.0),
                renewable_adoption_percent: rng.gen_range(25.0..40.0),
            },
            regions,
        }
    }

    fn climate_indicators(&self) -> ClimateIndicators {
        let mut rng = self.rng.lock();
        let heat_index_c = rng.gen_range(10.0..42.0);
        let air_quality_index = rng.gen_range(10..180);
        let mut alerts = Vec::new();
        if heat_index_c > 38.0 {
            alerts.push("Extreme heat advisory".to_string());
        }
        if air_quality_index > 150 {
            alerts.push("Unhealthy air quality".to_string());
        }
        ClimateIndicators {
            air_quality_index,
            heat_index_c,
            active_events: Vec::new(),
            alerts,
            timestamp: Utc::now(),
        }
    }
}

#[async_trait]
impl DataService for SimulatedDataService {
    async fn get_energy_data(&self, region: Option<&str>) -> Result<EnergyDataset, FetchError> {
        self.round_trip("energy").await?;
        Ok(self.energy_dataset(region))
    }

    async fn get_grid_status(&self) -> Result<GridLiveStatus, FetchError> {
        self.round_trip("grid/status").await?;
        Ok(self.grid_status())
    }

    async fn get_weather_data(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherPayload, FetchError> {
        self.round_trip("weather").await?;
        Ok(self.weather(coordinates))
    }

    async fn get_climate_data(&self, region: Option<&str>) -> Result<ClimateDataset, FetchError> {
        self.round_trip("climate").await?;
        Ok(self.climate_dataset(region))
    }

    async fn get_climate_indicators(&self) -> Result<ClimateIndicators, FetchError> {
        self.round_trip("climate/indicators").await?;
        Ok(self.climate_indicators())
    }

    async fn export_data(
        &self,
        domain: &str,
        format: ExportFormat,
        payload: serde_json::Value,
    ) -> Result<Vec<u8>, ExportError> {
        debug!(domain, %format, "rendering export");
        render_export(format, &payload)
    }
}
