use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::domain::{Coordinates, Region, RegionDirectory};
use crate::sync::RefreshPolicy;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub data_service: DataServiceConfig,
    pub energy: RefreshConfig,
    pub climate: RefreshConfig,
    pub default_location: LocationConfig,
    pub regions: Vec<RegionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            enable_cors: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Sim,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataServiceConfig {
    pub provider: Provider,
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Upper bound for a single store fetch, transport retries included.
    pub fetch_timeout_secs: u64,
    pub sim_latency_ms: u64,
    pub sim_failure_rate: f64,
    pub sim_seed: Option<u64>,
}

impl DataServiceConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }
}

impl Default for DataServiceConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Sim,
            base_url: "http://127.0.0.1:9000/api".to_string(),
            request_timeout_secs: 20,
            fetch_timeout_secs: 30,
            sim_latency_ms: 150,
            sim_failure_rate: 0.0,
            sim_seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    pub auto_refresh: bool,
    pub refresh_interval_ms: u64,
    pub real_time_monitoring: bool,
    pub real_time_interval_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        let policy = RefreshPolicy::default();
        Self {
            auto_refresh: policy.auto_refresh,
            refresh_interval_ms: policy.refresh_interval.as_millis() as u64,
            real_time_monitoring: policy.real_time_monitoring,
            real_time_interval_ms: policy.real_time_interval.as_millis() as u64,
        }
    }
}

impl From<&RefreshConfig> for RefreshPolicy {
    fn from(cfg: &RefreshConfig) -> Self {
        Self {
            auto_refresh: cfg.auto_refresh,
            refresh_interval: Duration::from_millis(cfg.refresh_interval_ms),
            real_time_monitoring: cfg.real_time_monitoring,
            real_time_interval: Duration::from_millis(cfg.real_time_interval_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        let c = Coordinates::default();
        Self { latitude: c.latitude, longitude: c.longitude }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("GRID__").split("__"));
        let cfg: Config = figment.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.default_coordinates()?;
        self.region_directory()?;
        if !(0.0..=1.0).contains(&self.data_service.sim_failure_rate) {
            anyhow::bail!(
                "data_service.sim_failure_rate must be within [0, 1], got {}",
                self.data_service.sim_failure_rate
            );
        }
        Ok(())
    }

    pub fn default_coordinates(&self) -> Result<Coordinates> {
        Ok(Coordinates::new(
            self.default_location.latitude,
            self.default_location.longitude,
        )?)
    }

    /// Configured regions, or the built-in directory when none are configured.
    pub fn region_directory(&self) -> Result<RegionDirectory> {
        if self.regions.is_empty() {
            return Ok(RegionDirectory::builtin());
        }
        let regions = self
            .regions
            .iter()
            .map(|r| {
                Ok(Region {
                    id: r.id.clone(),
                    name: r.name.clone(),
                    coordinates: Coordinates::new(r.latitude, r.longitude)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(RegionDirectory::new(regions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.data_service.provider, Provider::Sim);
        assert!(!cfg.region_directory().unwrap().is_empty());
    }

    #[test]
    fn test_refresh_config_maps_to_policy() {
        let cfg = RefreshConfig {
            auto_refresh: false,
            refresh_interval_ms: 5_000,
            real_time_monitoring: true,
            real_time_interval_ms: 500,
        };
        let policy = RefreshPolicy::from(&cfg);
        assert!(!policy.auto_refresh);
        assert_eq!(policy.refresh_interval, Duration::from_secs(5));
        assert_eq!(policy.real_time_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_invalid_region_coordinates_rejected() {
        let cfg = Config {
            regions: vec![RegionConfig {
                id: "bad".into(),
                name: "Bad".into(),
                latitude: 120.0,
                longitude: 0.0,
            }],
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_failure_rate_bounds() {
        let mut cfg = Config::default();
        cfg.data_service.sim_failure_rate = 1.5;
        assert!(cfg.validate().is_err());
    }
}
