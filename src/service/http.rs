use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::{render_export, DataService, ExportFormat};
use crate::config::DataServiceConfig;
use crate::domain::{
    ClimateDataset, ClimateIndicators, Coordinates, EnergyDataset, GridLiveStatus, WeatherPayload,
};
use crate::error::{ExportError, FetchError};

/// JSON-over-HTTP data service.
///
/// Endpoints (relative to `base_url`): `energy`, `grid/status`, `weather`,
/// `climate`, `climate/indicators`. Region filters travel as `?region=`.
#[derive(Clone)]
pub struct HttpDataService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDataService {
    pub fn new(cfg: &DataServiceConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("grid-dashboard/0.1"));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs.max(1)))
            .default_headers(headers)
            .build()?;
        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// GET `path` and return the body of a successful response.
    async fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String, FetchError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "GET");
        let resp = self.client.get(&url).query(query).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let body = self.get_text(path, query).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn region_query(region: Option<&str>) -> Vec<(&'static str, String)> {
    region
        .map(|r| vec![("region", r.to_string())])
        .unwrap_or_default()
}

#[async_trait]
impl DataService for HttpDataService {
    async fn get_energy_data(&self, region: Option<&str>) -> Result<EnergyDataset, FetchError> {
        self.get_json("energy", &region_query(region)).await
    }

    async fn get_grid_status(&self) -> Result<GridLiveStatus, FetchError> {
        self.get_json("grid/status", &[]).await
    }

    async fn get_weather_data(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherPayload, FetchError> {
        let query = [
            ("lat", format!("{:.4}", coordinates.latitude)),
            ("lon", format!("{:.4}", coordinates.longitude)),
        ];
        let body = self.get_text("weather", &query).await?;
        WeatherPayload::from_json(&body)
    }

    async fn get_climate_data(&self, region: Option<&str>) -> Result<ClimateDataset, FetchError> {
        self.get_json("climate", &region_query(region)).await
    }

    async fn get_climate_indicators(&self) -> Result<ClimateIndicators, FetchError> {
        self.get_json("climate/indicators", &[]).await
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
