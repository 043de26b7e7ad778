use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;
use strum::{Display, EnumString};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::policy::RefreshPolicy;
use super::scheduler::{PollingScheduler, TimerName, TimerStatus};
use super::slot::{ErrorState, Generations, LoadingState, Slot};
use crate::domain::{Coordinates, RegionDirectory, WeatherPayload};
use crate::error::{ExportError, FetchError, StoreError};
use crate::service::{DataService, ExportFormat};

/// Describes one data domain: what it stores and how it is fetched.
pub trait Domain: Clone + fmt::Debug + Send + Sync + 'static {
    /// Used in logs and passed to the export collaborator.
    const NAME: &'static str;
    /// Export key of the primary dataset.
    const DATASET_KEY: &'static str;
    /// Export key of the live-status slot.
    const LIVE_STATUS_KEY: &'static str;

    type Dataset: Clone + fmt::Debug + Serialize + Send + Sync + 'static;
    type Patch: fmt::Debug + Send + 'static;
    type LiveStatus: Clone + fmt::Debug + Serialize + Send + Sync + 'static;

    fn fetch_dataset(
        service: Arc<dyn DataService>,
        region: Option<String>,
    ) -> BoxFuture<'static, Result<Self::Dataset, FetchError>>;

    fn fetch_live_status(
        service: Arc<dyn DataService>,
    ) -> BoxFuture<'static, Result<Self::LiveStatus, FetchError>>;

    fn apply_patch(dataset: &mut Self::Dataset, patch: Self::Patch);
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum TimeRange {
    #[serde(rename = "1h")]
    #[strum(serialize = "1h")]
    Hour,
    #[default]
    #[serde(rename = "24h")]
    #[strum(serialize = "24h")]
    Day,
    #[serde(rename = "7d")]
    #[strum(serialize = "7d")]
    Week,
    #[serde(rename = "30d")]
    #[strum(serialize = "30d")]
    Month,
    #[serde(rename = "1y")]
    #[strum(serialize = "1y")]
    Year,
}

/// Point-in-time state of one domain as seen by readers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", bound(serialize = ""))]
pub struct DomainSnapshot<D: Domain> {
    pub data: Option<D::Dataset>,
    pub live_status: Option<D::LiveStatus>,
    pub weather: Option<WeatherPayload>,
    pub loading: LoadingState,
    pub errors: ErrorState,
    /// Last successful primary fetch or local edit.
    pub last_updated: Option<DateTime<Utc>>,
    pub live_status_updated: Option<DateTime<Utc>>,
    pub weather_updated: Option<DateTime<Utc>>,
    pub selected_region: Option<String>,
    pub time_range: TimeRange,
}

impl<D: Domain> Default for DomainSnapshot<D> {
    fn default() -> Self {
        Self {
            data: None,
            live_status: None,
            weather: None,
            loading: LoadingState::default(),
            errors: ErrorState::default(),
            last_updated: None,
            live_status_updated: None,
            weather_updated: None,
            selected_region: None,
            time_range: TimeRange::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub policy: RefreshPolicy,
    pub fetch_timeout: Duration,
    pub default_location: Coordinates,
    pub regions: RegionDirectory,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            policy: RefreshPolicy::default(),
            fetch_timeout: Duration::from_secs(30),
            default_location: Coordinates::default(),
            regions: RegionDirectory::builtin(),
        }
    }
}

pub(crate) struct StoreInner<D: Domain> {
    service: Arc<dyn DataService>,
    state: watch::Sender<DomainSnapshot<D>>,
    policy: Mutex<RefreshPolicy>,
    scheduler: Mutex<PollingScheduler>,
    generations: Generations,
    fetch_timeout: Duration,
    default_location: Coordinates,
    regions: RegionDirectory,
}

/// Owner of one domain snapshot and the only way to change it.
///
/// Handles are cheap to clone and all refer to the same state. Every mutation is
/// applied atomically through a watch channel, so subscribers never see a
/// half-applied update.
pub struct DomainStore<D: Domain> {
    pub(crate) inner: Arc<StoreInner<D>>,
}

impl<D: Domain> Clone for DomainStore<D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<D: Domain> DomainStore<D> {
    pub fn new(service: Arc<dyn DataService>, settings: StoreSettings) -> Self {
        let (state, _) = watch::channel(DomainSnapshot::default());
        Self {
            inner: Arc::new(StoreInner {
                service,
                state,
                policy: Mutex::new(settings.policy),
                scheduler: Mutex::new(PollingScheduler::new(D::NAME)),
                generations: Generations::default(),
                fetch_timeout: settings.fetch_timeout,
                default_location: settings.default_location,
                regions: settings.regions,
            }),
        }
    }

    fn from_weak(weak: &Weak<StoreInner<D>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn snapshot(&self) -> DomainSnapshot<D> {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DomainSnapshot<D>> {
        self.inner.state.subscribe()
    }

    /// Run `f` against the current snapshot without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&DomainSnapshot<D>) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    pub fn refresh_policy(&self) -> RefreshPolicy {
        self.inner.policy.lock().clone()
    }

    pub fn regions(&self) -> &RegionDirectory {
        &self.inner.regions
    }

    /// First load: primary dataset, then timers, then live status and weather in parallel.
    pub async fn initialize(&self) {
        info!(domain = D::NAME, "initializing store");
        self.inner.state.send_modify(|s| s.errors.primary = None);
        let _ = self.fetch_dataset().await;

        self.restart_timers();

        let coordinates = self.weather_coordinates();
        tokio::join!(self.load_live_status(), self.load_weather(coordinates));
        info!(domain = D::NAME, "store initialized");
    }

    /// Re-fetch the primary dataset for the selected region.
    pub async fn refresh(&self) {
        let _ = self.fetch_dataset().await;
    }

    pub async fn load_live_status(&self) {
        let _ = self.fetch_live_status().await;
    }

    pub async fn load_weather(&self, coordinates: Coordinates) {
        let service = self.inner.service.clone();
        let _ = self
            .fetch_into(
                Slot::Auxiliary,
                async move { service.get_weather_data(coordinates).await },
                |s, weather| {
                    s.weather = Some(weather);
                    s.weather_updated = Some(Utc::now());
                },
            )
            .await;
    }

    /// Select a region (or all regions) and reload for it. Existing data stays
    /// visible until the new fetch lands.
    pub async fn set_selected_region(&self, region: Option<String>) {
        let coordinates = region
            .as_deref()
            .and_then(|id| self.inner.regions.coordinates(id));
        self.inner
            .state
            .send_modify(|s| s.selected_region = region.clone());
        info!(domain = D::NAME, region = ?region, "region selected");

        match coordinates {
            Some(c) => {
                tokio::join!(self.refresh(), self.load_weather(c));
            }
            None => self.refresh().await,
        }
    }

    pub fn set_time_range(&self, range: TimeRange) {
        self.inner.state.send_if_modified(|s| {
            let changed = s.time_range != range;
            s.time_range = range;
            changed
        });
    }

    /// Shallow-merge `patch` into the loaded dataset.
    pub fn update(&self, patch: D::Patch) -> Result<(), StoreError> {
        self.mutate_dataset("update", |data| {
            D::apply_patch(data, patch);
            Some(())
        })?;
        Ok(())
    }

    pub fn set_auto_refresh(&self, enabled: bool) {
        self.reconfigure(TimerName::AutoRefresh, |p| p.auto_refresh = enabled);
    }

    pub fn set_refresh_interval(&self, interval: Duration) {
        self.reconfigure(TimerName::AutoRefresh, |p| p.refresh_interval = interval);
    }

    pub fn set_real_time_monitoring(&self, enabled: bool) {
        self.reconfigure(TimerName::RealTime, |p| p.real_time_monitoring = enabled);
    }

    pub fn set_real_time_interval(&self, interval: Duration) {
        self.reconfigure(TimerName::RealTime, |p| p.real_time_interval = interval);
    }

    /// Apply several policy edits at once and return the resulting policy.
    /// Only timers whose settings changed are restarted.
    pub fn update_refresh_policy(&self, edit: impl FnOnce(&mut RefreshPolicy)) -> RefreshPolicy {
        let mut scheduler = self.inner.scheduler.lock();
        let mut policy = self.inner.policy.lock();
        let before = policy.clone();
        edit(&mut policy);
        for timer in [TimerName::AutoRefresh, TimerName::RealTime] {
            if before.timer(timer) != policy.timer(timer) {
                self.apply_timer(&mut scheduler, timer, &policy);
            }
        }
        policy.clone()
    }

    /// Clear every error slot. Data and loading flags are untouched.
    pub fn clear_error(&self) {
        self.inner.state.send_if_modified(|s| {
            let had_errors = s.errors.has_any();
            s.errors.clear();
            had_errors
        });
    }

    /// Serialize the current snapshot through the export collaborator.
    pub async fn export_snapshot(&self, format: ExportFormat) -> Result<Vec<u8>, StoreError> {
        let payload = self.export_payload()?;
        let export = self.inner.service.export_data(D::NAME, format, payload);
        let bytes = tokio::time::timeout(self.inner.fetch_timeout, export)
            .await
            .map_err(|_| ExportError::Timeout(self.inner.fetch_timeout))?
            .inspect_err(|e| warn!(domain = D::NAME, %format, error = %e, "export failed"))?;
        info!(domain = D::NAME, %format, bytes = bytes.len(), "snapshot exported");
        Ok(bytes)
    }

    pub fn active_timers(&self) -> Vec<TimerName> {
        self.inner.scheduler.lock().active_timers()
    }

    pub fn timer_status(&self, name: TimerName) -> Option<TimerStatus> {
        self.inner.scheduler.lock().status(name)
    }

    /// Stop every timer owned by this store. In-flight fetches still complete.
    pub fn shutdown(&self) {
        self.inner.scheduler.lock().stop_all();
        info!(domain = D::NAME, "store timers stopped");
    }

    fn export_payload(&self) -> Result<serde_json::Value, StoreError> {
        let state = self.inner.state.borrow();
        let data = state
            .data
            .as_ref()
            .ok_or_else(|| StoreError::no_data(D::NAME, "export"))?;

        let mut filters = serde_json::Map::new();
        filters.insert("selectedRegion".into(), to_value(&state.selected_region)?);
        filters.insert("timeRange".into(), to_value(&state.time_range)?);

        let mut payload = serde_json::Map::new();
        payload.insert(D::DATASET_KEY.into(), to_value(data)?);
        payload.insert(D::LIVE_STATUS_KEY.into(), to_value(&state.live_status)?);
        payload.insert("weatherData".into(), to_value(&state.weather)?);
        payload.insert("exportTimestamp".into(), to_value(&Utc::now())?);
        payload.insert("filters".into(), serde_json::Value::Object(filters));
        Ok(serde_json::Value::Object(payload))
    }

    pub(crate) async fn fetch_dataset(&self) -> Result<(), FetchError> {
        let region = self.inner.state.borrow().selected_region.clone();
        let fetch = D::fetch_dataset(self.inner.service.clone(), region);
        self.fetch_into(Slot::Primary, fetch, |s, data| {
            s.data = Some(data);
            s.last_updated = Some(Utc::now());
        })
        .await
    }

    pub(crate) async fn fetch_live_status(&self) -> Result<(), FetchError> {
        let fetch = D::fetch_live_status(self.inner.service.clone());
        self.fetch_into(Slot::LiveStatus, fetch, |s, status| {
            s.live_status = Some(status);
            s.live_status_updated = Some(Utc::now());
        })
        .await
    }

    /// Run one fetch for `slot` and commit its outcome.
    ///
    /// The slot's loading flag is raised for the duration of the fetch. A result
    /// is discarded when a newer request for the same slot was issued meanwhile.
    /// Failures land in the slot's error and leave its data untouched.
    async fn fetch_into<T, F>(
        &self,
        slot: Slot,
        fetch: F,
        commit: impl FnOnce(&mut DomainSnapshot<D>, T),
    ) -> Result<(), FetchError>
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        let generation = self.inner.generations.issue(slot);
        self.inner.state.send_modify(|s| s.loading.set(slot, true));

        let timeout = self.inner.fetch_timeout;
        let outcome = match tokio::time::timeout(timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(timeout)),
        };

        if !self.inner.generations.is_current(slot, generation) {
            debug!(domain = D::NAME, %slot, generation, "discarding superseded fetch result");
            return outcome.map(|_| ());
        }

        match outcome {
            Ok(value) => {
                self.inner.state.send_modify(|s| {
                    commit(s, value);
                    s.loading.set(slot, false);
                    s.errors.set(slot, None);
                });
                debug!(domain = D::NAME, %slot, "fetch committed");
                Ok(())
            }
            Err(e) => {
                warn!(domain = D::NAME, %slot, error = %e, "fetch failed");
                self.inner.state.send_modify(|s| {
                    s.loading.set(slot, false);
                    s.errors.set(slot, Some(e.to_string()));
                });
                Err(e)
            }
        }
    }

    /// Apply `f` to the loaded dataset in a single commit. `f` returning `None`
    /// means nothing changed. Fails with [`StoreError::NoData`] naming
    /// `operation` when no dataset is loaded.
    pub(crate) fn mutate_dataset<R>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut D::Dataset) -> Option<R>,
    ) -> Result<Option<R>, StoreError> {
        let mut loaded = false;
        let mut out = None;
        self.inner.state.send_if_modified(|s| {
            let Some(data) = s.data.as_mut() else {
                return false;
            };
            loaded = true;
            out = f(data);
            if out.is_some() {
                s.last_updated = Some(Utc::now());
            }
            out.is_some()
        });
        if !loaded {
            return Err(StoreError::no_data(D::NAME, operation));
        }
        Ok(out)
    }

    /// Coordinates of the selected region, or the default location.
    pub fn weather_coordinates(&self) -> Coordinates {
        self.inner
            .state
            .borrow()
            .selected_region
            .as_deref()
            .and_then(|id| self.inner.regions.coordinates(id))
            .unwrap_or(self.inner.default_location)
    }

    /// Edit the policy and restart `timer` while holding the scheduler lock, so
    /// concurrent edits reach the policy and the scheduler in the same order.
    /// Lock order is always scheduler, then policy.
    fn reconfigure(&self, timer: TimerName, edit: impl FnOnce(&mut RefreshPolicy)) {
        let mut scheduler = self.inner.scheduler.lock();
        let policy = {
            let mut policy = self.inner.policy.lock();
            edit(&mut policy);
            policy.clone()
        };
        self.apply_timer(&mut scheduler, timer, &policy);
    }

    fn restart_timers(&self) {
        let mut scheduler = self.inner.scheduler.lock();
        let policy = self.refresh_policy();
        self.apply_timer(&mut scheduler, TimerName::AutoRefresh, &policy);
        self.apply_timer(&mut scheduler, TimerName::RealTime, &policy);
    }

    /// Start or stop `timer` to match `policy`. Callers hold the scheduler lock.
    fn apply_timer(
        &self,
        scheduler: &mut PollingScheduler,
        timer: TimerName,
        policy: &RefreshPolicy,
    ) {
        let (enabled, interval) = policy.timer(timer);
        if !enabled {
            scheduler.stop(timer);
            return;
        }
        let weak = Arc::downgrade(&self.inner);
        scheduler.start(timer, interval, move || {
            let store = Self::from_weak(&weak);
            async move {
                if let Some(store) = store {
                    match timer {
                        TimerName::AutoRefresh => store.fetch_dataset().await?,
                        TimerName::RealTime => store.fetch_live_status().await?,
                    }
                }
                anyhow::Ok(())
            }
        });
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::Serialization(e.to_string()))
}
