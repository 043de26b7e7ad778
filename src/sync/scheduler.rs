use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use strum::Display;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, warn};

/// Shortest period a timer may run at.
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "snake_case")]
pub enum TimerName {
    /// Baseline cadence, re-fetches the primary dataset.
    AutoRefresh,
    /// Fast cadence, re-fetches the live-status slot.
    RealTime,
}

/// Run bookkeeping for one timer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerStatus {
    pub interval_ms: u64,
    pub last_run: Option<DateTime<Utc>>,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub run_count: u64,
    pub success_count: u64,
    pub error_count: u64,
}

struct TimerEntry {
    handle: JoinHandle<()>,
    status: Arc<Mutex<TimerStatus>>,
}

/// Owns every interval timer of one store, at most one per [`TimerName`].
///
/// Timers are only created and torn down through [`start`](Self::start) and
/// [`stop`](Self::stop); dropping the scheduler aborts everything it owns.
pub struct PollingScheduler {
    owner: &'static str,
    timers: HashMap<TimerName, TimerEntry>,
}

impl PollingScheduler {
    pub fn new(owner: &'static str) -> Self {
        Self {
            owner,
            timers: HashMap::new(),
        }
    }

    /// Start (or restart) the timer `name`. The first tick fires one interval from now.
    ///
    /// Each tick runs `callback` in its own task and waits for it, so ticks of one
    /// timer never overlap. A callback that fails or panics is logged and the
    /// timer keeps going.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<F, Fut>(&mut self, name: TimerName, interval: Duration, callback: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.stop(name);

        let period = interval.max(MIN_INTERVAL);
        let status = Arc::new(Mutex::new(TimerStatus {
            interval_ms: period.as_millis() as u64,
            ..Default::default()
        }));
        let task_status = status.clone();
        let owner = self.owner;

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let now = Utc::now();
                {
                    let mut s = task_status.lock();
                    s.last_run = Some(now);
                    s.run_count += 1;
                }

                match tokio::spawn(callback()).await {
                    Ok(Ok(())) => {
                        let mut s = task_status.lock();
                        s.last_success = Some(now);
                        s.success_count += 1;
                        s.last_error = None;
                    }
                    Ok(Err(e)) => {
                        warn!(owner, timer = %name, error = %e, "poll failed");
                        let mut s = task_status.lock();
                        s.error_count += 1;
                        s.last_error = Some(e.to_string());
                    }
                    Err(e) => {
                        error!(owner, timer = %name, error = %e, "poll task aborted");
                        let mut s = task_status.lock();
                        s.error_count += 1;
                        s.last_error = Some(e.to_string());
                    }
                }
            }
        });

        debug!(owner, timer = %name, interval_ms = period.as_millis() as u64, "timer started");
        self.timers.insert(name, TimerEntry { handle, status });
    }

    /// Stop and forget `name`. Unknown names are ignored.
    pub fn stop(&mut self, name: TimerName) {
        if let Some(entry) = self.timers.remove(&name) {
            entry.handle.abort();
            debug!(owner = self.owner, timer = %name, "timer stopped");
        }
    }

    pub fn stop_all(&mut self) {
        for (name, entry) in self.timers.drain() {
            entry.handle.abort();
            debug!(owner = self.owner, timer = %name, "timer stopped");
        }
    }

    pub fn is_active(&self, name: TimerName) -> bool {
        self.timers
            .get(&name)
            .map(|e| !e.handle.is_finished())
            .unwrap_or(false)
    }

    pub fn active_timers(&self) -> Vec<TimerName> {
        let mut names: Vec<_> = self
            .timers
            .iter()
            .filter(|(_, e)| !e.handle.is_finished())
            .map(|(name, _)| *name)
            .collect();
        names.sort();
        names
    }

    pub fn status(&self, name: TimerName) -> Option<TimerStatus> {
        self.timers.get(&name).map(|e| e.status.lock().clone())
    }
}

impl Drop for PollingScheduler {
    fn drop(&mut self) {
        self.stop_all();
    }
}
