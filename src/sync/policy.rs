use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::scheduler::TimerName;

/// Per-domain polling configuration. Each cadence has its own timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshPolicy {
    pub auto_refresh: bool,
    #[serde(with = "millis")]
    pub refresh_interval: Duration,
    pub real_time_monitoring: bool,
    #[serde(with = "millis")]
    pub real_time_interval: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            refresh_interval: Duration::from_secs(60),
            real_time_monitoring: true,
            real_time_interval: Duration::from_secs(10),
        }
    }
}

impl RefreshPolicy {
    /// Whether `timer` should run, and at which period.
    pub fn timer(&self, name: TimerName) -> (bool, Duration) {
        match name {
            TimerName::AutoRefresh => (self.auto_refresh, self.refresh_interval),
            TimerName::RealTime => (self.real_time_monitoring, self.real_time_interval),
        }
    }
}

/// Durations travel as integer milliseconds.
mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = RefreshPolicy::default();
        assert_eq!(p.refresh_interval, Duration::from_secs(60));
        assert_eq!(p.real_time_interval, Duration::from_secs(10));
        assert!(p.auto_refresh && p.real_time_monitoring);
    }

    #[test]
    fn test_timer_settings() {
        let p = RefreshPolicy {
            real_time_monitoring: false,
            ..RefreshPolicy::default()
        };
        assert_eq!(p.timer(TimerName::AutoRefresh), (true, Duration::from_secs(60)));
        assert_eq!(p.timer(TimerName::RealTime), (false, Duration::from_secs(10)));
    }

    #[test]
    fn test_serializes_millis() {
        let json = serde_json::to_value(RefreshPolicy::default()).unwrap();
        assert_eq!(json["refreshInterval"], 60_000);
        assert_eq!(json["realTimeInterval"], 10_000);
    }
}
