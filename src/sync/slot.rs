use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use strum::Display;

/// One independently loading sub-field of a domain snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "snake_case")]
pub enum Slot {
    Primary,
    LiveStatus,
    Auxiliary,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Primary, Slot::LiveStatus, Slot::Auxiliary];

    fn index(self) -> usize {
        match self {
            Slot::Primary => 0,
            Slot::LiveStatus => 1,
            Slot::Auxiliary => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingState {
    pub primary: bool,
    pub live_status: bool,
    pub auxiliary: bool,
}

impl LoadingState {
    pub fn set(&mut self, slot: Slot, loading: bool) {
        match slot {
            Slot::Primary => self.primary = loading,
            Slot::LiveStatus => self.live_status = loading,
            Slot::Auxiliary => self.auxiliary = loading,
        }
    }

    pub fn any(&self) -> bool {
        self.primary || self.live_status || self.auxiliary
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorState {
    pub primary: Option<String>,
    pub live_status: Option<String>,
    pub auxiliary: Option<String>,
}

impl ErrorState {
    pub fn get(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Primary => self.primary.as_deref(),
            Slot::LiveStatus => self.live_status.as_deref(),
            Slot::Auxiliary => self.auxiliary.as_deref(),
        }
    }

    pub fn set(&mut self, slot: Slot, error: Option<String>) {
        match slot {
            Slot::Primary => self.primary = error,
            Slot::LiveStatus => self.live_status = error,
            Slot::Auxiliary => self.auxiliary = error,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn has_any(&self) -> bool {
        Slot::ALL.iter().any(|s| self.get(*s).is_some())
    }
}

/// Request generation per slot. Only the newest request for a slot may commit.
#[derive(Debug, Default)]
pub(crate) struct Generations([AtomicU64; 3]);

impl Generations {
    pub fn issue(&self, slot: Slot) -> u64 {
        self.0[slot.index()].fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, slot: Slot, generation: u64) -> bool {
        self.0[slot.index()].load(Ordering::SeqCst) == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_independent() {
        let mut loading = LoadingState::default();
        loading.set(Slot::LiveStatus, true);
        assert!(loading.live_status && !loading.primary && !loading.auxiliary);

        let mut errors = ErrorState::default();
        errors.set(Slot::Primary, Some("boom".into()));
        assert_eq!(errors.get(Slot::Primary), Some("boom"));
        assert_eq!(errors.get(Slot::Auxiliary), None);
        assert!(errors.has_any());
        errors.clear();
        assert!(!errors.has_any());
    }

    #[test]
    fn test_only_latest_generation_is_current() {
        let gens = Generations::default();
        let first = gens.issue(Slot::Primary);
        let second = gens.issue(Slot::Primary);
        assert!(!gens.is_current(Slot::Primary, first));
        assert!(gens.is_current(Slot::Primary, second));

        let other = gens.issue(Slot::Auxiliary);
        assert!(gens.is_current(Slot::Auxiliary, other));
        assert!(gens.is_current(Slot::Primary, second));
    }
}
