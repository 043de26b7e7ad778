//! Live-data synchronization engine.
//!
//! One [`DomainStore`] per data domain owns that domain's snapshot, polls the
//! data service on its own [`PollingScheduler`], and keeps loading and error
//! state per slot so a failing slot never blocks the others.

pub mod climate;
pub mod energy;
pub mod policy;
pub mod scheduler;
pub mod slot;
pub mod store;

pub use climate::{Climate, ClimateStore};
pub use energy::{Energy, EnergyStore};
pub use policy::RefreshPolicy;
pub use scheduler::{PollingScheduler, TimerName, TimerStatus};
pub use slot::{ErrorState, LoadingState, Slot};
pub use store::{Domain, DomainSnapshot, DomainStore, StoreSettings, TimeRange};
