pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod scene;
pub mod service;
pub mod sync;
pub mod telemetry;
