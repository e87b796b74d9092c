//! SeatCut Settings Crate
//!
//! Loads, validates and saves the application configuration.

pub mod config;
pub mod error;

pub use config::{Config, ConnectionSettings, DiscoverySettings, JobSettings, PlannerConfig};
pub use error::{SettingsError, SettingsResult};
