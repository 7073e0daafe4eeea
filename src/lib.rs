pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command, OutputFormat};

pub use adapters::{CachedMarketData, LiveMarketData, LocalStorage, MarketSource, OfflineMarketData};
pub use app::pipelines::{DashboardReport, DashboardRequest, SnapshotPipeline};
pub use config::HubConfig;
pub use core::engine::HubEngine;
pub use utils::error::{HubError, Result};
