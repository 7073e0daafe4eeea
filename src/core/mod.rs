pub mod advisor;
pub mod analytics;
pub mod compliance;
pub mod cost;
pub mod engine;
pub mod payments;
pub mod portfolio;
pub mod revenue;

pub use crate::domain::model::{Candle, SpotPrices};
pub use crate::domain::ports::{ConfigProvider, MarketData, Pipeline, Storage};
pub use crate::utils::error::Result;
