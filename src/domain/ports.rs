use crate::domain::model::{Candle, SpotPrices};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn vs_currency(&self) -> &str;
    fn candle_interval(&self) -> &str;
    fn candle_limit(&self) -> usize;
    fn heatmap_seed(&self) -> u64;
}

/// Source of live market data.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Spot prices for CoinGecko token ids in `vs_currency`. Ids the
    /// provider does not know are absent from the result.
    async fn spot_prices(&self, token_ids: &[String], vs_currency: &str) -> Result<SpotPrices>;

    /// Most recent `limit` candles for an exchange symbol such as `BTCUSDT`.
    async fn candles(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<Candle>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Snapshot: Send;
    type Report: Send;

    async fn extract(&self) -> Result<Self::Snapshot>;
    async fn transform(&self, snapshot: Self::Snapshot) -> Result<Self::Report>;
    async fn load(&self, report: Self::Report) -> Result<String>;
}
