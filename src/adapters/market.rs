use crate::adapters::binance::BinanceClient;
use crate::adapters::coingecko::CoinGeckoClient;
use crate::domain::model::{Candle, SpotPrices};
use crate::domain::ports::MarketData;
use crate::utils::error::{HubError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Spot prices from CoinGecko, candles from Binance.
#[derive(Debug, Clone)]
pub struct LiveMarketData {
    coingecko: CoinGeckoClient,
    binance: BinanceClient,
}

impl LiveMarketData {
    pub fn new(coingecko_base_url: &str, binance_base_url: &str, timeout: Duration) -> Result<Self> {
        // 兩個來源共用連線池
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cloud-crypto-hub/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            coingecko: CoinGeckoClient::with_client(client.clone(), coingecko_base_url),
            binance: BinanceClient::with_client(client, binance_base_url),
        })
    }
}

#[async_trait]
impl MarketData for LiveMarketData {
    async fn spot_prices(&self, token_ids: &[String], vs_currency: &str) -> Result<SpotPrices> {
        self.coingecko.simple_price(token_ids, vs_currency).await
    }

    async fn candles(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<Candle>> {
        self.binance.klines(symbol, interval, limit).await
    }
}

/// Market source used with `--offline`; every request fails so the
/// analyzer falls back to demo data.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineMarketData;

#[async_trait]
impl MarketData for OfflineMarketData {
    async fn spot_prices(&self, _token_ids: &[String], _vs_currency: &str) -> Result<SpotPrices> {
        Err(HubError::market("offline", "live market data disabled"))
    }

    async fn candles(&self, _symbol: &str, _interval: &str, _limit: usize) -> Result<Vec<Candle>> {
        Err(HubError::market("offline", "live market data disabled"))
    }
}

/// Either source behind one concrete type, chosen at runtime.
pub enum MarketSource {
    Live(LiveMarketData),
    Offline(OfflineMarketData),
}

#[async_trait]
impl MarketData for MarketSource {
    async fn spot_prices(&self, token_ids: &[String], vs_currency: &str) -> Result<SpotPrices> {
        match self {
            MarketSource::Live(m) => m.spot_prices(token_ids, vs_currency).await,
            MarketSource::Offline(m) => m.spot_prices(token_ids, vs_currency).await,
        }
    }

    async fn candles(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<Candle>> {
        match self {
            MarketSource::Live(m) => m.candles(symbol, interval, limit).await,
            MarketSource::Offline(m) => m.candles(symbol, interval, limit).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_source_always_fails() {
        let market = MarketSource::Offline(OfflineMarketData);
        let err = market.spot_prices(&["bitcoin".to_string()], "usd").await.unwrap_err();
        assert!(matches!(err, HubError::MarketDataError { .. }));
        assert!(market.candles("BTCUSDT", "1h", 10).await.is_err());
    }

    #[test]
    fn test_live_source_builds() {
        assert!(LiveMarketData::new("http://localhost:1", "http://localhost:2", Duration::from_secs(1)).is_ok());
    }
}
