pub mod pipelines;
pub mod render;

use crate::adapters::{CachedMarketData, LiveMarketData, MarketSource, OfflineMarketData};
use crate::config::HubConfig;
use crate::utils::error::Result;

/// Market source described by the settings file, wrapped in the TTL cache.
pub fn market_from_config(config: &HubConfig) -> Result<CachedMarketData<MarketSource>> {
    let source = if config.market.offline {
        tracing::info!("📴 Offline mode: live market data disabled");
        MarketSource::Offline(OfflineMarketData)
    } else {
        MarketSource::Live(LiveMarketData::new(
            &config.market.coingecko_base_url,
            &config.market.binance_base_url,
            config.request_timeout(),
        )?)
    };

    Ok(CachedMarketData::new(source, config.price_cache_ttl(), config.candle_cache_ttl()))
}
