// Adapters layer: concrete implementations for external systems (market data http, cache, storage)

pub mod binance;
pub mod cache;
pub mod coingecko;
pub mod market;
pub mod storage;

pub use binance::BinanceClient;
pub use cache::{CachedMarketData, TtlCache};
pub use coingecko::CoinGeckoClient;
pub use market::{LiveMarketData, MarketSource, OfflineMarketData};
pub use storage::LocalStorage;
