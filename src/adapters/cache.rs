use crate::domain::model::{Candle, SpotPrices};
use crate::domain::ports::MarketData;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Expiring key/value store. Entries older than `ttl` are treated as absent.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some((stored_at, value)) if stored_at.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores `value` and drops every entry that has already expired.
    pub async fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock().await;
        let ttl = self.ttl;
        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < ttl);
        entries.insert(key, (Instant::now(), value));
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

/// Wraps a market source with separate price and candle caches. Failed
/// requests are never cached.
pub struct CachedMarketData<M: MarketData> {
    inner: M,
    prices: TtlCache<(String, String), SpotPrices>,
    candles: TtlCache<(String, String, usize), Vec<Candle>>,
}

impl<M: MarketData> CachedMarketData<M> {
    pub fn new(inner: M, price_ttl: Duration, candle_ttl: Duration) -> Self {
        Self {
            inner,
            prices: TtlCache::new(price_ttl),
            candles: TtlCache::new(candle_ttl),
        }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }
}

#[async_trait]
impl<M: MarketData> MarketData for CachedMarketData<M> {
    async fn spot_prices(&self, token_ids: &[String], vs_currency: &str) -> Result<SpotPrices> {
        let key = (token_ids.join(","), vs_currency.to_string());
        if let Some(hit) = self.prices.get(&key).await {
            tracing::debug!("Price cache hit: {}", key.0);
            return Ok(hit);
        }

        let prices = self.inner.spot_prices(token_ids, vs_currency).await?;
        self.prices.insert(key, prices.clone()).await;
        Ok(prices)
    }

    async fn candles(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<Candle>> {
        let key = (symbol.to_string(), interval.to_string(), limit);
        if let Some(hit) = self.candles.get(&key).await {
            tracing::debug!("Candle cache hit: {} {}", symbol, interval);
            return Ok(hit);
        }

        let candles = self.inner.candles(symbol, interval, limit).await?;
        self.candles.insert(key, candles.clone()).await;
        Ok(candles)
    }
}
