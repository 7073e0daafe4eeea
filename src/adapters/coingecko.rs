use crate::domain::model::SpotPrices;
use crate::utils::error::{HubError, Result};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

pub const PROVIDER: &str = "coingecko";
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko public API, `/simple/price` only.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn simple_price(&self, token_ids: &[String], vs_currency: &str) -> Result<SpotPrices> {
        if token_ids.is_empty() {
            return Ok(SpotPrices::new());
        }

        let url = format!("{}/simple/price", self.base_url);
        let ids = token_ids.join(",");
        tracing::debug!("Requesting spot prices: {} ids={} vs={}", url, ids, vs_currency);

        let response = self
            .client
            .get(&url)
            .query(&[("ids", ids.as_str()), ("vs_currencies", vs_currency)])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("CoinGecko response status: {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HubError::market(PROVIDER, format!("HTTP {}: {}", status, body.trim())));
        }

        let payload: HashMap<String, HashMap<String, serde_json::Value>> = response
            .json()
            .await
            .map_err(|e| HubError::market(PROVIDER, format!("unexpected response body: {}", e)))?;

        // 未知或暫無報價的幣種直接略過
        let vs_key = vs_currency.to_lowercase();
        let prices: SpotPrices = payload
            .into_iter()
            .filter_map(|(id, quotes)| quotes.get(&vs_key).and_then(|v| v.as_f64()).map(|p| (id, p)))
            .collect();

        Ok(prices)
    }
}
